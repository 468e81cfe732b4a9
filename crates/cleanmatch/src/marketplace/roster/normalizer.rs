/// Collapse whitespace and strip BOM/zero-width characters that spreadsheet
/// exports tend to smuggle into the first column.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only ASCII digits and truncate to the five that matter. ZIP+4 values
/// and stray punctuation both reduce to the plain five-digit form.
pub(crate) fn normalize_zip(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_digit)
        .take(5)
        .collect()
}

#[cfg(test)]
pub(crate) fn normalize_name_for_tests(value: &str) -> String {
    normalize_name(value)
}

#[cfg(test)]
pub(crate) fn normalize_zip_for_tests(value: &str) -> String {
    normalize_zip(value)
}
