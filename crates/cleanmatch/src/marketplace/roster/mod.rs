//! Bulk onboarding from roster CSV exports.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::marketplace::professionals::domain::RegistrationSubmission;

/// Radius assumed for rows that do not declare one.
const DEFAULT_RADIUS_MILES: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// One usable row from a roster export: the registration payload plus the
/// review rating carried over from the previous system, when present.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub submission: RegistrationSubmission,
    pub rating: Option<f32>,
}

/// Parsed roster: usable entries plus a count of rows that were dropped for
/// missing a name or any coverage at all.
#[derive(Debug, Clone)]
pub struct RosterImport {
    pub entries: Vec<RosterEntry>,
    pub skipped_rows: usize,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RosterImport, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<RosterImport, RosterImportError> {
        let mut entries = Vec::new();
        let mut skipped_rows = 0;

        for record in parser::parse_records(reader)? {
            if record.full_name.is_empty() {
                skipped_rows += 1;
                continue;
            }

            let base_zip = record.base_zip.unwrap_or_default();
            if base_zip.is_empty() && record.extra_zips.is_empty() {
                skipped_rows += 1;
                continue;
            }

            entries.push(RosterEntry {
                submission: RegistrationSubmission {
                    full_name: record.full_name,
                    email: record.email.unwrap_or_default(),
                    phone: record.phone.unwrap_or_default(),
                    base_zip,
                    service_radius_miles: record.radius_miles.unwrap_or(DEFAULT_RADIUS_MILES),
                    zip_codes: record.extra_zips,
                },
                rating: record.rating,
            });
        }

        Ok(RosterImport {
            entries,
            skipped_rows,
        })
    }
}
