use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::normalizer::{normalize_name, normalize_zip};

#[derive(Debug)]
pub(crate) struct RosterRecord {
    pub(crate) full_name: String,
    pub(crate) email: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) base_zip: Option<String>,
    pub(crate) radius_miles: Option<u32>,
    pub(crate) extra_zips: Vec<String>,
    pub(crate) rating: Option<f32>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RosterRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        let full_name = normalize_name(&row.name);
        let base_zip = row.base_zip.as_deref().map(normalize_zip);
        let radius_miles = row.radius_miles();
        let extra_zips = row.extra_zips();
        let rating = row.rating();
        records.push(RosterRecord {
            full_name,
            email: row.email,
            phone: row.phone,
            base_zip,
            radius_miles,
            extra_zips,
            rating,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(rename = "Base Zip", default, deserialize_with = "empty_string_as_none")]
    base_zip: Option<String>,
    #[serde(
        rename = "Radius Miles",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    radius: Option<String>,
    #[serde(
        rename = "Extra Zips",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    zips: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "empty_string_as_none")]
    rating: Option<String>,
}

impl RosterRow {
    fn radius_miles(&self) -> Option<u32> {
        self.radius
            .as_deref()
            .and_then(|value| value.trim().parse::<u32>().ok())
    }

    /// Extra ZIPs arrive semicolon-separated; malformed fragments reduce to
    /// empty strings and are dropped.
    fn extra_zips(&self) -> Vec<String> {
        let mut zips = Vec::new();
        if let Some(raw) = self.zips.as_deref() {
            for fragment in raw.split(';') {
                let zip = normalize_zip(fragment);
                if !zip.is_empty() && !zips.contains(&zip) {
                    zips.push(zip);
                }
            }
        }
        zips
    }

    fn rating(&self) -> Option<f32> {
        self.rating
            .as_deref()
            .and_then(|value| value.trim().parse::<f32>().ok())
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
