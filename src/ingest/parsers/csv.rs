use std::collections::HashMap;

use super::Parser;
use crate::error::{Result, KinmcpError};
use crate::person::{Gender, Person, PersonRecord};

/// Column headers every member CSV must carry.
pub const CSV_HEADERS: [&str; 10] = [
    "ID",
    "FullName",
    "Gender",
    "FatherID",
    "MotherID",
    "Spouse1_ID",
    "Spouse2_ID",
    "Spouse3_ID",
    "Spouse4_ID",
    "BirthYear",
];

/// CSV parser for member lists.
///
/// Rows without a name or with an unknown gender are skipped with a warning
/// instead of failing the whole file.
pub struct CsvParser;

impl Parser for CsvParser {
    fn can_parse(&self, extension: &str) -> bool {
        extension == "csv"
    }

    fn parse(&self, content: &str, path: &str) -> Result<Vec<PersonRecord>> {
        let content = content.trim_start_matches('\u{feff}');
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();
        let missing: Vec<&str> = CSV_HEADERS
            .iter()
            .copied()
            .filter(|h| !headers.iter().any(|header| header == h))
            .collect();
        if !missing.is_empty() {
            return Err(KinmcpError::Parse(format!(
                "Missing CSV headers in {}: {}",
                path,
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let values = result.map_err(|e| csv_error(path, e))?;
            let line_no = values.position().map(|p| p.line()).unwrap_or_default();

            let row: HashMap<&str, String> = headers
                .iter()
                .map(String::as_str)
                .zip(values.iter())
                .filter(|(_, value)| !value.is_empty())
                .map(|(header, value)| (header, value.to_string()))
                .collect();
            if row.is_empty() {
                continue;
            }

            let (full_name, gender) = match (row.get("FullName"), row.get("Gender")) {
                (Some(name), Some(gender)) => (name.clone(), gender.as_str()),
                _ => {
                    log::warn!("Skipping row {} in {}: missing FullName or Gender", line_no, path);
                    continue;
                }
            };
            let gender = match Gender::parse(gender) {
                Some(gender) => gender,
                None => {
                    log::warn!("Skipping row {} in {}: invalid Gender '{}'", line_no, path, gender);
                    continue;
                }
            };

            let birth_year = row.get("BirthYear").and_then(|year| match year.parse::<i32>() {
                Ok(year) => Some(year),
                Err(_) => {
                    log::warn!("Ignoring BirthYear '{}' on row {} in {}", year, line_no, path);
                    None
                }
            });

            records.push(PersonRecord {
                id: row.get("ID").cloned().unwrap_or_default(),
                full_name,
                gender,
                father_id: row.get("FatherID").cloned(),
                mother_id: row.get("MotherID").cloned(),
                spouse1_id: row.get("Spouse1_ID").cloned(),
                spouse2_id: row.get("Spouse2_ID").cloned(),
                spouse3_id: row.get("Spouse3_ID").cloned(),
                spouse4_id: row.get("Spouse4_ID").cloned(),
                birth_year,
            });
        }

        Ok(records)
    }
}

fn csv_error(path: &str, err: ::csv::Error) -> KinmcpError {
    KinmcpError::Parse(format!("Invalid CSV in {}: {}", path, err))
}

/// Render persons as a CSV document with [`CSV_HEADERS`], readable by [`CsvParser`].
///
/// Cells holding commas, quotes or line breaks are quoted.
pub fn to_csv<'a, I>(persons: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Person>,
{
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| csv_error("export", e))?;

    for person in persons {
        let record = PersonRecord::from(person.clone());
        writer
            .write_record([
                record.id,
                record.full_name,
                record.gender.as_str().to_string(),
                record.father_id.unwrap_or_default(),
                record.mother_id.unwrap_or_default(),
                record.spouse1_id.unwrap_or_default(),
                record.spouse2_id.unwrap_or_default(),
                record.spouse3_id.unwrap_or_default(),
                record.spouse4_id.unwrap_or_default(),
                record.birth_year.map(|y| y.to_string()).unwrap_or_default(),
            ])
            .map_err(|e| csv_error("export", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| KinmcpError::Parse(format!("CSV export failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| KinmcpError::Parse(format!("CSV export is not UTF-8: {}", e)))
}
