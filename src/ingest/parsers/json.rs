use super::Parser;
use crate::error::{Result, KinmcpError};
use crate::person::PersonRecord;
use serde_json::Value as JsonValue;

/// JSON parser for exported member lists.
///
/// Accepts a bare array of records or an object with a `persons` array.
pub struct JsonParser;

impl Parser for JsonParser {
    fn can_parse(&self, extension: &str) -> bool {
        extension == "json"
    }

    fn parse(&self, content: &str, path: &str) -> Result<Vec<PersonRecord>> {
        let json_value: JsonValue = serde_json::from_str(content)
            .map_err(|e| KinmcpError::Parse(format!("JSON parse error in {}: {}", path, e)))?;

        let items = match json_value {
            JsonValue::Array(items) => items,
            JsonValue::Object(mut map) => match map.remove("persons") {
                Some(JsonValue::Array(items)) => items,
                _ => {
                    return Err(KinmcpError::Parse(format!(
                        "Expected an array of persons in {}",
                        path
                    )))
                }
            },
            _ => {
                return Err(KinmcpError::Parse(format!(
                    "Expected an array of persons in {}",
                    path
                )))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<PersonRecord>(item).map_err(|e| {
                    KinmcpError::Parse(format!("Invalid person #{} in {}: {}", index + 1, path, e))
                })
            })
            .collect()
    }
}
