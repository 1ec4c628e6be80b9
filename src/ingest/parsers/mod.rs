pub mod csv;
pub mod json;

use crate::error::Result;
use crate::person::PersonRecord;

/// Trait for member-list parsers
pub trait Parser {
    /// Check if this parser can handle the given file extension
    fn can_parse(&self, extension: &str) -> bool;

    /// Parse file content into four-slot person records
    fn parse(&self, content: &str, path: &str) -> Result<Vec<PersonRecord>>;
}

/// Parser registry that selects appropriate parser by extension
pub struct ParserRegistry {
    parsers: Vec<Box<dyn Parser>>,
}

impl ParserRegistry {
    /// Create a new parser registry with all built-in parsers
    pub fn new() -> Self {
        let mut registry = Self {
            parsers: Vec::new(),
        };

        registry.register(Box::new(csv::CsvParser));
        registry.register(Box::new(json::JsonParser));

        registry
    }

    /// Register a parser
    pub fn register(&mut self, parser: Box<dyn Parser>) {
        self.parsers.push(parser);
    }

    /// Find a parser that can handle the given extension
    pub fn find_parser(&self, extension: &str) -> Option<&dyn Parser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(extension))
            .map(|p| p.as_ref())
    }

    /// Parse content using the appropriate parser for the extension
    pub fn parse(&self, content: &str, path: &str, extension: &str) -> Result<Vec<PersonRecord>> {
        let parser = self.find_parser(extension)
            .ok_or_else(|| crate::error::KinmcpError::Parse(
                format!("No parser found for extension: {}", extension)
            ))?;

        let records = parser.parse(content, path)?;
        log::debug!("Parsed {} records from {}", records.len(), path);
        Ok(records)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KinmcpError;

    #[test]
    fn test_parser_registry() {
        let registry = ParserRegistry::new();

        assert!(registry.find_parser("csv").is_some());
        assert!(registry.find_parser("json").is_some());
        assert!(registry.find_parser("xlsx").is_none());
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        let registry = ParserRegistry::new();
        let result = registry.parse("ID\n1", "members.txt", "txt");
        assert!(matches!(result, Err(KinmcpError::Parse(_))));
    }

    #[test]
    fn test_dispatch_by_extension() {
        let registry = ParserRegistry::new();
        let json = r#"[{"id":"1","fullName":"Ali","gender":"مرد"}]"#;
        let records = registry.parse(json, "members.json", "json").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Ali");
    }
}
