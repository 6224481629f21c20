pub mod openapi_parser;
pub mod schema_ir;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub use openapi_parser::OpenApiParser;
pub use schema_ir::*;

/// Input parser trait - converts a source document into the reverse-compiler IR
pub trait InputParser: Send + Sync {
    /// Name of the input format (e.g., "openapi")
    fn format_name(&self) -> &str;

    /// File extensions this parser supports
    fn supported_extensions(&self) -> Vec<&str>;

    /// Parse document text
    fn parse_str(&self, content: &str) -> Result<ParsedDocument>;

    /// Read and parse a document from disk
    fn parse(&self, source: &Path) -> Result<ParsedDocument> {
        let content = fs::read_to_string(source).map_err(|source_err| Error::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        self.parse_str(&content)
    }
}

/// Parser registry for managing available input parsers
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn InputParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
        };

        registry.register(Box::new(OpenApiParser));

        registry
    }

    pub fn register(&mut self, parser: Box<dyn InputParser>) {
        self.parsers.insert(parser.format_name().to_string(), parser);
    }

    pub fn get(&self, format: &str) -> Option<&dyn InputParser> {
        self.parsers.get(format).map(|parser| parser.as_ref())
    }

    /// Auto-detect format from file extension
    pub fn detect_format(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?;

        self.parsers
            .values()
            .find(|parser| parser.supported_extensions().contains(&ext))
            .map(|parser| parser.format_name())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_format() {
        let registry = ParserRegistry::new();
        assert_eq!(registry.detect_format(&PathBuf::from("api.yaml")), Some("openapi"));
        assert_eq!(registry.detect_format(&PathBuf::from("api.json")), Some("openapi"));
        assert_eq!(registry.detect_format(&PathBuf::from("api.graphql")), None);
        assert!(registry.get("openapi").is_some());
    }

    #[test]
    fn test_parse_missing_file() {
        let registry = ParserRegistry::new();
        let parser = registry.get("openapi").unwrap();
        assert!(matches!(
            parser.parse(Path::new("/nonexistent/api.json")),
            Err(Error::Io { .. })
        ));
    }
}
