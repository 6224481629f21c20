pub mod builtins;
pub mod fingerprint;
pub mod naming;
pub mod render;
pub mod signature;
pub mod typescript;

use std::collections::HashMap;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::parsers::ParsedDocument;

pub use fingerprint::FingerprintIndex;
pub use render::TypeRenderer;
pub use signature::OperationSignature;
pub use typescript::TypeScriptGenerator;

/// One emitted file, relative to the generation's output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub filename: String,
    pub content: String,
}

/// Generator trait - converts a parsed document to target language code
pub trait Generator: Send + Sync {
    /// Unique name of the generator (e.g., "typescript")
    fn name(&self) -> &str;

    /// File extension for generated output (e.g., "ts")
    fn file_extension(&self) -> &str;

    /// Generate every output file for `document`
    fn generate_from_ir(
        &self,
        document: &ParsedDocument,
        config: &GenerationConfig,
    ) -> Result<Vec<GeneratedFile>>;

    /// Validate generator-specific configuration
    fn validate_config(&self, _config: &GenerationConfig) -> Result<()> {
        Ok(())
    }
}

/// Generator registry for managing available code generators
pub struct GeneratorRegistry {
    generators: HashMap<String, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            generators: HashMap::new(),
        };

        registry.register(Box::new(TypeScriptGenerator));

        registry
    }

    pub fn register(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.name().to_string(), generator);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|generator| generator.as_ref())
    }

    pub fn available_generators(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = GeneratorRegistry::new();
        assert_eq!(registry.available_generators(), vec!["typescript"]);
        assert!(registry.get("typescript").is_some());
        assert!(registry.get("zod").is_none());
    }
}
