use indexmap::IndexMap;

use super::Metadata;

/// Name to type lookup table for one generation run.
///
/// Construct one per top-level generation call and pass it by reference; it is
/// never shared between runs.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Metadata>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`.
    pub fn register(&mut self, name: impl Into<String>, metadata: Metadata) {
        self.types.insert(name.into(), metadata);
    }

    pub fn has(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Metadata> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Metadata)> {
        self.types.iter().map(|(name, meta)| (name.as_str(), meta))
    }
}

impl FromIterator<(String, Metadata)> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = (String, Metadata)>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_overwrites() {
        let mut registry = TypeRegistry::new();
        assert!(!registry.has("User"));

        registry.register("User", Metadata::string());
        registry.register("User", Metadata::number());

        assert!(registry.has("User"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("User"), Some(&Metadata::number()));
    }
}
