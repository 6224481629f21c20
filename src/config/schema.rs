use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::operation_processor::DocumentOptions;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub version: String,

    #[serde(default)]
    pub input: Option<InputConfig>,

    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Info, servers and versioning of documents built from route manifests.
    #[serde(default)]
    pub document: DocumentOptions,

    #[serde(default)]
    pub generations: Vec<GenerationConfig>,

    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub formatter: Option<FormatterConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InputConfig {
    #[serde(default)]
    pub format: Option<String>,

    pub source: PathBuf,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GenerationConfig {
    pub generator: String,

    /// Subdirectory of the output directory; defaults to the output directory itself.
    #[serde(rename = "outputDir", default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory of `*.tera` files replacing the built-in templates.
    #[serde(default)]
    pub template: Option<PathBuf>,

    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

impl GenerationConfig {
    pub fn new(generator: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            output_dir: None,
            enabled: true,
            template: None,
            options: HashMap::new(),
        }
    }

    pub fn string_option(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(serde_yaml::Value::as_str)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct HooksConfig {
    #[serde(rename = "beforeGenerate", default)]
    pub before_generate: Vec<String>,

    #[serde(rename = "afterGenerate", default)]
    pub after_generate: Vec<String>,
}

/// External formatter run over the generated files, e.g. `prettier --write`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FormatterConfig {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            input: None,
            output: Some(PathBuf::from("generated")),
            document: DocumentOptions::default(),
            generations: vec![GenerationConfig::new("typescript")],
            hooks: HooksConfig::default(),
            formatter: None,
        }
    }
}
