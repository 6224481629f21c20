use super::schema::{Config, InputConfig};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "./.config/typebridge.yaml";

/// Load configuration from file or return default
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config_path = match custom_path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path).map_err(|source| Error::Io {
            path: config_path.clone(),
            source,
        })?;
        let config = parse_config(&content).map_err(|source| Error::Config {
            path: config_path.clone(),
            source,
        })?;
        debug!(path = %config_path.display(), "Loaded config file.");
        Ok(config)
    } else if custom_path.is_some() {
        Err(Error::ConfigNotFound(config_path))
    } else {
        debug!("No config file found, using built-in defaults.");
        Ok(Config::default())
    }
}

pub fn parse_config(content: &str) -> std::result::Result<Config, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Merge config with CLI arguments (CLI takes precedence)
pub fn merge_with_cli_args(
    mut config: Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Config {
    if let Some(source) = input {
        match &mut config.input {
            Some(existing) => existing.source = source,
            None => {
                config.input = Some(InputConfig {
                    format: None,
                    source,
                })
            }
        }
    }

    if let Some(output_path) = output {
        config.output = Some(output_path);
    }

    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::operation_processor::VersioningMode;

    const CONFIG: &str = r#"
version: "1.0"
input:
  source: ./openapi.json
output: ./client
document:
  title: Shop
  versioning:
    mode: header
    headerName: X-Shop-Version
generations:
  - generator: typescript
    outputDir: api
    options:
      baseUrl: https://shop.example.com
  - generator: typescript
    enabled: false
hooks:
  afterGenerate:
    - echo done
formatter:
  command: prettier
  args: ["--write"]
"#;

    #[test]
    fn test_parse_config() {
        let config = parse_config(CONFIG).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("./client")));
        assert_eq!(config.document.title, "Shop");
        assert_eq!(config.document.version, "1.0.0");
        assert_eq!(config.document.versioning.mode, VersioningMode::Header);
        assert_eq!(config.document.versioning.header_name, "X-Shop-Version");
        assert_eq!(config.generations.len(), 2);
        assert_eq!(config.generations[0].output_dir, Some(PathBuf::from("api")));
        assert_eq!(
            config.generations[0].string_option("baseUrl"),
            Some("https://shop.example.com")
        );
        assert!(!config.generations[1].enabled);
        assert_eq!(config.hooks.after_generate, vec!["echo done"]);
        assert_eq!(config.formatter.unwrap().args, vec!["--write"]);
    }

    #[test]
    fn test_cli_args_win() {
        let config = parse_config(CONFIG).unwrap();
        let merged = merge_with_cli_args(
            config,
            Some(PathBuf::from("other.yaml")),
            Some(PathBuf::from("out")),
        );
        assert_eq!(merged.input.unwrap().source, PathBuf::from("other.yaml"));
        assert_eq!(merged.output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_missing_custom_path_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/typebridge.yaml"))).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}
