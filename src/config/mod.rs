pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_with_cli_args, parse_config, DEFAULT_CONFIG_PATH};
pub use schema::{Config, FormatterConfig, GenerationConfig, HooksConfig, InputConfig};
