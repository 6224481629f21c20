use std::path::PathBuf;

/// Errors surfaced by the library.
///
/// Only document-ingestion boundaries and IO fail hard. Everything inside a
/// schema tree degrades to a permissive schema instead of producing an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed JSON document: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("malformed YAML document: {0}")]
    MalformedYaml(#[source] serde_yaml::Error),

    #[error("document root must be an object")]
    NotAnObject,

    #[error("malformed route manifest: {0}")]
    MalformedManifest(#[source] serde_json::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to render template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    #[error("invalid option for generator '{generator}': {message}")]
    InvalidOption { generator: String, message: String },

    #[error("config file not found: {0:?}")]
    ConfigNotFound(PathBuf),

    #[error("failed to parse config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("hook failed: {command}\nStderr: {stderr}")]
    Hook { command: String, stderr: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
