use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading or merging a settings layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required settings file is missing: {0}")]
    FileNotFound(PathBuf),

    #[error("could not read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("settings file '{path}' is not valid TOML: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not serialize default settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("default settings must serialize to a table, got {0}")]
    NotATable(&'static str),

    #[error("merged settings do not match the expected layout: {0}")]
    DeserializeError(#[from] toml::de::Error),

    #[error("settings reference themselves in a cycle")]
    CircularReference,

    #[error("settings reference '${{{0}}}' does not exist")]
    ReferenceNotFound(String),

    #[error("malformed settings reference '${{{0}}}'")]
    InvalidReferencePath(String),

    #[error("settings reference '${{{0}}}' points at a table or array")]
    NonScalarReference(String),

    #[error("settings reference is missing its closing '}}'")]
    UnclosedReference,
}
