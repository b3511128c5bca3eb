use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required profile file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read profile file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse profile file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to deserialize section '{section}': {source}")]
    DeserializeError {
        section: String,
        source: toml::de::Error,
    },

    #[error("environment source '{0}' has an empty separator")]
    EmptyEnvSeparator(String),

    #[error("section '{0}' is not a table")]
    SectionNotTable(String),

    #[error("circular reference through '{0}'")]
    CircularReference(String),

    #[error("referenced path not found: {0}")]
    ReferenceNotFound(String),

    #[error("invalid reference path: {0}")]
    InvalidReferencePath(String),

    #[error("cannot reference non-scalar value: {0}")]
    NonScalarReference(String),

    #[error("unclosed reference (missing '}}')")]
    UnclosedReference,
}
