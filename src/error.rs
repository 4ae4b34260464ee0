//! Error types for rule loading and configuration
//!
//! The analysis itself never fails; logical defects in a rule are reported
//! as [`Diagnostic`](crate::Diagnostic)s. These errors cover the edges:
//! reading rules and configuration, and attributes whose declared type the
//! analyzer has no range for.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// QRule logic errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Rule parse error: {0}")]
    RuleParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported attribute type \"{type_tag}\" for {attribute}")]
    UnsupportedType { attribute: String, type_tag: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
