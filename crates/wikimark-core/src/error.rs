//! Error types for engine construction, configuration and the nesting guard.
//!
//! Markup itself never fails to parse: unknown or malformed syntax degrades
//! to literal text. The variants here cover the few places where something
//! outside the document is wrong (a rule pattern, a config file) or where a
//! document nests deeper than the engine allows.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building an engine or rendering a document.
#[derive(Debug, Error)]
pub enum Error {
    /// A rule pattern failed to compile.
    #[error("invalid pattern for rule `{rule}`: {source}")]
    InvalidPattern {
        /// Name of the rule being registered.
        rule: &'static str,
        /// Underlying regex compilation error.
        source: regex::Error,
    },

    /// A rule with the same name is already present in the table.
    #[error("rule `{0}` is already registered")]
    DuplicateRule(&'static str),

    /// Nested blocks or inlines exceeded the configured depth.
    #[error("nesting depth exceeded the limit of {limit}")]
    NestingTooDeep {
        /// The configured maximum depth.
        limit: usize,
    },

    /// The configuration file could not be read.
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration could not be deserialized.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Whether the error comes from document content rather than setup.
    ///
    /// Only the nesting guard is triggered by the document itself; every
    /// other variant means the engine or its configuration is broken.
    pub fn is_document_error(&self) -> bool {
        matches!(self, Error::NestingTooDeep { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
