//! Errors raised while locating and parsing the mapping document.
//!
//! Reconciliation itself never returns an error: each entry's result is an
//! [`ReconcileOutcome`](crate::resources::ReconcileOutcome), and the I/O
//! failures of conflict resolution are
//! [`ResourceError`](crate::resources::error::ResourceError)s.  What is left
//! are problems with the input, which abort a run before anything is
//! touched.  Command handlers convert [`ConfigError`] to [`anyhow::Error`]
//! via `?`.

use thiserror::Error;

/// Errors that arise from loading the mapping document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The mapping document does not exist.
    #[error("Mapping file not found: {0}")]
    MappingNotFound(String),

    /// The document is not valid YAML/TOML, or its top level is not a mapping.
    #[error("Invalid mapping syntax in {file}: {message}")]
    InvalidSyntax {
        /// Path of the offending document.
        file: String,
        /// Parser message.
        message: String,
    },

    /// A key or value has a type that cannot name a path.
    #[error("Invalid entry '{key}' in {file}: {message}")]
    InvalidEntry {
        /// Path of the offending document.
        file: String,
        /// The entry's key, rendered as text.
        key: String,
        /// What is wrong with the entry.
        message: String,
    },

    /// A target was declared without a source.
    #[error("No source given for target '{target}' in {file}")]
    SourceNotGiven {
        /// Path of the offending document.
        file: String,
        /// The target that has no source.
        target: String,
    },

    /// An I/O error occurred while reading the document or its directory.
    #[error("IO error reading mapping file {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
