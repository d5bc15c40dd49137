//! Error type shared by the loader, pipeline, writer and config layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum RemapError {
    /// The input file is missing or unreadable.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be written or moved into place.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input could not be parsed as delimited text.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A category label had no taxonomy entry and the policy is `reject`.
    #[error("unknown category '{label}' in row {row}")]
    UnknownCategory { label: String, row: usize },

    /// The strip pattern did not compile.
    #[error("invalid strip pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file is not valid TOML for [`crate::Config`].
    #[error("failed to parse config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
