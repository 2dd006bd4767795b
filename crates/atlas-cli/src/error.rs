//! Error types for the atlas command line.
//!
//! Uses `thiserror` for typed errors that surface through every stage of a
//! run: environment parsing, configuration, payload decoding, and output.

use atlas_core::{ConfigError, SourceError};

/// Errors that can occur during a command line run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A required environment variable is not set.
    #[error("missing required env var {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but cannot be interpreted.
    #[error("invalid {name}: {reason}")]
    InvalidVar {
        /// The offending variable.
        name: &'static str,
        /// What is wrong with its value.
        reason: String,
    },

    /// The YAML configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An events or categories payload could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The display payload could not be serialized.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Writing the display payload failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
