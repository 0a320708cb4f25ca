//! Error types for manifest loading and binding.

use cmdtree_core::{FlagKind, ValidationError};
use thiserror::Error;

/// Errors that can occur while loading a manifest or building an application
/// from it.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension is neither `.yaml`/`.yml` nor `.json`.
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    /// A command names an action the registry does not know.
    #[error("command '{command}' refers to unknown action '{action}'")]
    UnknownAction { command: String, action: String },

    /// A flag default does not fit the declared kind.
    #[error("invalid default '{value}' for {kind} flag '{flag}'")]
    InvalidDefault {
        flag: String,
        value: String,
        kind: FlagKind,
    },

    /// The built command tree failed validation.
    #[error("invalid command tree: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience alias for results with [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
