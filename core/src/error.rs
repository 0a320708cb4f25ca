//! Error types for dispatch.
//!
//! Every failure detected while resolving, parsing or rendering help is
//! returned as a [`CliError`]. None of them are raised before an action runs:
//! when dispatch fails, no action has been invoked.

use thiserror::Error;

use minijinja::ErrorKind;

use crate::flag::FlagKind;

/// Errors that can occur during a dispatch.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input named no command and the application has no action of its own.
    #[error("no command provided")]
    NoCommandProvided,

    /// A command path segment did not match any child name or alias.
    #[error("command {0} not found")]
    CommandNotFound(String),

    /// The resolved command exists but has no action to invoke.
    #[error("command {0} not registered")]
    CommandNotRegistered(String),

    /// A flag token names a flag the resolved command does not declare.
    #[error("flag '{0}' not found")]
    FlagNotFound(String),

    /// A non-boolean flag was given without a value.
    #[error("flag '{0}' needs a value")]
    MissingFlagValue(String),

    /// The value given for a flag does not parse as its declared kind.
    #[error("invalid {kind} value '{value}' for flag '{flag}'")]
    InvalidFlagValue {
        flag: String,
        value: String,
        kind: FlagKind,
    },

    /// Malformed flag token such as `---x` or `-=x`.
    #[error("bad flag syntax: {0}")]
    InvalidFlagSyntax(String),

    /// A help template could not be parsed.
    #[error("error parsing help template: {0}")]
    TemplateParse(String),

    /// A help template failed while rendering (e.g. unknown field).
    #[error("error executing help template: {0}")]
    TemplateExecution(String),

    /// Writing help output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<minijinja::Error> for CliError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            ErrorKind::SyntaxError => CliError::TemplateParse(err.to_string()),
            _ => CliError::TemplateExecution(err.to_string()),
        }
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
