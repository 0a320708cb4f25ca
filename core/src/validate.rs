//! Command tree validation.
//!
//! Dispatch tolerates duplicate siblings and duplicate flags (the first
//! declaration wins), so these problems go unnoticed at run time. Validation
//! catches them, together with names the flag grammar cannot express, before
//! an application ships.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::*;
//!
//! let app = App::new("uwe").with_command(Command::new("run").with_flag(BoolFlag::new("dl")));
//! assert!(validate_app(&app).is_empty());
//!
//! // `-help` is intercepted by the dispatcher and can never reach the command.
//! let bad = App::new("uwe").with_command(Command::new("run").with_flag(BoolFlag::new("help")));
//! assert!(!validate_app(&bad).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::app::App;
use crate::command::Command;
use crate::flag::Flag;

/// Flag names the dispatcher reserves for help.
pub const RESERVED_FLAG_NAMES: [&str; 2] = ["h", "help"];

/// Command tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Two siblings share a name or alias.
    #[error("duplicate command in scope: {0}")]
    DuplicateCommand(String),
    /// Flag name is empty.
    #[error("flag name cannot be empty")]
    EmptyFlagName,
    /// Flag name starts with a dash or contains `=` or whitespace.
    #[error("invalid flag name: {0}")]
    InvalidFlagName(String),
    /// Two flags on the same command share a name.
    #[error("duplicate flag in scope: {0}")]
    DuplicateFlag(String),
    /// Flag shadows `-h`/`-help`.
    #[error("flag name is reserved for help: {0}")]
    ReservedFlagName(String),
}

impl ValidationError {
    /// Duplicates are tolerated by dispatch (first declared wins); every other
    /// problem makes part of the tree unreachable.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            ValidationError::DuplicateCommand(_) | ValidationError::DuplicateFlag(_)
        )
    }
}

fn has_fatal(errors: &[ValidationError]) -> bool {
    errors.iter().any(|err| !err.is_duplicate())
}

/// Validates the whole tree of `app`.
///
/// Duplicates are collected and the walk goes on; any other problem stops it.
pub fn validate_app(app: &App) -> Vec<ValidationError> {
    let mut errors = validate_flags(&app.root().flags);
    if has_fatal(&errors) {
        return errors;
    }
    errors.extend(validate_commands(app.commands()));
    errors
}

/// Validates `cmd` and everything below it.
pub fn validate_command(cmd: &Command) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if cmd.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_flags(&cmd.flags));
    if has_fatal(&errors) {
        return errors;
    }

    errors.extend(validate_commands(&cmd.subcommands));
    errors
}

fn validate_commands(commands: &[Command]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for cmd in commands {
        for token in std::iter::once(&cmd.name).chain(&cmd.aliases) {
            let token = token.as_str();
            if !token.trim().is_empty() && !seen.insert(token) {
                errors.push(ValidationError::DuplicateCommand(token.to_string()));
            }
        }

        errors.extend(validate_command(cmd));
        if has_fatal(&errors) {
            return errors;
        }
    }

    errors
}

fn validate_flags(flags: &[Arc<dyn Flag>]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for flag in flags {
        let name = flag.name();
        if name.is_empty() {
            errors.push(ValidationError::EmptyFlagName);
            return errors;
        }
        if name.starts_with('-') || name.contains('=') || name.contains(char::is_whitespace) {
            errors.push(ValidationError::InvalidFlagName(name.to_string()));
            return errors;
        }
        if RESERVED_FLAG_NAMES.contains(&name) {
            errors.push(ValidationError::ReservedFlagName(name.to_string()));
            return errors;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateFlag(name.to_string()));
        }
    }

    errors
}
