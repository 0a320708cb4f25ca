//! Partitioning of raw tokens into positional arguments and flag assignments.
//!
//! Tokens are classified in a single left-to-right pass, so flags may come
//! before, after or between positional arguments:
//!
//! - `--` ends flag parsing; everything after it is positional.
//! - `-` on its own is positional.
//! - A negative number (`-5`, `-0.5`) that is not a declared flag name is
//!   positional.
//! - `-name`, `--name`, `-name=value` and `--name=value` are flags. Boolean
//!   flags only take a value through `=value`; other flags take the inline
//!   value or else the next token, whatever it looks like.
//! - A flag given twice keeps the last value.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{FlagSet, FlagValue, split_args};
//!
//! let mut set = FlagSet::new();
//! set.define("m", FlagValue::from("moe"), "");
//! set.define("dl", FlagValue::from(false), "");
//!
//! let args = split_args(&mut set, &["arg1", "-m", "value", "arg2", "-dl"]).unwrap();
//! assert_eq!(args, vec!["arg1", "arg2"]);
//! assert_eq!(set.get("m"), Some(&FlagValue::from("value")));
//! assert_eq!(set.get("dl"), Some(&FlagValue::from(true)));
//! ```

use tracing::trace;

use crate::error::{CliError, Result};
use crate::flag::FlagKind;
use crate::flagset::FlagSet;

/// Token that ends flag parsing.
pub const TERMINATOR: &str = "--";

/// Returns `true` if `token` is shaped like a flag (`-x`, `--x`, ...).
pub fn is_flag_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Returns `true` for the built-in help flags: `-h`, `-help`, `--h`, `--help`.
pub fn is_help_token(token: &str) -> bool {
    matches!(token, "-h" | "-help" | "--h" | "--help")
}

/// Number of leading tokens that can name commands: everything before the
/// first flag-shaped token or the terminator.
pub fn command_path_len<S: AsRef<str>>(tokens: &[S]) -> usize {
    tokens
        .iter()
        .position(|t| {
            let t = t.as_ref();
            t == TERMINATOR || is_flag_token(t)
        })
        .unwrap_or(tokens.len())
}

/// Tokens that precede the terminator, i.e. the ones that can still be flags.
pub fn before_terminator<S: AsRef<str>>(tokens: &[S]) -> &[S] {
    let end = tokens
        .iter()
        .position(|t| t.as_ref() == TERMINATOR)
        .unwrap_or(tokens.len());
    &tokens[..end]
}

fn is_negative_number(token: &str) -> bool {
    let Some(rest) = token.strip_prefix('-') else {
        return false;
    };
    rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') && rest.parse::<f64>().is_ok()
}

/// Consumes `tokens`, assigning flags into `set`, and returns the positional
/// arguments in order.
///
/// # Errors
///
/// - [`CliError::FlagNotFound`] for a flag `set` does not declare.
/// - [`CliError::MissingFlagValue`] when a non-boolean flag is last.
/// - [`CliError::InvalidFlagValue`] when a value does not fit the kind.
/// - [`CliError::InvalidFlagSyntax`] for tokens like `---x` or `-=x`.
pub fn split_args<S: AsRef<str>>(set: &mut FlagSet, tokens: &[S]) -> Result<Vec<String>> {
    let mut positional = Vec::new();
    let mut iter = tokens.iter().map(|t| t.as_ref());

    while let Some(token) = iter.next() {
        if token == TERMINATOR {
            positional.extend(iter.by_ref().map(str::to_string));
            break;
        }
        if !is_flag_token(token) {
            positional.push(token.to_string());
            continue;
        }

        let body = token
            .strip_prefix("--")
            .unwrap_or_else(|| &token[1..]);
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        if is_negative_number(token) && !set.contains(name) {
            positional.push(token.to_string());
            continue;
        }
        if name.is_empty() || name.starts_with('-') {
            return Err(CliError::InvalidFlagSyntax(token.to_string()));
        }

        let kind = set
            .kind(name)
            .ok_or_else(|| CliError::FlagNotFound(name.to_string()))?;
        let raw = match (kind, inline) {
            (_, Some(value)) => value,
            (FlagKind::Bool, None) => "true",
            (_, None) => iter
                .next()
                .ok_or_else(|| CliError::MissingFlagValue(name.to_string()))?,
        };
        set.set(name, raw)?;
        trace!(flag = name, value = raw, "assigned flag");
    }

    Ok(positional)
}
