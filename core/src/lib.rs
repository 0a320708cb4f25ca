//! Command trees, typed flags and dispatch for command-line applications.
//!
//! An [`App`] owns a tree of [`Command`]s. Each command has a name, aliases,
//! typed flags ([`StringFlag`], [`BoolFlag`], [`IntFlag`], [`UintFlag`]),
//! child commands and an optional action. Dispatching an argument vector
//! walks the tree, parses the flags of the matched command, and invokes its
//! action with a [`Context`] holding the positional arguments and every
//! declared flag's value.
//!
//! - [`resolve`] walks command path tokens to the deepest matching command.
//! - [`split_args`] separates flags from positional arguments against a
//!   [`FlagSet`].
//! - [`dispatch`] runs the whole pipeline, or renders help via [`help`]
//!   (Jinja templates rendered with `minijinja`).
//! - [`validate_app`] lints a tree for duplicate names and reserved flags.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//!
//! let app = App::new("uwe").with_command(
//!     Command::new("run")
//!         .with_aliases(["r", "rnu", "nur"])
//!         .with_usage("run a thing")
//!         .with_flag(StringFlag::new("m").with_default("moe"))
//!         .with_flag(BoolFlag::new("dl")),
//! );
//!
//! let resolution = resolve(app.root(), &["rnu"]);
//! assert_eq!(resolution.command.name, "run");
//!
//! let mut set = resolution.command.flag_set();
//! let rest = split_args(&mut set, &["-dl", "-m", "32", "file"]).unwrap();
//! assert_eq!(rest, vec!["file"]);
//! assert_eq!(set.get("m"), Some(&FlagValue::from("32")));
//! assert!(validate_app(&app).is_empty());
//! ```

mod app;
mod command;
mod context;
mod dispatch;
mod error;
mod flag;
mod flagset;
pub mod help;
mod resolve;
mod split;
mod validate;

pub use app::App;
pub use command::{Action, Command};
pub use context::{Args, Context, FlagAccessor, FlagType};
pub use dispatch::{ARGV_OFFSET, Outcome, dispatch, resolved_flags};
pub use error::{CliError, Result};
pub use flag::{BoolFlag, Flag, FlagKind, FlagValue, IntFlag, StringFlag, UintFlag};
pub use flagset::{FlagMap, FlagSet};
pub use help::{HelpTarget, render_help, render_help_string};
pub use resolve::{Resolution, resolve, resolved_path};
pub use split::{
    TERMINATOR, before_terminator, command_path_len, is_flag_token, is_help_token, split_args,
};
pub use validate::{RESERVED_FLAG_NAMES, ValidationError, validate_app, validate_command};
