//! One end-to-end dispatch: resolve, parse, invoke.
//!
//! ```text
//! Start -> (help?) -> ResolveCommand -> (help flag?) -> ParseFlags -> Invoke | Error
//! ```
//!
//! Either resolution and parsing succeed and the action runs exactly once, or
//! an error is returned and no action runs. Panics inside an action are not
//! caught.

use std::io::Write;

use tracing::debug;

use crate::app::App;
use crate::command::Command;
use crate::context::{Args, Context};
use crate::error::{CliError, Result};
use crate::flagset::{FlagMap, FlagSet};
use crate::help::{HelpTarget, render_help};
use crate::resolve::{resolve, resolved_path};
use crate::split::{before_terminator, command_path_len, is_help_token, split_args};

/// Index of the first real token: `args[0]` is the program name.
pub const ARGV_OFFSET: usize = 1;

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Help text was written; no action ran.
    Help,
    /// The action of the resolved command ran with this context.
    Invoked(Context),
}

/// Dispatches `args` (program name first) against `app`, writing any help
/// output to `out`.
///
/// With no tokens after the program name, an application whose root has an
/// action and no commands runs that action; any other application prints its
/// help.
///
/// # Errors
///
/// - [`CliError::CommandNotFound`] when a command path segment matches nothing.
/// - [`CliError::NoCommandProvided`] when no command was named and the
///   application has no action.
/// - [`CliError::CommandNotRegistered`] when the resolved command has no action.
/// - Flag errors from [`split_args`], template errors from help rendering.
pub fn dispatch<S: AsRef<str>, W: Write + ?Sized>(
    app: &App,
    args: &[S],
    out: &mut W,
) -> Result<Outcome> {
    let tokens = args.get(ARGV_OFFSET..).unwrap_or_default();
    let root = app.root();

    let flag_only = root.is_invokable() && root.subcommands.is_empty();
    let asks_help = tokens.first().is_some_and(|t| is_help_token(t.as_ref()));
    if (tokens.is_empty() && !flag_only) || asks_help {
        debug!(app = app.name(), "rendering application help");
        render_help(app, HelpTarget::App, out)?;
        return Ok(Outcome::Help);
    }

    let path = &tokens[..command_path_len(tokens)];
    let resolution = resolve(root, path);
    if let Some(token) = resolution.unmatched {
        return Err(CliError::CommandNotFound(token.to_string()));
    }
    let command = resolution.command;
    let at_root = resolution.depth == 0;
    debug!(command = %command.name, depth = resolution.depth, "resolved command");

    let rest = &tokens[resolution.depth..];
    if before_terminator(rest).iter().any(|t| is_help_token(t.as_ref())) {
        let target = if at_root {
            HelpTarget::App
        } else {
            HelpTarget::Command {
                command,
                path: resolved_path(root, &path[..resolution.depth]),
            }
        };
        render_help(app, target, out)?;
        return Ok(Outcome::Help);
    }

    if at_root && !root.is_invokable() {
        return Err(CliError::NoCommandProvided);
    }

    let mut set = command.flag_set();
    let positional = split_args(&mut set, rest)?;

    let Some(action) = &command.action else {
        return Err(CliError::CommandNotRegistered(command.name.clone()));
    };

    let context = Context {
        command: command.name.clone(),
        args: Args::from(positional),
        flags: resolved_flags(command, &set),
    };
    debug!(
        command = %context.command,
        args = context.args.num(),
        "invoking action"
    );
    action(&context);
    Ok(Outcome::Invoked(context))
}

/// Every declared flag of `command` with its resolved value. When two
/// declarations share a name the first one wins.
pub fn resolved_flags(command: &Command, set: &FlagSet) -> FlagMap {
    let mut flags = FlagMap::new();
    for flag in &command.flags {
        flags
            .entry(flag.name().to_string())
            .or_insert_with(|| flag.resolved_value(set));
    }
    flags
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::flag::{BoolFlag, FlagValue, IntFlag, StringFlag, UintFlag};

    fn recorder() -> (Arc<Mutex<Vec<Context>>>, impl Fn(&Context) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |ctx: &Context| {
            sink.lock().unwrap().push(ctx.clone());
        })
    }

    fn run(app: &App, args: &[&str]) -> (Result<Outcome>, String) {
        let mut out = Vec::new();
        let result = dispatch(app, args, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_argv_renders_help() {
        let (calls, action) = recorder();
        let app = App::new("uwe").with_command(Command::new("run").with_action(action));

        let empty: [&str; 0] = [];
        let (result, out) = run(&app, &empty);
        assert_eq!(result.unwrap(), Outcome::Help);
        assert!(out.starts_with("uwe"));

        let (result, _) = run(&app, &[""]);
        assert_eq!(result.unwrap(), Outcome::Help);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_flag_only_app_runs_root_action() {
        let (calls, action) = recorder();
        let app = App::new("uwe")
            .with_flag(StringFlag::new("m").with_default("moe"))
            .with_action(action);

        run(&app, &[""]).0.unwrap();
        run(&app, &["", "-m", "32", "extra"]).0.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].string().get("m"), "moe");
        assert_eq!(calls[0].command, "uwe");
        assert_eq!(calls[1].string().get("m"), "32");
        assert_eq!(calls[1].args.as_slice(), ["extra"]);
    }

    #[test]
    fn test_help_flag_after_command_renders_command_help() {
        let (calls, action) = recorder();
        let app = App::new("uwe").with_command(
            Command::new("run")
                .with_flag(StringFlag::new("m").with_usage("message"))
                .with_action(action),
        );

        let (result, out) = run(&app, &["", "run", "-x", "--help"]);
        assert_eq!(result.unwrap(), Outcome::Help);
        assert!(out.starts_with("Usage: uwe run"), "{out}");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_help_after_terminator_is_positional() {
        let (calls, action) = recorder();
        let app = App::new("uwe").with_command(Command::new("run").with_action(action));

        let (result, out) = run(&app, &["", "run", "--", "-h"]);
        assert!(matches!(result.unwrap(), Outcome::Invoked(_)));
        assert!(out.is_empty());
        assert_eq!(calls.lock().unwrap()[0].args.as_slice(), ["-h"]);
    }

    #[test]
    fn test_no_command_provided() {
        let app = App::new("uwe").with_command(Command::new("run").with_action(|_| {}));
        let err = run(&app, &["", "--", "x"]).0.unwrap_err();
        assert!(matches!(err, CliError::NoCommandProvided));
    }

    #[test]
    fn test_unknown_flag_skips_action() {
        let (calls, action) = recorder();
        let app = App::new("uwe").with_command(Command::new("run").with_action(action));

        let err = run(&app, &["", "run", "-z"]).0.unwrap_err();
        assert!(matches!(err, CliError::FlagNotFound(name) if name == "z"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parent_flags_are_not_inherited() {
        let app = App::new("uwe").with_command(
            Command::new("remote")
                .with_flag(BoolFlag::new("v"))
                .with_subcommand(Command::new("add").with_action(|_| {})),
        );
        let err = run(&app, &["", "remote", "add", "-v"]).0.unwrap_err();
        assert!(matches!(err, CliError::FlagNotFound(name) if name == "v"));
    }

    #[test]
    fn test_defaults_per_kind() {
        let (calls, action) = recorder();
        let app = App::new("uwe").with_command(
            Command::new("run")
                .with_flag(StringFlag::new("s"))
                .with_flag(BoolFlag::new("b"))
                .with_flag(IntFlag::new("i"))
                .with_flag(UintFlag::new("u"))
                .with_action(action),
        );
        run(&app, &["", "run"]).0.unwrap();

        let calls = calls.lock().unwrap();
        let flags = &calls[0].flags;
        assert_eq!(flags.get("s"), Some(&FlagValue::String(String::new())));
        assert_eq!(flags.get("b"), Some(&FlagValue::Bool(false)));
        assert_eq!(flags.get("i"), Some(&FlagValue::Int(0)));
        assert_eq!(flags.get("u"), Some(&FlagValue::Uint(0)));
    }

    #[test]
    fn test_resolved_flags_first_declaration_wins() {
        let cmd = Command::new("c")
            .with_flag(StringFlag::new("m").with_default("first"))
            .with_flag(StringFlag::new("m").with_default("second"));
        let set = cmd.flag_set();
        let flags = resolved_flags(&cmd, &set);
        assert_eq!(flags.get("m"), Some(&FlagValue::from("first")));
    }
}
