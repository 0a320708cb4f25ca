//! The application: root of the command tree plus its metadata.

use std::io::{self, Write};

use crate::command::Command;
use crate::context::Context;
use crate::dispatch::{Outcome, dispatch};
use crate::error::Result;
use crate::flag::Flag;
use crate::help::{HelpTarget, render_help};

/// A command-line application.
///
/// The application owns a root [`Command`] named after it. The root carries
/// application-level flags and an optional action, and its children are the
/// top-level commands.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{App, Command, Outcome, StringFlag};
///
/// let app = App::new("uwe").with_command(
///     Command::new("run")
///         .with_aliases(["r", "rnu", "nur"])
///         .with_flag(StringFlag::new("m").with_default("moe"))
///         .with_action(|ctx| assert_eq!(ctx.string().get("m"), "32")),
/// );
///
/// let mut out = Vec::new();
/// let outcome = app.run_with(&["uwe", "r", "-m", "32"], &mut out).unwrap();
/// assert!(matches!(outcome, Outcome::Invoked(ctx) if ctx.command == "run"));
/// ```
#[derive(Debug, Clone)]
pub struct App {
    /// Version shown in the default help.
    pub version: String,
    /// Description shown in the default help.
    pub description: String,
    /// Static help text printed verbatim instead of a template.
    pub help: Option<String>,
    /// Custom help template, evaluated against the application's fields.
    pub help_template: Option<String>,
    root: Command,
}

impl App {
    pub fn new(name: &str) -> Self {
        Self {
            version: String::new(),
            description: String::new(),
            help: None,
            help_template: None,
            root: Command::new(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    /// The root command: application flags, action and top-level commands.
    pub fn root(&self) -> &Command {
        &self.root
    }

    /// Mutable access to the root, for hosts assembling an application from
    /// declarations rather than builder calls.
    pub fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }

    /// Top-level commands in declaration order.
    pub fn commands(&self) -> &[Command] {
        &self.root.subcommands
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    pub fn with_help_template(mut self, template: &str) -> Self {
        self.help_template = Some(template.to_string());
        self
    }

    /// Declares an application-level flag.
    pub fn with_flag(mut self, flag: impl Flag + 'static) -> Self {
        self.root = self.root.with_flag(flag);
        self
    }

    /// Sets the action run when input names no command.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.root = self.root.with_action(action);
        self
    }

    pub fn with_command(mut self, cmd: Command) -> Self {
        self.root.add_subcommand(cmd);
        self
    }

    /// Appends a top-level command.
    pub fn add_command(&mut self, cmd: Command) {
        self.root.add_subcommand(cmd);
    }

    /// Dispatches a full argument vector (program name first), writing help
    /// to standard output.
    ///
    /// # Errors
    ///
    /// See [`dispatch`].
    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<()> {
        let mut stdout = io::stdout();
        self.run_with(args, &mut stdout).map(|_| ())
    }

    /// Dispatches a full argument vector, writing help to `out`.
    pub fn run_with<S: AsRef<str>, W: Write + ?Sized>(
        &self,
        args: &[S],
        out: &mut W,
    ) -> Result<Outcome> {
        dispatch(self, args, out)
    }

    /// Writes the application help to `out`.
    pub fn print_help<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        render_help(self, HelpTarget::App, out)
    }
}
