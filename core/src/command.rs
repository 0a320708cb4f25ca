//! Command tree nodes.
//!
//! A [`Command`] owns its flags and its child commands; the tree is built once
//! at startup and only read during dispatch.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Command, StringFlag};
//!
//! let run = Command::new("run")
//!     .with_aliases(["r", "rnu"])
//!     .with_description("simply run")
//!     .with_flag(StringFlag::new("m").with_default("moe"))
//!     .with_action(|ctx| println!("m = {}", ctx.string().get("m")));
//!
//! let root = Command::new("uwe").with_subcommand(run);
//! assert_eq!(root.find_subcommand("rnu").unwrap().name, "run");
//! assert!(root.find_subcommand("walk").is_none());
//! assert!(root.subcommands[0].is_invokable());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::flag::Flag;
use crate::flagset::FlagSet;

/// Callback invoked when dispatch resolves to a command.
pub type Action = Arc<dyn Fn(&Context) + Send + Sync>;

/// A named node of the command tree.
#[derive(Clone, Default)]
pub struct Command {
    /// Name, unique among siblings.
    pub name: String,
    /// Alternative names, unique among siblings.
    pub aliases: Vec<String>,
    /// Usage string appended to the help usage line (e.g. `[file]...`).
    pub usage: String,
    /// One-line description.
    pub short: String,
    /// Long description.
    pub description: String,
    /// Flags declared on this command. Not inherited by children.
    pub flags: Vec<Arc<dyn Flag>>,
    /// Child commands, in declaration order.
    pub subcommands: Vec<Command>,
    /// Action; `None` makes this a routing-only node.
    pub action: Option<Action>,
    /// Static help text printed verbatim instead of a template.
    pub help: Option<String>,
    /// Custom help template.
    pub help_template: Option<String>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn with_short(mut self, short: &str) -> Self {
        self.short = short.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_flag(mut self, flag: impl Flag + 'static) -> Self {
        self.flags.push(Arc::new(flag));
        self
    }

    pub fn with_subcommand(mut self, sub: Command) -> Self {
        self.subcommands.push(sub);
        self
    }

    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&Context) + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
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

    /// Appends a child command.
    pub fn add_subcommand(&mut self, sub: Command) {
        self.subcommands.push(sub);
    }

    /// Returns `true` if `token` is this command's name or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|alias| alias == token)
    }

    /// Finds a direct child by name or alias. The first declared match wins.
    pub fn find_subcommand(&self, token: &str) -> Option<&Command> {
        self.subcommands.iter().find(|sub| sub.matches(token))
    }

    /// Finds a declared flag by name.
    pub fn find_flag(&self, name: &str) -> Option<&dyn Flag> {
        self.flags
            .iter()
            .find(|flag| flag.name() == name)
            .map(|flag| &**flag)
    }

    /// Returns `true` if this command has an action.
    pub fn is_invokable(&self) -> bool {
        self.action.is_some()
    }

    /// Builds a fresh parse target holding only this command's flags.
    pub fn flag_set(&self) -> FlagSet {
        let mut set = FlagSet::new();
        for flag in &self.flags {
            flag.register_into(&mut set);
        }
        set
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("usage", &self.usage)
            .field("short", &self.short)
            .field("description", &self.description)
            .field("flags", &self.flags)
            .field("subcommands", &self.subcommands)
            .field("action", &self.action.as_ref().map(|_| "<action>"))
            .field("help", &self.help)
            .field("help_template", &self.help_template)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::{BoolFlag, FlagKind, IntFlag};

    #[test]
    fn test_first_declared_match_wins() {
        let root = Command::new("app")
            .with_subcommand(Command::new("one").with_alias("x"))
            .with_subcommand(Command::new("two").with_alias("x"));
        assert_eq!(root.find_subcommand("x").unwrap().name, "one");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let cmd = Command::new("Run").with_alias("r");
        assert!(cmd.matches("Run"));
        assert!(cmd.matches("r"));
        assert!(!cmd.matches("run"));
        assert!(!cmd.matches("R"));
    }

    #[test]
    fn test_flag_set_is_built_from_own_flags() {
        let child = Command::new("child").with_flag(IntFlag::new("n"));
        let parent = Command::new("parent")
            .with_flag(BoolFlag::new("v"))
            .with_subcommand(child);

        let set = parent.subcommands[0].flag_set();
        assert!(set.contains("n"));
        assert!(!set.contains("v"));
        assert_eq!(set.kind("n"), Some(FlagKind::Int));
    }

    #[test]
    fn test_find_flag() {
        let cmd = Command::new("c").with_flag(BoolFlag::new("dl").with_usage("download"));
        assert_eq!(cmd.find_flag("dl").map(|f| f.usage()), Some("download"));
        assert!(cmd.find_flag("x").is_none());
    }
}
