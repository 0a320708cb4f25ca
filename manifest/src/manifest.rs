//! Serializable application descriptions.
//!
//! # Example YAML
//!
//! ```yaml
//! name: uwe
//! version: 0.3.1
//! commands:
//!   - name: run
//!     aliases: [r, rnu, nur]
//!     short: run a thing
//!     flags:
//!       - name: m
//!         default: moe
//!         usage: message
//!       - name: dl
//!         kind: bool
//!     action: run
//!   - name: remote
//!     commands:
//!       - name: add
//!         action: remote-add
//! ```

use std::fmt;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use cmdtree_core::{
    Action, App, BoolFlag, Command, Flag, FlagKind, FlagValue, IntFlag, StringFlag, UintFlag,
    validate_app,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ManifestError, Result};
use crate::registry::ActionRegistry;

/// On-disk encoding of a manifest, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// Picks the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// [`ManifestError::UnsupportedFormat`] for anything but `.yaml`, `.yml`
    /// or `.json`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ManifestError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A flag default as written in the manifest, before it is checked against
/// the flag's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(b) => write!(f, "{b}"),
            DefaultValue::Int(i) => write!(f, "{i}"),
            DefaultValue::Uint(u) => write!(f, "{u}"),
            DefaultValue::Text(s) => f.write_str(s),
        }
    }
}

fn default_kind() -> FlagKind {
    FlagKind::String
}

fn is_string_kind(kind: &FlagKind) -> bool {
    *kind == FlagKind::String
}

/// A flag declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagManifest {
    pub name: String,
    /// Value kind; `string` when omitted.
    #[serde(default = "default_kind", skip_serializing_if = "is_string_kind")]
    pub kind: FlagKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub usage: String,
}

impl FlagManifest {
    /// The default converted to the declared kind, or the kind's zero value.
    ///
    /// # Errors
    ///
    /// [`ManifestError::InvalidDefault`] when the default does not parse as
    /// the declared kind, e.g. `-1` for a `uint` flag.
    pub fn default_value(&self) -> Result<FlagValue> {
        let Some(default) = &self.default else {
            return Ok(self.kind.zero());
        };
        let raw = default.to_string();
        self.kind
            .parse(&raw)
            .ok_or_else(|| ManifestError::InvalidDefault {
                flag: self.name.clone(),
                value: raw,
                kind: self.kind,
            })
    }

    /// Builds the typed flag.
    pub fn build(&self) -> Result<Arc<dyn Flag>> {
        let flag: Arc<dyn Flag> = match self.default_value()? {
            FlagValue::String(value) => Arc::new(
                StringFlag::new(&self.name)
                    .with_default(&value)
                    .with_usage(&self.usage),
            ),
            FlagValue::Bool(value) => Arc::new(
                BoolFlag::new(&self.name)
                    .with_default(value)
                    .with_usage(&self.usage),
            ),
            FlagValue::Int(value) => Arc::new(
                IntFlag::new(&self.name)
                    .with_default(value)
                    .with_usage(&self.usage),
            ),
            FlagValue::Uint(value) => Arc::new(
                UintFlag::new(&self.name)
                    .with_default(value)
                    .with_usage(&self.usage),
            ),
        };
        Ok(flag)
    }
}

/// A command declaration with its nested commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub usage: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Static help text printed instead of the help template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_template: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagManifest>,
    /// Registry name of the action; commands without one only group others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandManifest>,
}

impl CommandManifest {
    /// Builds the command and everything below it.
    pub fn build(&self, registry: &ActionRegistry) -> Result<Command> {
        let mut cmd = Command::new(&self.name)
            .with_aliases(self.aliases.iter().cloned())
            .with_usage(&self.usage)
            .with_short(&self.short)
            .with_description(&self.description);
        cmd.help = self.help.clone();
        cmd.help_template = self.help_template.clone();
        cmd.flags = build_flags(&self.flags)?;
        cmd.action = bind_action(&self.name, self.action.as_deref(), registry)?;
        for sub in &self.commands {
            cmd.add_subcommand(sub.build(registry)?);
        }
        Ok(cmd)
    }

    fn count_commands(&self) -> usize {
        1 + self
            .commands
            .iter()
            .map(CommandManifest::count_commands)
            .sum::<usize>()
    }

    fn count_flags(&self) -> usize {
        self.flags.len()
            + self
                .commands
                .iter()
                .map(CommandManifest::count_flags)
                .sum::<usize>()
    }
}

/// A whole application.
///
/// # Examples
///
/// ```
/// use cmdtree_manifest::{ActionRegistry, AppManifest};
///
/// let manifest = AppManifest::from_yaml_str(
///     "name: uwe\ncommands:\n  - name: run\n    aliases: [r]\n    action: run\n",
/// )
/// .unwrap();
/// let registry = ActionRegistry::new().with("run", |ctx| println!("{:?}", ctx.args));
///
/// let app = manifest.build(&registry).unwrap();
/// assert_eq!(app.commands()[0].aliases, vec!["r"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_template: Option<String>,
    /// Application-level flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagManifest>,
    /// Action run when input names no command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandManifest>,
}

impl AppManifest {
    /// Loads a manifest, choosing YAML or JSON by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ManifestError::Io) if the file cannot be read,
    /// [`UnsupportedFormat`](ManifestError::UnsupportedFormat) for an unknown
    /// extension, or a [`Yaml`](ManifestError::Yaml) /
    /// [`Json`](ManifestError::Json) error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let manifest = match format {
            ManifestFormat::Yaml => serde_yaml::from_reader(reader)?,
            ManifestFormat::Json => serde_json::from_reader(reader)?,
        };
        debug!(path = %path.display(), ?format, "loaded manifest");
        Ok(manifest)
    }

    /// Saves the manifest in the format implied by the extension of `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            ManifestFormat::Yaml => serde_yaml::to_writer(writer, self)?,
            ManifestFormat::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of commands in the tree, nested ones included.
    pub fn command_count(&self) -> usize {
        self.commands
            .iter()
            .map(CommandManifest::count_commands)
            .sum()
    }

    /// Number of flag declarations, application flags included.
    pub fn flag_count(&self) -> usize {
        self.flags.len()
            + self
                .commands
                .iter()
                .map(CommandManifest::count_flags)
                .sum::<usize>()
    }

    /// Builds the application, binding action names through `registry`, and
    /// validates the resulting tree.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::UnknownAction`] for an action name `registry` cannot
    ///   resolve.
    /// - [`ManifestError::InvalidDefault`] for a default that does not fit its
    ///   flag.
    /// - [`ManifestError::Validation`] for the first problem
    ///   [`validate_app`] reports that dispatch cannot tolerate. Duplicate
    ///   sibling names and duplicate flags are logged with `warn!` and kept;
    ///   the first declaration wins at dispatch time.
    pub fn build(&self, registry: &ActionRegistry) -> Result<App> {
        let mut app = App::new(&self.name)
            .with_version(&self.version)
            .with_description(&self.description);
        app.help = self.help.clone();
        app.help_template = self.help_template.clone();

        let root = app.root_mut();
        root.flags = build_flags(&self.flags)?;
        root.action = bind_action(&self.name, self.action.as_deref(), registry)?;

        for cmd in &self.commands {
            app.add_command(cmd.build(registry)?);
        }

        for err in validate_app(&app) {
            if !err.is_duplicate() {
                return Err(err.into());
            }
            warn!(app = %self.name, "{err}; first declaration wins");
        }
        debug!(
            app = %self.name,
            commands = self.command_count(),
            flags = self.flag_count(),
            "built application"
        );
        Ok(app)
    }
}

fn build_flags(flags: &[FlagManifest]) -> Result<Vec<Arc<dyn Flag>>> {
    flags.iter().map(FlagManifest::build).collect()
}

fn bind_action(command: &str, action: Option<&str>, registry: &ActionRegistry) -> Result<Option<Action>> {
    let Some(name) = action else {
        return Ok(None);
    };
    registry
        .resolve(name)
        .map(Some)
        .ok_or_else(|| ManifestError::UnknownAction {
            command: command.to_string(),
            action: name.to_string(),
        })
}
