//! Help text rendering.
//!
//! Help for the application or for one command is produced, in order of
//! preference, from static help text, a custom template, or the built-in
//! default template. Templates use Jinja syntax and are rendered with
//! `minijinja`:
//!
//! - fields are read as `Name`, `Cmd.Usage`, `App.Version`;
//! - `join(list, sep)` joins a list of strings;
//! - `flags(command)` maps flag names to declarations, first declaration
//!   winning (it also accepts a bare list of flags);
//! - the `column` filter pads and truncates to [`NAME_COLUMN_WIDTH`].
//!
//! Undefined fields are errors. Templates are rendered completely before
//! anything is written, so a failing template produces no partial output.

use std::collections::BTreeMap;
use std::io::Write;

use minijinja::value::ValueKind;
use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value};
use serde::Serialize;
use tracing::{debug, warn};

use crate::app::App;
use crate::command::Command;
use crate::error::Result;
use crate::flag::Flag;

/// Column width of command and flag names in the default templates.
pub const NAME_COLUMN_WIDTH: usize = 15;

/// Default help template for the application.
pub const DEFAULT_APP_HELP_TEMPLATE: &str = r#"{{ Name }}{% if Version %}

Version:
   {{ Version }}{% endif %}{% if Description %}

Description:
   {{ Description }}{% endif %}{% if Commands %}

Commands:{% for sub in Commands %}
   {{ sub.Name|column }}    {{ sub.Short }}{% endfor %}{% endif %}{% if Flags %}

Flags:{% for name, flag in flags(Flags)|items %}
   {{ name|column }}    {{ flag.Usage }}{% endfor %}{% endif %}"#;

/// Default help template for a command. Evaluated with `App`, `Cmd` and
/// `Path`, the command names leading from the application to `Cmd`.
pub const DEFAULT_COMMAND_HELP_TEMPLATE: &str = r#"Usage: {{ App.Name }} {{ join(Path, " ") }}{% if Cmd.Usage %} {{ Cmd.Usage }}{% endif %}{% if Cmd.Short %}

   {{ Cmd.Short }}{% endif %}{% if Cmd.Alias %}

Aliases: {{ join(Cmd.Alias, ", ") }}{% endif %}{% if Cmd.Description %}

Description:
   {{ Cmd.Description }}{% endif %}{% if Cmd.Subcommands %}

Commands:{% for sub in Cmd.Subcommands %}
   {{ sub.Name|column }}    {{ sub.Short }}{% endfor %}{% endif %}{% if Cmd.Flags %}

Flags:{% for name, flag in flags(Cmd)|items %}
   {{ name|column }}    {{ flag.Usage }}{% endfor %}{% endif %}"#;

/// What to render help for.
#[derive(Debug, Clone)]
pub enum HelpTarget<'a> {
    App,
    /// A command, with the names of the commands leading to it from the
    /// application (the command's own name last).
    Command {
        command: &'a Command,
        path: Vec<&'a str>,
    },
}

impl<'a> HelpTarget<'a> {
    /// Targets a top-level command.
    pub fn command(command: &'a Command) -> Self {
        HelpTarget::Command {
            command,
            path: vec![command.name.as_str()],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FlagData<'a> {
    name: &'a str,
    usage: &'a str,
    default: String,
    kind: &'static str,
}

impl<'a> FlagData<'a> {
    fn new(flag: &'a dyn Flag) -> Self {
        Self {
            name: flag.name(),
            usage: flag.usage(),
            default: flag.default_value().to_string(),
            kind: flag.kind().as_str(),
        }
    }
}

/// Template data for a command. Child commands are listed sorted by name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CommandData<'a> {
    name: &'a str,
    alias: &'a [String],
    usage: &'a str,
    short: &'a str,
    description: &'a str,
    flags: Vec<FlagData<'a>>,
    subcommands: Vec<CommandData<'a>>,
}

impl<'a> CommandData<'a> {
    fn new(cmd: &'a Command) -> Self {
        Self {
            name: &cmd.name,
            alias: &cmd.aliases,
            usage: &cmd.usage,
            short: &cmd.short,
            description: &cmd.description,
            flags: cmd.flags.iter().map(|f| FlagData::new(f.as_ref())).collect(),
            subcommands: sorted_commands(&cmd.subcommands),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AppData<'a> {
    name: &'a str,
    version: &'a str,
    description: &'a str,
    commands: Vec<CommandData<'a>>,
    flags: Vec<FlagData<'a>>,
}

impl<'a> AppData<'a> {
    fn new(app: &'a App) -> Self {
        Self {
            name: app.name(),
            version: &app.version,
            description: &app.description,
            commands: sorted_commands(app.commands()),
            flags: app.root().flags.iter().map(|f| FlagData::new(f.as_ref())).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CommandHelpData<'a> {
    app: AppData<'a>,
    cmd: CommandData<'a>,
    path: &'a [&'a str],
}

fn sorted_commands(commands: &[Command]) -> Vec<CommandData<'_>> {
    let mut sorted: Vec<&Command> = commands.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted.into_iter().map(CommandData::new).collect()
}

fn join_function(items: Vec<Value>, sep: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

fn flags_function(target: Value) -> std::result::Result<Value, minijinja::Error> {
    let list = match target.kind() {
        ValueKind::Seq => target,
        ValueKind::Map => target.get_attr("Flags")?,
        kind => {
            return Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("flags expects a command, got {kind:?}"),
            ));
        }
    };
    if list.is_undefined() {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            "flags expects a command, got a value without Flags",
        ));
    }

    let mut by_name = BTreeMap::new();
    for flag in list.try_iter()? {
        if let Some(name) = flag.get_attr("Name")?.as_str() {
            by_name.entry(name.to_string()).or_insert_with(|| flag.clone());
        }
    }
    Ok(Value::from_serialize(&by_name))
}

fn column_filter(value: Value) -> String {
    format!(
        "{:<width$.width$}",
        value.to_string(),
        width = NAME_COLUMN_WIDTH
    )
}

/// The environment help templates are rendered in.
fn help_environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_function("join", join_function);
    env.add_function("flags", flags_function);
    env.add_filter("column", column_filter);
    env
}

fn render_template<S: Serialize>(src: &str, data: &S) -> Result<String> {
    let env = help_environment();
    let template = env.template_from_str(src)?;
    Ok(template.render(data)?)
}

/// Picks the custom template if one is set and non-empty.
fn custom_template<'a>(template: Option<&'a str>, owner: &str) -> Option<&'a str> {
    match template {
        Some(t) if t.trim().is_empty() => {
            warn!(owner, "empty help template; using default");
            None
        }
        other => other,
    }
}

/// Renders help for `target` to a string.
///
/// # Errors
///
/// [`CliError::TemplateParse`](crate::CliError::TemplateParse) or
/// [`CliError::TemplateExecution`](crate::CliError::TemplateExecution) when a
/// custom template is malformed or refers to fields that do not exist.
pub fn render_help_string(app: &App, target: HelpTarget<'_>) -> Result<String> {
    match target {
        HelpTarget::App => {
            if let Some(help) = &app.help {
                return Ok(help.clone());
            }
            let src = custom_template(app.help_template.as_deref(), app.name())
                .unwrap_or(DEFAULT_APP_HELP_TEMPLATE);
            Ok(with_newline(render_template(src, &AppData::new(app))?))
        }
        HelpTarget::Command { command, path } => {
            if let Some(help) = &command.help {
                return Ok(help.clone());
            }
            let text = match custom_template(command.help_template.as_deref(), &command.name) {
                Some(src) => render_template(src, &CommandData::new(command))?,
                None => {
                    let data = CommandHelpData {
                        app: AppData::new(app),
                        cmd: CommandData::new(command),
                        path: &path,
                    };
                    render_template(DEFAULT_COMMAND_HELP_TEMPLATE, &data)?
                }
            };
            Ok(with_newline(text))
        }
    }
}

fn with_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Renders help for `target` and writes it to `out`.
pub fn render_help<W: Write + ?Sized>(app: &App, target: HelpTarget<'_>, out: &mut W) -> Result<()> {
    let text = render_help_string(app, target)?;
    debug!(bytes = text.len(), "rendering help");
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::flag::{BoolFlag, StringFlag};

    fn app() -> App {
        App::new("uwe").with_version("0.3.1").with_command(
            Command::new("run")
                .with_aliases(["r", "rnu"])
                .with_short("run things")
                .with_description("simply run")
                .with_flag(StringFlag::new("m").with_default("moe").with_usage("message"))
                .with_flag(BoolFlag::new("dl").with_usage("download first"))
                .with_action(|_| {}),
        )
    }

    #[test]
    fn test_default_app_help() {
        let text = render_help_string(&app(), HelpTarget::App).unwrap();
        assert_eq!(
            text,
            "uwe\n\nVersion:\n   0.3.1\n\nCommands:\n   run                run things\n"
        );
    }

    #[test]
    fn test_app_help_omits_empty_version() {
        let text = render_help_string(&App::new("bare"), HelpTarget::App).unwrap();
        assert_eq!(text, "bare\n");
    }

    #[test]
    fn test_app_help_lists_app_flags() {
        let app = App::new("echo").with_flag(BoolFlag::new("n").with_usage("no newline"));
        let text = render_help_string(&app, HelpTarget::App).unwrap();
        assert_eq!(text, "echo\n\nFlags:\n   n                  no newline\n");
    }

    #[test]
    fn test_default_command_help() {
        let app = app();
        let run = &app.commands()[0];
        let text = render_help_string(&app, HelpTarget::command(run)).unwrap();
        assert_eq!(
            text,
            "Usage: uwe run\n\n   run things\n\nAliases: r, rnu\n\nDescription:\n   simply run\n\nFlags:\n   dl                 download first\n   m                  message\n"
        );
    }

    #[test]
    fn test_command_help_usage_shows_full_path() {
        let app = App::new("uwe").with_command(
            Command::new("remote").with_subcommand(Command::new("add").with_usage("<name> <url>")),
        );
        let add = &app.commands()[0].subcommands[0];
        let target = HelpTarget::Command {
            command: add,
            path: vec!["remote", "add"],
        };
        assert_eq!(
            render_help_string(&app, target).unwrap(),
            "Usage: uwe remote add <name> <url>\n"
        );
    }

    #[test]
    fn test_long_flag_names_are_truncated() {
        let app = App::new("a").with_command(
            Command::new("c").with_flag(BoolFlag::new("an-extremely-long-flag").with_usage("u")),
        );
        let text = render_help_string(&app, HelpTarget::command(&app.commands()[0])).unwrap();
        assert!(text.contains("   an-extremely-lo    u"), "{text}");
    }

    #[test]
    fn test_custom_template_sees_only_own_fields() {
        let app = App::new("uwe").with_command(
            Command::new("run").with_help_template("{{ Name }} ({{ join(Alias, \",\") }})"),
        );
        let run = &app.commands()[0];
        assert_eq!(
            render_help_string(&app, HelpTarget::command(run)).unwrap(),
            "run ()\n"
        );

        let app =
            App::new("uwe").with_command(Command::new("run").with_help_template("{{ App.Name }}"));
        let err = render_help_string(&app, HelpTarget::command(&app.commands()[0])).unwrap_err();
        assert!(matches!(err, CliError::TemplateExecution(_)), "{err:?}");
    }

    #[test]
    fn test_missing_field_is_execution_error() {
        let app = App::new("uwe").with_help_template("{{ Nope }}");
        let err = render_help_string(&app, HelpTarget::App).unwrap_err();
        assert!(matches!(err, CliError::TemplateExecution(_)), "{err:?}");
    }

    #[test]
    fn test_malformed_template_is_parse_error() {
        let cases = ["{% if Name %}unterminated", "{{ Name"];
        for src in cases {
            let app = App::new("uwe").with_help_template(src);
            let err = render_help_string(&app, HelpTarget::App).unwrap_err();
            assert!(matches!(err, CliError::TemplateParse(_)), "{src}: {err:?}");
        }
    }

    #[test]
    fn test_static_help_wins() {
        let app = App::new("uwe")
            .with_help("hand written\n")
            .with_help_template("{{ Nope }}");
        assert_eq!(
            render_help_string(&app, HelpTarget::App).unwrap(),
            "hand written\n"
        );
    }

    #[test]
    fn test_empty_template_falls_back_to_default() {
        let app = App::new("uwe").with_help_template("   ");
        assert_eq!(render_help_string(&app, HelpTarget::App).unwrap(), "uwe\n");
    }

    #[test]
    fn test_flags_function_first_declaration_wins() {
        let cmd = Command::new("c")
            .with_flag(StringFlag::new("m").with_usage("first"))
            .with_flag(StringFlag::new("m").with_usage("second"));
        let by_name = flags_function(Value::from_serialize(CommandData::new(&cmd))).unwrap();
        assert_eq!(by_name.len(), Some(1));
        let usage = by_name.get_attr("m").unwrap().get_attr("Usage").unwrap();
        assert_eq!(usage.as_str(), Some("first"));

        assert!(flags_function(Value::from("c")).is_err());
    }

    #[test]
    fn test_column_filter_pads_and_truncates() {
        assert_eq!(column_filter(Value::from("m")), format!("m{}", " ".repeat(14)));
        assert_eq!(column_filter(Value::from("abcdefghijklmnopq")), "abcdefghijklmno");
    }

    #[test]
    fn test_render_help_writes() {
        let mut out = Vec::new();
        render_help(&app(), HelpTarget::App, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("uwe\n"));
    }
}
