use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cmdtree_core::{App, Context, Outcome, validate_app};
use cmdtree_manifest::{ActionRegistry, AppManifest};
use tracing::{debug, info};

/// Output format for the contexts printed by `run`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdtree", version)]
#[command(about = "Check, inspect and dry-run command tree manifests")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a manifest, build its command tree and validate it.
    Check(CheckArgs),
    /// Print the help of the application or of one of its commands.
    Help(HelpArgs),
    /// Dispatch arguments against a manifest and print the parse context.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Manifest file (.yaml, .yml or .json).
    manifest: PathBuf,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Manifest file (.yaml, .yml or .json).
    manifest: PathBuf,
    /// Command path, e.g. `remote add`. Empty for application help.
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Manifest file (.yaml, .yml or .json).
    manifest: PathBuf,
    /// Output format for the parse context.
    #[arg(long, value_enum, default_value_t = CliOutputFormat::Json)]
    format: CliOutputFormat,
    /// Arguments to dispatch, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    // stdout carries help text and contexts; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.parse().unwrap_or_default()),
        )
        .init();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Help(args) => run_help(args),
        Command::Run(args) => run_run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Builds the application with every named action bound to a no-op; `run`
/// reports the context itself once dispatch returns.
fn load_app(path: &Path) -> Result<(AppManifest, App), String> {
    let manifest = AppManifest::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    let registry =
        ActionRegistry::new().with_fallback(|ctx| debug!(command = %ctx.command, "action reached"));
    let app = manifest
        .build(&registry)
        .map_err(|err| format!("Invalid manifest '{}': {err}", path.display()))?;
    Ok((manifest, app))
}

/// Stricter than `run`: duplicates that dispatch tolerates are reported too.
fn run_check(args: CheckArgs) -> Result<(), String> {
    let (manifest, app) = load_app(&args.manifest)?;
    if let Some(err) = validate_app(&app).into_iter().next() {
        return Err(format!(
            "Invalid manifest '{}': {err}",
            args.manifest.display()
        ));
    }
    println!(
        "Validated manifest '{}': {} command(s), {} flag(s).",
        manifest.name,
        manifest.command_count(),
        manifest.flag_count()
    );
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let (_, app) = load_app(&args.manifest)?;
    let argv: Vec<String> = std::iter::once(app.name().to_string())
        .chain(args.path)
        .chain(std::iter::once("--help".to_string()))
        .collect();

    let mut stdout = io::stdout().lock();
    app.run_with(&argv, &mut stdout)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn run_run(args: RunArgs) -> Result<(), String> {
    let (_, app) = load_app(&args.manifest)?;
    let argv: Vec<String> = std::iter::once(app.name().to_string())
        .chain(args.args)
        .collect();
    info!(app = app.name(), tokens = argv.len() - 1, "dispatching");

    let mut stdout = io::stdout().lock();
    match app.run_with(&argv, &mut stdout).map_err(|err| err.to_string())? {
        Outcome::Help => Ok(()),
        Outcome::Invoked(ctx) => {
            let rendered = render_context(&ctx, args.format)?;
            stdout
                .write_all(rendered.as_bytes())
                .map_err(|err| format!("Failed to write output: {err}"))
        }
    }
}

fn render_context(ctx: &Context, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(ctx)
            .map(|json| json + "\n")
            .map_err(|err| format!("Failed to serialize context: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(ctx)
            .map_err(|err| format!("Failed to serialize context: {err}")),
    }
}
