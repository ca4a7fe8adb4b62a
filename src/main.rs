use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skillport::commands::{render, Orchestrator};
use skillport::config::Settings;
use skillport::models::ToolRegistry;

#[derive(Parser)]
#[command(name = "skillport")]
#[command(about = "Install AI skills into your project for Claude Code, Cursor, Windsurf, and Copilot")]
#[command(version, disable_version_flag = true, arg_required_else_help = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Project to install into
    #[arg(long, global = true, env = "SKILLPORT_PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// Directory containing the packaged skills
    #[arg(long, global = true, env = "SKILLPORT_SKILLS_DIR")]
    skills_dir: Option<PathBuf>,

    /// Primary install location, relative to the project
    #[arg(long, global = true, env = "SKILLPORT_PRIMARY_PATH")]
    primary_path: Option<PathBuf>,

    /// Log every filesystem step to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available skills
    List,
    /// Install skills into the project
    Init(Selection),
    /// Refresh installed skills, backing up what is there
    Update(Selection),
}

#[derive(Args)]
struct Selection {
    /// Skills to act on
    names: Vec<String>,

    /// Act on every skill (for update: every installed skill)
    #[arg(long)]
    all: bool,

    /// Comma-separated tools, or "all" (default: claude,cursor,windsurf)
    #[arg(long, value_name = "LIST")]
    tools: Option<String>,

    /// A single tool
    #[arg(long, value_name = "TOOL")]
    only: Option<String>,
}

/// Initialize tracing on stderr so stdout carries only command output
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "skillport=debug"
    } else {
        "skillport=warn"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> skillport::Result<()> {
    let settings = Settings::resolve(cli.project_dir, cli.skills_dir, cli.primary_path)
        .map_err(|source| skillport::Error::Io {
            path: PathBuf::from("."),
            source,
        })?;
    let orchestrator = Orchestrator::new(settings, ToolRegistry::builtin());

    match cli.command {
        Commands::List => {
            print!("{}", orchestrator.list()?);
        }
        Commands::Init(sel) => {
            let tools = orchestrator.select_tools(sel.tools.as_deref(), sel.only.as_deref())?;
            let report = orchestrator.init(&sel.names, sel.all, &tools)?;
            print!("{}", render::render_report(&report, orchestrator.settings()));
        }
        Commands::Update(sel) => {
            let tools = orchestrator.select_tools(sel.tools.as_deref(), sel.only.as_deref())?;
            let report = orchestrator.update(&sel.names, sel.all, &tools)?;
            print!("{}", render::render_report(&report, orchestrator.settings()));
        }
    }
    Ok(())
}

/// Exit status of a finished run.
///
/// Selection errors are reported here and exit 1. A run that completed exits 0,
/// even when individual targets failed. Anything else is returned to `main`.
fn exit_code(result: skillport::Result<()>) -> skillport::Result<u8> {
    match result {
        Ok(()) => Ok(0),
        Err(e) if e.is_selection() => {
            eprintln!("✗ {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("ℹ {}", hint);
            }
            Ok(1)
        }
        Err(e) => Err(e),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = exit_code(run(cli))?;
    Ok(ExitCode::from(code))
}
