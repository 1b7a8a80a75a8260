mod cmd;
mod output;
mod prompt;
mod root;

use clap::{Parser, Subcommand};
use cmd::{BuildArgs, InitArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agents",
    about = "Install AI agent definitions into coding-assistant config formats",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .agents.yaml or .git/)
    #[arg(long, global = true, env = "AGENTS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log debug diagnostics to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold the workflow guide, pick targets and agents, then build
    Init(InitArgs),

    /// Build agent artifacts for the selected targets
    Build(BuildArgs),

    /// List the valid agents available in the input
    List {
        /// Input file or directory (default: definitions/ or agents.md)
        #[arg(long, short = 'i', env = "AGENTS_INPUT")]
        input: Option<PathBuf>,
    },

    /// Show the supported targets and where they write
    Targets,

    /// Write the workflow guide if the docs directory is absent
    Docs {
        /// Docs directory (default: docs_dir from .agents.yaml, else docs/)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init(args) => cmd::init::run(&root, &args, cli.json),
        Commands::Build(args) => cmd::build::run(&root, &args, cli.json),
        Commands::List { input } => cmd::list::run(&root, input.as_deref(), cli.json),
        Commands::Targets => cmd::targets::run(cli.json),
        Commands::Docs { dir } => cmd::docs::run(&root, dir.as_deref(), cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
