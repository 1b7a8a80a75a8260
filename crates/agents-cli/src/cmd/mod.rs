pub mod build;
pub mod docs;
pub mod init;
pub mod list;
pub mod targets;

use agents_core::config::{InstallerConfig, WarnLevel};
use agents_core::paths;
use agents_core::target::TargetSelection;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Shared arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Output root for generated artifacts (default: project root)
    #[arg(long, short = 'o', env = "AGENTS_OUT")]
    pub out: Option<PathBuf>,

    /// Input file or directory (default: definitions/ or agents.md)
    #[arg(long, short = 'i', env = "AGENTS_INPUT")]
    pub input: Option<PathBuf>,

    /// Comma-separated targets (gemini, roo, cline, kilo, opencode, copilot)
    #[arg(long = "targets", visible_alias = "target", short = 't', env = "AGENTS_TARGETS")]
    pub targets: Option<String>,

    /// Comma-separated agent slugs to build (default: all)
    #[arg(long, short = 'a')]
    pub agents: Option<String>,

    /// Never prompt; fall back to flags, env and .agents.yaml
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct InitArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Write the chosen input, output and targets to .agents.yaml
    #[arg(long)]
    pub save: bool,
}

/// Build settings after applying flag > env > .agents.yaml > default.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    /// `None` when nothing named any target; the caller may prompt.
    pub targets: Option<TargetSelection>,
    pub agents: Option<Vec<String>>,
}

impl BuildArgs {
    pub fn resolve(&self, root: &Path, config: &InstallerConfig) -> Resolved {
        let input = self
            .input
            .as_ref()
            .map(|p| root.join(p))
            .or_else(|| config.input_path(root))
            .unwrap_or_else(|| paths::default_input(root));

        let out_dir = self
            .out
            .as_ref()
            .map(|p| root.join(p))
            .or_else(|| config.out_path(root))
            .unwrap_or_else(|| root.to_path_buf());

        let targets = match &self.targets {
            Some(list) => Some(TargetSelection::parse_list(list)),
            None if !config.targets.is_empty() => Some(TargetSelection::from_ids(&config.targets)),
            None => None,
        };

        Resolved {
            input,
            out_dir,
            targets,
            agents: self.agents.as_deref().map(split_list),
        }
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load `.agents.yaml` and surface its warnings through tracing.
/// Error-level findings abort the command.
pub fn load_config(root: &Path) -> anyhow::Result<InstallerConfig> {
    let config = InstallerConfig::load(root).context("failed to load .agents.yaml")?;
    let mut fatal = Vec::new();
    for warning in config.validate() {
        match warning.level {
            WarnLevel::Warning => tracing::warn!("{}", warning.message),
            WarnLevel::Error => fatal.push(warning.message),
        }
    }
    if !fatal.is_empty() {
        anyhow::bail!("invalid .agents.yaml: {}", fatal.join("; "));
    }
    Ok(config)
}

/// Printed when no target was named and prompting is not possible.
pub const NO_TARGETS_GUIDANCE: &str = "\
Skipping build: no targets selected and prompting is unavailable (non-interactive environment).
Pass --targets, e.g. `agents build --targets gemini,roo`, set AGENTS_TARGETS,
or list targets in .agents.yaml.";

pub const CANCELLED: &str = "Installation cancelled by user.";
