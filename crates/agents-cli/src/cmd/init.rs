use super::build::{choose_targets, execute, notice};
use super::{InitArgs, CANCELLED};
use crate::prompt::{self, AgentChoice};
use agents_core::config::InstallerConfig;
use agents_core::docs::{self, DocsOutcome};
use agents_core::loader;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub fn run(root: &Path, args: &InitArgs, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let resolved = args.build.resolve(root, &config);
    let interactive = prompt::interactive(args.build.no_input);

    if !json {
        println!("Agent installer: {}", root.display());
    }

    // 1. Workflow guide
    let docs_dir = config.docs_path(root);
    let outcome = docs::generate_workflow_guide(&docs_dir)
        .with_context(|| format!("failed to write workflow guide to {}", docs_dir.display()))?;
    if !json {
        match &outcome {
            DocsOutcome::Created { path } => println!("  created: {}", rel(root, path)),
            DocsOutcome::AlreadyPresent { dir } => {
                println!("  exists:  {} (workflow guide skipped)", rel(root, dir))
            }
        }
    }

    // 2. Targets
    let Some(targets) = choose_targets(&resolved, args.build.no_input, json)? else {
        return Ok(());
    };

    // 3. Agents
    let agents = match &resolved.agents {
        Some(slugs) => Some(slugs.clone()),
        None if interactive => {
            let available = loader::list_agents(&resolved.input)
                .with_context(|| format!("failed to read {}", resolved.input.display()))?;
            if available.is_empty() {
                None
            } else {
                match prompt::select_agents(&available)? {
                    Some(AgentChoice::All) => None,
                    Some(AgentChoice::Only(slugs)) => Some(slugs),
                    None => {
                        notice(json, CANCELLED);
                        return Ok(());
                    }
                }
            }
        }
        None => None,
    };

    if args.save {
        let saved = InstallerConfig {
            input: Some(relative_or_absolute(root, &resolved.input)),
            out: Some(relative_or_absolute(root, &resolved.out_dir)),
            targets: targets.targets.iter().map(|t| t.to_string()).collect(),
            docs_dir: config.docs_dir.clone(),
        };
        saved.save(root).context("failed to write .agents.yaml")?;
        if !json {
            println!("  saved:   .agents.yaml");
        }
    }

    // 4. Build
    execute(&resolved, targets, agents, json)?;
    Ok(())
}

fn rel(root: &Path, path: &Path) -> String {
    relative_or_absolute(root, path).display().to_string()
}

fn relative_or_absolute(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(p) if p.as_os_str().is_empty() => PathBuf::from("."),
        Ok(p) => p.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}
