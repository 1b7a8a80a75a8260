use super::{BuildArgs, Resolved, CANCELLED, NO_TARGETS_GUIDANCE};
use crate::output::print_json;
use crate::prompt;
use agents_core::build::{self, BuildOptions, BuildReport, FailureReason};
use agents_core::target::TargetSelection;
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, args: &BuildArgs, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let resolved = args.resolve(root, &config);

    let Some(targets) = choose_targets(&resolved, args.no_input, json)? else {
        return Ok(());
    };
    execute(&resolved, targets, resolved.agents.clone(), json)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared with `init`
// ---------------------------------------------------------------------------

/// Targets from flags/env/config, else from the menu when prompting is
/// allowed. `None` means the run should stop quietly (already reported).
pub fn choose_targets(
    resolved: &Resolved,
    no_input: bool,
    json: bool,
) -> anyhow::Result<Option<TargetSelection>> {
    let selection = match &resolved.targets {
        Some(selection) => selection.clone(),
        None if prompt::interactive(no_input) => match prompt::select_targets()? {
            Some(targets) => TargetSelection {
                targets,
                unknown: Vec::new(),
            },
            None => {
                notice(json, CANCELLED);
                return Ok(None);
            }
        },
        None => {
            notice(json, NO_TARGETS_GUIDANCE);
            return Ok(None);
        }
    };

    if selection.is_empty() {
        for unknown in &selection.unknown {
            tracing::warn!(target_id = %unknown, "ignoring unknown target");
        }
        notice(json, "No known targets selected. Exiting.");
        return Ok(None);
    }
    Ok(Some(selection))
}

/// Run the build and print its report.
pub fn execute(
    resolved: &Resolved,
    targets: TargetSelection,
    agents: Option<Vec<String>>,
    json: bool,
) -> anyhow::Result<BuildReport> {
    let opts = BuildOptions {
        input: resolved.input.clone(),
        out_dir: resolved.out_dir.clone(),
        targets,
        agents,
    };

    if !json {
        println!(
            "Building agents from {} into {}",
            opts.input.display(),
            opts.out_dir.display()
        );
    }

    let report = build::build(&opts).context("build failed")?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(report)
}

/// Status lines go to stdout, except in JSON mode where stdout carries the
/// document alone.
pub fn notice(json: bool, message: &str) {
    if json {
        eprintln!("{message}");
    } else {
        println!("{message}");
    }
}

fn print_report(report: &BuildReport) {
    if !report.input_found {
        println!(
            "No agent definitions found at {}.",
            report.input.display()
        );
        return;
    }

    for agent in &report.built {
        for artifact in &agent.artifacts {
            println!("  created: {}", artifact.display());
        }
    }
    for artifact in &report.batch_artifacts {
        println!("  created: {}", artifact.display());
    }

    for failure in &report.failures {
        match &failure.reason {
            FailureReason::Parse { message } => {
                eprintln!("  skipped: {} (parse error: {message})", failure.source)
            }
            FailureReason::Validation { errors } => {
                eprintln!("  skipped: {} (validation failed)", failure.source);
                eprintln!("{errors}");
            }
            FailureReason::NoAgents => {
                eprintln!("  skipped: {} (no agents found)", failure.source)
            }
            FailureReason::EmptySlug => {
                eprintln!("  skipped: {} (name yields an empty slug)", failure.source)
            }
        }
    }

    println!(
        "\nBuilt {} agent(s), {} artifact(s); {} skipped.",
        report.built.len(),
        report.artifact_count(),
        report.failures.len()
    );
    if !report.filtered.is_empty() {
        println!("Not selected: {}", report.filtered.join(", "));
    }
}
