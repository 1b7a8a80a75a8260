use crate::output::print_json;
use agents_core::docs::{self, DocsOutcome};
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, dir: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let docs_dir = match dir {
        Some(d) => root.join(d),
        None => super::load_config(root)?.docs_path(root),
    };

    let outcome = docs::generate_workflow_guide(&docs_dir)
        .with_context(|| format!("failed to write workflow guide to {}", docs_dir.display()))?;

    if json {
        return print_json(&outcome);
    }
    match outcome {
        DocsOutcome::Created { path } => println!("  created: {}", path.display()),
        DocsOutcome::AlreadyPresent { dir } => {
            println!("  exists:  {} (workflow guide skipped)", dir.display())
        }
    }
    Ok(())
}
