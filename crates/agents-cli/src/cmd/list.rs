use crate::output::{print_json, print_table};
use agents_core::loader;
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, input: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(root)?;
    let args = super::BuildArgs {
        input: input.map(Path::to_path_buf),
        ..Default::default()
    };
    let input = args.resolve(root, &config).input;

    let agents = loader::list_agents(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    if json {
        return print_json(&agents);
    }

    if agents.is_empty() {
        println!("No agents found in {}.", input.display());
        return Ok(());
    }

    let rows = agents
        .iter()
        .map(|a| {
            vec![
                a.slug.clone(),
                a.name.clone(),
                a.description.clone().unwrap_or_default(),
                a.source
                    .strip_prefix(root)
                    .unwrap_or(&a.source)
                    .display()
                    .to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "NAME", "DESCRIPTION", "SOURCE"], rows);
    Ok(())
}
