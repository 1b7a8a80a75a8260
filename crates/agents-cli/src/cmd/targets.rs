use crate::output::{print_json, print_table};
use agents_core::target::Target;
use serde::Serialize;

#[derive(Serialize)]
struct TargetInfo {
    id: Target,
    label: &'static str,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch: Option<String>,
}

fn describe(target: Target) -> TargetInfo {
    TargetInfo {
        id: target,
        label: target.label(),
        path: target.relative_path("<slug>").display().to_string(),
        batch: target.batch_path().map(|p| p.display().to_string()),
    }
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let infos: Vec<TargetInfo> = Target::all().iter().map(|t| describe(*t)).collect();
    if json {
        return print_json(&infos);
    }

    let rows = infos
        .into_iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.label.to_string(),
                i.path,
                i.batch.unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["ID", "LABEL", "PATH", "BATCH"], rows);
    Ok(())
}
