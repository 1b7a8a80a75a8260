//! The build pipeline: discover, load, validate, render, write.
//!
//! Each source and each definition is handled on its own. Parse and
//! validation problems land in the [`BuildReport`] and the batch moves on;
//! only filesystem failures abort the run.

use crate::agent::AgentDefinition;
use crate::error::Result;
use crate::loader::{self, LoadOutcome, SourceKind};
use crate::schema::{self, ValidationErrors};
use crate::target::{Target, TargetSelection};
use crate::io;
use serde::Serialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Options / report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Definitions directory or a single `.yaml` / `.md` file.
    pub input: PathBuf,
    /// Root under which every target's subtree is written.
    pub out_dir: PathBuf,
    pub targets: TargetSelection,
    /// When set, only agents whose slug is listed are built.
    pub agents: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuiltAgent {
    pub slug: String,
    pub name: String,
    pub source: String,
    /// Artifact paths relative to the output root.
    pub artifacts: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    Parse { message: String },
    Validation { errors: ValidationErrors },
    NoAgents,
    EmptySlug,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub input: PathBuf,
    pub input_found: bool,
    pub out_dir: PathBuf,
    pub targets: Vec<Target>,
    pub unknown_targets: Vec<String>,
    pub built: Vec<BuiltAgent>,
    pub failures: Vec<SourceFailure>,
    /// Valid agents left out by the allow-list.
    pub filtered: Vec<String>,
    pub batch_artifacts: Vec<PathBuf>,
}

impl BuildReport {
    fn new(opts: &BuildOptions) -> Self {
        Self {
            input: opts.input.clone(),
            input_found: false,
            out_dir: opts.out_dir.clone(),
            targets: opts.targets.targets.clone(),
            unknown_targets: opts.targets.unknown.clone(),
            built: Vec::new(),
            failures: Vec::new(),
            filtered: Vec::new(),
            batch_artifacts: Vec::new(),
        }
    }

    pub fn artifact_count(&self) -> usize {
        self.built.iter().map(|b| b.artifacts.len()).sum::<usize>() + self.batch_artifacts.len()
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Run one build. A missing input yields an empty report, not an error.
pub fn build(opts: &BuildOptions) -> Result<BuildReport> {
    let mut report = BuildReport::new(opts);
    for unknown in &report.unknown_targets {
        tracing::warn!(target_id = %unknown, "ignoring unknown target");
    }

    let Some(sources) = loader::discover(&opts.input)? else {
        tracing::warn!(input = %opts.input.display(), "input not found");
        return Ok(report);
    };
    report.input_found = true;
    io::ensure_dir(&opts.out_dir)?;

    let mut built_defs: Vec<(String, AgentDefinition)> = Vec::new();

    for source in &sources {
        tracing::debug!(path = %source.path.display(), kind = ?source.kind, "loading source");
        let candidates = match loader::load(source)? {
            LoadOutcome::ParseFailed(message) => {
                tracing::warn!(source = %source.file_name(), %message, "parse failed");
                report.failures.push(SourceFailure {
                    source: source.file_name(),
                    reason: FailureReason::Parse { message },
                });
                continue;
            }
            LoadOutcome::Candidates(c) => c,
        };

        if candidates.is_empty() && source.kind == SourceKind::Markdown {
            report.failures.push(SourceFailure {
                source: source.file_name(),
                reason: FailureReason::NoAgents,
            });
            continue;
        }

        for candidate in candidates {
            let agent = match schema::validate(&candidate.value) {
                Ok(agent) => agent,
                Err(errors) => {
                    tracing::warn!(source = %candidate.label, count = errors.len(), "validation failed");
                    report.failures.push(SourceFailure {
                        source: candidate.label,
                        reason: FailureReason::Validation { errors },
                    });
                    continue;
                }
            };

            let slug = candidate.slug(&agent);
            if slug.is_empty() {
                report.failures.push(SourceFailure {
                    source: candidate.label,
                    reason: FailureReason::EmptySlug,
                });
                continue;
            }

            if let Some(allow) = &opts.agents {
                if !allow.iter().any(|a| a == &slug) {
                    report.filtered.push(slug);
                    continue;
                }
            }

            let artifacts = write_agent(&opts.out_dir, &opts.targets.targets, &agent, &slug)?;
            report.built.push(BuiltAgent {
                slug: slug.clone(),
                name: agent.name.clone(),
                source: candidate.label,
                artifacts,
            });
            built_defs.push((slug, agent));
        }
    }

    for target in &opts.targets.targets {
        let Some(relative) = target.batch_path() else {
            continue;
        };
        if let Some(contents) = target.render_batch(&built_defs)? {
            io::atomic_write(&opts.out_dir.join(&relative), contents.as_bytes())?;
            report.batch_artifacts.push(relative);
        }
    }

    Ok(report)
}

fn write_agent(
    out_dir: &Path,
    targets: &[Target],
    agent: &AgentDefinition,
    slug: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(targets.len());
    for target in targets {
        let relative = target.relative_path(slug);
        io::atomic_write(&out_dir.join(&relative), target.render(agent).as_bytes())?;
        written.push(relative);
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn yaml(name: &str) -> String {
        format!("name: {name}\nrole: Specialist\nsystemPrompt: Do the {name} job carefully.\n")
    }

    fn options(dir: &TempDir, input: &str, targets: &str) -> BuildOptions {
        BuildOptions {
            input: dir.path().join(input),
            out_dir: dir.path().join("out"),
            targets: TargetSelection::parse_list(targets),
            agents: None,
        }
    }

    fn files_under(root: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in std::fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    out.push(path.strip_prefix(root).unwrap().to_path_buf());
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn single_gemini_target_writes_one_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("definitions")).unwrap();
        std::fs::write(dir.path().join("definitions/coder.yaml"), yaml("coder")).unwrap();

        let report = build(&options(&dir, "definitions", "gemini")).unwrap();
        assert!(report.input_found);
        assert_eq!(report.built.len(), 1);
        assert_eq!(
            files_under(&dir.path().join("out")),
            vec![PathBuf::from(".gemini/commands/coder.toml")]
        );
    }

    #[test]
    fn missing_input_is_an_empty_report() {
        let dir = TempDir::new().unwrap();
        let report = build(&options(&dir, "definitions", "gemini")).unwrap();
        assert!(!report.input_found);
        assert!(report.built.is_empty());
        assert!(report.failures.is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn invalid_definition_is_skipped_and_batch_continues() {
        let dir = TempDir::new().unwrap();
        let defs = dir.path().join("definitions");
        std::fs::create_dir(&defs).unwrap();
        std::fs::write(defs.join("a-broken.yaml"), "name: Broken\nsystemPrompt: long enough prompt\n")
            .unwrap();
        std::fs::write(defs.join("b-garbled.yaml"), "name: [oops\n").unwrap();
        std::fs::write(defs.join("coder.yaml"), yaml("coder")).unwrap();

        let report = build(&options(&dir, "definitions", "gemini,kilo")).unwrap();
        assert_eq!(report.built.len(), 1);
        assert_eq!(report.failures.len(), 2);

        match &report.failures[0].reason {
            FailureReason::Validation { errors } => assert!(errors.touches("role")),
            other => panic!("unexpected failure {other:?}"),
        }
        assert!(matches!(report.failures[1].reason, FailureReason::Parse { .. }));

        let out = dir.path().join("out");
        assert!(!out.join(".gemini/commands/a-broken.toml").exists());
        assert!(!out.join(".kilocode/workflows/a-broken.md").exists());
        assert!(out.join(".kilocode/workflows/coder.md").exists());
    }

    #[test]
    fn allow_list_limits_output() {
        let dir = TempDir::new().unwrap();
        let defs = dir.path().join("definitions");
        std::fs::create_dir(&defs).unwrap();
        for name in ["coder", "reviewer", "auditor"] {
            std::fs::write(defs.join(format!("{name}.yaml")), yaml(name)).unwrap();
        }

        let mut opts = options(&dir, "definitions", "gemini");
        opts.agents = Some(vec!["reviewer".to_string()]);
        let report = build(&opts).unwrap();

        assert_eq!(report.built.len(), 1);
        assert_eq!(report.built[0].slug, "reviewer");
        assert_eq!(report.filtered, vec!["auditor", "coder"]);
        assert_eq!(
            files_under(&dir.path().join("out")),
            vec![PathBuf::from(".gemini/commands/reviewer.toml")]
        );
    }

    #[test]
    fn markdown_input_uses_name_slugs() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("agents.md"),
            "# Project Architect 🏗️\n> Visionary\n## System Prompt\nWrite the spec first.\n\n\
             # Nameless\n## System Prompt\nNo role given here.\n",
        )
        .unwrap();

        let report = build(&options(&dir, "agents.md", "opencode")).unwrap();
        assert_eq!(report.built.len(), 1);
        assert_eq!(report.built[0].slug, "project-architect");
        assert_eq!(report.failures[0].source, "agents.md -> Nameless");
        assert!(dir
            .path()
            .join("out/.opencode/command/project-architect.md")
            .exists());
    }

    #[test]
    fn markdown_without_agents_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("agents.md"), "no headings here\n").unwrap();
        let report = build(&options(&dir, "agents.md", "gemini")).unwrap();
        assert!(matches!(report.failures[0].reason, FailureReason::NoAgents));
    }

    #[test]
    fn roo_writes_rules_and_manifest() {
        let dir = TempDir::new().unwrap();
        let defs = dir.path().join("definitions");
        std::fs::create_dir(&defs).unwrap();
        std::fs::write(defs.join("coder.yaml"), yaml("coder")).unwrap();
        std::fs::write(defs.join("auditor.yml"), yaml("auditor")).unwrap();

        let report = build(&options(&dir, "definitions", "roo")).unwrap();
        assert_eq!(report.batch_artifacts, vec![PathBuf::from("roo_custom_modes.json")]);

        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out/roo_custom_modes.json")).unwrap(),
        )
        .unwrap();
        let modes = json["customModes"].as_array().unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0]["slug"], "auditor");
        assert!(dir.path().join("out/.roo/commands/coder.md").exists());
    }

    #[test]
    fn slug_collision_last_writer_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("agents.md"),
            "# Coder\n> First\n## System Prompt\nFirst version prompt.\n\n\
             # coder\n> Second\n## System Prompt\nSecond version prompt.\n",
        )
        .unwrap();
        let report = build(&options(&dir, "agents.md", "kilo")).unwrap();
        assert_eq!(report.built.len(), 2);
        let content =
            std::fs::read_to_string(dir.path().join("out/.kilocode/workflows/coder.md")).unwrap();
        assert!(content.contains("Second version prompt."));
    }

    #[test]
    fn unknown_targets_are_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("coder.yaml"), yaml("coder")).unwrap();
        let report = build(&options(&dir, "coder.yaml", "cursor,kilo")).unwrap();
        assert_eq!(report.unknown_targets, vec!["cursor"]);
        assert_eq!(report.artifact_count(), 1);
    }

    #[test]
    fn output_root_that_is_a_file_aborts_the_run() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("coder.yaml"), yaml("coder")).unwrap();
        std::fs::write(dir.path().join("out"), "occupied").unwrap();

        let err = build(&options(&dir, "coder.yaml", "gemini")).unwrap_err();
        match err {
            crate::InstallerError::CreateDir { path, .. } => {
                assert_eq!(path, dir.path().join("out").display().to_string())
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn existing_artifact_is_overwritten() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("coder.yaml"), yaml("coder")).unwrap();
        let stale = dir.path().join("out/.gemini/commands/coder.toml");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "stale").unwrap();

        build(&options(&dir, "coder.yaml", "gemini")).unwrap();
        assert!(std::fs::read_to_string(&stale)
            .unwrap()
            .starts_with("description = "));
    }
}
