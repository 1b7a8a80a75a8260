//! Discovering and reading definition sources.
//!
//! An input path is either a directory (every direct `.yaml`, `.yml` and
//! `.md` entry) or a single file. YAML files hold one agent each and lend
//! their file stem as the slug; Markdown files hold any number of agents
//! whose slugs come from their names.

use crate::agent::AgentDefinition;
use crate::error::Result;
use crate::{io, markdown, paths, schema};
use serde::Serialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Yaml,
    Markdown,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match paths::extension_of(path)?.as_str() {
            "yaml" | "yml" => Some(SourceKind::Yaml),
            "md" => Some(SourceKind::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// List the definition sources under `input`.
///
/// Returns `None` when `input` does not exist. Directory entries are sorted
/// by file name; unsupported files and subdirectories are skipped.
pub fn discover(input: &Path) -> Result<Option<Vec<SourceFile>>> {
    if !input.exists() {
        return Ok(None);
    }

    if input.is_file() {
        let sources = SourceKind::from_path(input)
            .map(|kind| SourceFile {
                path: input.to_path_buf(),
                kind,
            })
            .into_iter()
            .collect();
        return Ok(Some(sources));
    }

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        match SourceKind::from_path(&path) {
            Some(kind) => sources.push(SourceFile { path, kind }),
            None => tracing::debug!(path = %path.display(), "ignoring non-definition file"),
        }
    }
    sources.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(Some(sources))
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// A raw definition awaiting validation.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Human-readable origin, e.g. `coder.yaml` or `agents.md -> Coder`.
    pub label: String,
    pub source: PathBuf,
    /// File stem for YAML sources; Markdown agents take their slug from the name.
    pub stem: Option<String>,
    pub value: Value,
}

impl Candidate {
    pub fn slug(&self, agent: &AgentDefinition) -> String {
        match &self.stem {
            Some(stem) => stem.clone(),
            None => paths::slugify(&agent.name),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Candidates(Vec<Candidate>),
    ParseFailed(String),
}

/// Read and parse one source. Malformed content is a per-file outcome;
/// only unexpected I/O failures are errors.
pub fn load(source: &SourceFile) -> Result<LoadOutcome> {
    let file_name = source.file_name();
    let Some(text) = io::read_text(&source.path)? else {
        return Ok(LoadOutcome::ParseFailed("file is not valid UTF-8".to_string()));
    };

    match source.kind {
        SourceKind::Yaml => match serde_yaml::from_str::<Value>(&text) {
            Ok(value) => Ok(LoadOutcome::Candidates(vec![Candidate {
                stem: Some(paths::yaml_stem(&file_name).to_string()),
                label: file_name,
                source: source.path.clone(),
                value,
            }])),
            Err(e) => Ok(LoadOutcome::ParseFailed(e.to_string())),
        },
        SourceKind::Markdown => Ok(LoadOutcome::Candidates(
            markdown::parse_agents(&text)
                .into_iter()
                .map(|agent| Candidate {
                    label: format!("{file_name} -> {}", agent.name),
                    source: source.path.clone(),
                    stem: None,
                    value: agent.to_value(),
                })
                .collect(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: PathBuf,
}

/// Every valid agent reachable from `input`, sorted by name.
///
/// Unparsable and invalid definitions are skipped silently; this feeds
/// selection menus, not builds.
pub fn list_agents(input: &Path) -> Result<Vec<AgentSummary>> {
    let Some(sources) = discover(input)? else {
        return Ok(Vec::new());
    };

    let mut agents = Vec::new();
    for source in &sources {
        let LoadOutcome::Candidates(candidates) = load(source)? else {
            continue;
        };
        for candidate in candidates {
            if let Ok(agent) = schema::validate(&candidate.value) {
                agents.push(AgentSummary {
                    slug: candidate.slug(&agent),
                    name: agent.name,
                    description: agent.description,
                    source: candidate.source,
                });
            }
        }
    }
    agents.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(agents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CODER_YAML: &str =
        "name: Coder\nrole: Builder\nsystemPrompt: Execute one task at a time.\n";

    #[test]
    fn discover_missing_input() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&dir.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn discover_directory_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.yml"), CODER_YAML).unwrap();
        std::fs::write(dir.path().join("a.yaml"), CODER_YAML).unwrap();
        std::fs::write(dir.path().join("team.md"), "# X").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.yaml")).unwrap();

        let sources = discover(dir.path()).unwrap().unwrap();
        let names: Vec<String> = sources.iter().map(|s| s.file_name()).collect();
        assert_eq!(names, vec!["a.yaml", "b.yml", "team.md"]);
        assert_eq!(sources[2].kind, SourceKind::Markdown);
    }

    #[test]
    fn discover_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agents.md");
        std::fs::write(&path, "# X").unwrap();
        let sources = discover(&path).unwrap().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].kind, SourceKind::Markdown);
    }

    #[test]
    fn yaml_candidate_uses_file_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dev.coder.yaml");
        std::fs::write(&path, CODER_YAML).unwrap();
        let source = SourceFile {
            path,
            kind: SourceKind::Yaml,
        };
        let LoadOutcome::Candidates(candidates) = load(&source).unwrap() else {
            panic!("expected candidates");
        };
        let agent = schema::validate(&candidates[0].value).unwrap();
        assert_eq!(candidates[0].slug(&agent), "dev.coder");
        assert_eq!(candidates[0].label, "dev.coder.yaml");
    }

    #[test]
    fn uppercase_extension_is_stripped_from_slug() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Coder.YAML"), CODER_YAML).unwrap();

        let sources = discover(dir.path()).unwrap().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].kind, SourceKind::Yaml);

        let LoadOutcome::Candidates(candidates) = load(&sources[0]).unwrap() else {
            panic!("expected candidates");
        };
        let agent = schema::validate(&candidates[0].value).unwrap();
        assert_eq!(candidates[0].slug(&agent), "Coder");
        assert_eq!(candidates[0].label, "Coder.YAML");
    }

    #[test]
    fn malformed_yaml_is_a_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "name: [unclosed\n").unwrap();
        let source = SourceFile {
            path,
            kind: SourceKind::Yaml,
        };
        assert!(matches!(load(&source).unwrap(), LoadOutcome::ParseFailed(_)));
    }

    #[test]
    fn markdown_candidates_slug_from_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("agents.md");
        std::fs::write(
            &path,
            "# Project Architect 🏗️\n> Visionary\n## System Prompt\nWrite the spec first.\n",
        )
        .unwrap();
        let source = SourceFile {
            path,
            kind: SourceKind::Markdown,
        };
        let LoadOutcome::Candidates(candidates) = load(&source).unwrap() else {
            panic!("expected candidates");
        };
        assert_eq!(candidates[0].label, "agents.md -> Project Architect");
        let agent = schema::validate(&candidates[0].value).unwrap();
        assert_eq!(candidates[0].slug(&agent), "project-architect");
    }

    #[test]
    fn list_agents_skips_invalid_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("reviewer.yaml"),
            "name: reviewer\nrole: QA\ndescription: Checks work\nsystemPrompt: Review every change.\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("coder.yaml"), CODER_YAML).unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "name: Bad\n").unwrap();
        std::fs::write(dir.path().join("worse.yaml"), "name: [unclosed\n").unwrap();

        let agents = list_agents(dir.path()).unwrap();
        let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Coder", "reviewer"]);
        assert_eq!(agents[1].description.as_deref(), Some("Checks work"));
    }

    #[test]
    fn list_agents_missing_input_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_agents(&dir.path().join("definitions")).unwrap().is_empty());
    }
}
