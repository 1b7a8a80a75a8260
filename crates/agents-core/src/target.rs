use crate::agent::AgentDefinition;
use crate::error::{InstallerError, Result};
use crate::render;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// A downstream tool whose configuration format agents can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Gemini,
    Roo,
    Cline,
    Kilo,
    OpenCode,
    Copilot,
}

impl Target {
    pub fn all() -> &'static [Target] {
        &[
            Target::Gemini,
            Target::Roo,
            Target::Cline,
            Target::Kilo,
            Target::OpenCode,
            Target::Copilot,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Gemini => "gemini",
            Target::Roo => "roo",
            Target::Cline => "cline",
            Target::Kilo => "kilo",
            Target::OpenCode => "opencode",
            Target::Copilot => "copilot",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Target::Gemini => "Gemini CLI",
            Target::Roo => "Roo Code",
            Target::Cline => "Cline",
            Target::Kilo => "Kilo Code",
            Target::OpenCode => "OpenCode",
            Target::Copilot => "GitHub Copilot",
        }
    }

    /// Output subdirectory, relative to the output root.
    pub fn subdir(self) -> &'static str {
        match self {
            Target::Gemini => ".gemini/commands",
            Target::Roo => ".roo/commands",
            Target::Cline => ".cline/commands",
            Target::Kilo => ".kilocode/workflows",
            Target::OpenCode => ".opencode/command",
            Target::Copilot => ".github/agents",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Target::Gemini => "toml",
            _ => "md",
        }
    }

    /// Whether the target is pre-selected in the interactive picker.
    pub fn checked_by_default(self) -> bool {
        self == Target::Gemini
    }

    pub fn relative_path(self, slug: &str) -> PathBuf {
        PathBuf::from(self.subdir()).join(format!("{slug}.{}", self.extension()))
    }

    pub fn render(self, agent: &AgentDefinition) -> String {
        match self {
            Target::Gemini => render::gemini_toml(agent),
            Target::Roo | Target::Cline => render::roo_rules(agent),
            Target::Kilo => render::kilo_markdown(agent),
            Target::OpenCode => render::opencode_markdown(agent),
            Target::Copilot => render::copilot_instructions(agent),
        }
    }

    /// Relative path of the artifact written once per run, if the target has one.
    pub fn batch_path(self) -> Option<PathBuf> {
        match self {
            Target::Roo => Some(PathBuf::from("roo_custom_modes.json")),
            Target::Cline => Some(PathBuf::from("cline_custom_modes.json")),
            Target::Copilot => Some(PathBuf::from(".github/copilot-instructions.md")),
            _ => None,
        }
    }

    /// Render the per-run artifact from every agent built in this run.
    ///
    /// Returns `None` when the target has no batch artifact or nothing was built.
    pub fn render_batch(self, built: &[(String, AgentDefinition)]) -> Result<Option<String>> {
        if built.is_empty() {
            return Ok(None);
        }
        match self {
            Target::Roo | Target::Cline => {
                let manifest = render::CustomModesManifest {
                    custom_modes: built
                        .iter()
                        .map(|(slug, agent)| render::custom_mode(agent, slug))
                        .collect(),
                };
                Ok(Some(serde_json::to_string_pretty(&manifest)?))
            }
            Target::Copilot => {
                let (_, main) = built
                    .iter()
                    .find(|(slug, _)| slug.contains("coder"))
                    .unwrap_or(&built[0]);
                Ok(Some(render::copilot_instructions(main)))
            }
            _ => Ok(None),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Target {
    type Err = InstallerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Target::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == id)
            .ok_or_else(|| InstallerError::UnknownTarget(s.trim().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Targets picked for a run, plus any ids that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetSelection {
    pub targets: Vec<Target>,
    pub unknown: Vec<String>,
}

impl TargetSelection {
    /// Resolve free-form ids. Matching ignores case and surrounding
    /// whitespace; duplicates collapse and blank entries are dropped.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = TargetSelection::default();
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() {
                continue;
            }
            match id.parse::<Target>() {
                Ok(t) if !selection.targets.contains(&t) => selection.targets.push(t),
                Ok(_) => {}
                Err(_) => selection.unknown.push(id.to_string()),
            }
        }
        selection
    }

    /// Parse a comma-separated list such as `"gemini, Roo"`.
    pub fn parse_list(list: &str) -> Self {
        Self::from_ids(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str) -> AgentDefinition {
        AgentDefinition {
            name: name.to_string(),
            role: "Role".to_string(),
            description: None,
            emoji: None,
            system_prompt: "Do the thing well.".to_string(),
            rules: vec![],
            tools: vec![],
        }
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        for t in Target::all() {
            assert_eq!(t.as_str().parse::<Target>().unwrap(), *t);
        }
        assert_eq!(" OpenCode ".parse::<Target>().unwrap(), Target::OpenCode);
        assert!("cursor".parse::<Target>().is_err());
    }

    #[test]
    fn relative_paths() {
        assert_eq!(
            Target::Gemini.relative_path("coder"),
            PathBuf::from(".gemini/commands/coder.toml")
        );
        assert_eq!(
            Target::Kilo.relative_path("coder"),
            PathBuf::from(".kilocode/workflows/coder.md")
        );
    }

    #[test]
    fn subdirs_are_distinct() {
        let mut dirs: Vec<&str> = Target::all().iter().map(|t| t.subdir()).collect();
        dirs.sort();
        dirs.dedup();
        assert_eq!(dirs.len(), Target::all().len());
    }

    #[test]
    fn parse_list_normalizes_and_reports_unknown() {
        let sel = TargetSelection::parse_list(" Gemini, roo,,gemini , cursor");
        assert_eq!(sel.targets, vec![Target::Gemini, Target::Roo]);
        assert_eq!(sel.unknown, vec!["cursor"]);
    }

    #[test]
    fn custom_modes_manifest_lists_every_agent() {
        let built = vec![
            ("coder".to_string(), agent("Coder")),
            ("auditor".to_string(), agent("Auditor")),
        ];
        let json = Target::Roo.render_batch(&built).unwrap().unwrap();
        let parsed: render::CustomModesManifest = serde_json::from_str(&json).unwrap();
        let slugs: Vec<&str> = parsed.custom_modes.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, vec!["coder", "auditor"]);
    }

    #[test]
    fn copilot_batch_prefers_coder() {
        let built = vec![
            ("auditor".to_string(), agent("Auditor")),
            ("senior-coder".to_string(), agent("Senior Coder")),
        ];
        let text = Target::Copilot.render_batch(&built).unwrap().unwrap();
        assert!(text.contains("Instructions for Senior Coder"));

        let only_auditor = vec![("auditor".to_string(), agent("Auditor"))];
        let text = Target::Copilot.render_batch(&only_auditor).unwrap().unwrap();
        assert!(text.contains("Instructions for Auditor"));
    }

    #[test]
    fn batch_is_skipped_when_nothing_built() {
        assert!(Target::Roo.render_batch(&[]).unwrap().is_none());
        assert!(Target::Gemini
            .render_batch(&[("coder".to_string(), agent("Coder"))])
            .unwrap()
            .is_none());
    }
}
