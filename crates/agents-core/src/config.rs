use crate::error::Result;
use crate::paths;
use crate::target::TargetSelection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// InstallerConfig
// ---------------------------------------------------------------------------

/// Project defaults read from `.agents.yaml`. Every field is optional;
/// command-line flags take precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
}

fn default_docs_dir() -> String {
    paths::DOCS_DIR.to_string()
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            input: None,
            out: None,
            targets: Vec::new(),
            docs_dir: default_docs_dir(),
        }
    }
}

impl InstallerConfig {
    /// Load `<root>/.agents.yaml`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: InstallerConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Configured input, resolved against `root` when relative.
    pub fn input_path(&self, root: &Path) -> Option<PathBuf> {
        self.input.as_ref().map(|p| root.join(p))
    }

    /// Configured output root, resolved against `root` when relative.
    pub fn out_path(&self, root: &Path) -> Option<PathBuf> {
        self.out.as_ref().map(|p| root.join(p))
    }

    pub fn docs_path(&self, root: &Path) -> PathBuf {
        root.join(&self.docs_dir)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let selection = TargetSelection::from_ids(&self.targets);
        for unknown in &selection.unknown {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown target '{unknown}' in targets"),
            });
        }

        if self.docs_dir.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "docs_dir must not be empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = InstallerConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.docs_dir, "docs");
        assert!(cfg.targets.is_empty());
        assert!(cfg.input.is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cfg = InstallerConfig {
            input: Some(PathBuf::from("agents.md")),
            out: Some(PathBuf::from("build")),
            targets: vec!["gemini".to_string(), "kilo".to_string()],
            docs_dir: "handbook".to_string(),
        };
        cfg.save(dir.path()).unwrap();
        let loaded = InstallerConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.targets, vec!["gemini", "kilo"]);
        assert_eq!(loaded.input_path(dir.path()), Some(dir.path().join("agents.md")));
        assert_eq!(loaded.out_path(dir.path()), Some(dir.path().join("build")));
        assert_eq!(loaded.docs_path(dir.path()), dir.path().join("handbook"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".agents.yaml"), "targets: [roo]\n").unwrap();
        let cfg = InstallerConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.targets, vec!["roo"]);
        assert_eq!(cfg.docs_dir, "docs");
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".agents.yaml"), "\n").unwrap();
        assert_eq!(InstallerConfig::load(dir.path()).unwrap().docs_dir, "docs");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".agents.yaml"), "targets: [roo\n").unwrap();
        assert!(InstallerConfig::load(dir.path()).is_err());
    }

    #[test]
    fn validate_flags_unknown_targets() {
        let cfg = InstallerConfig {
            targets: vec!["gemini".to_string(), "cursor".to_string()],
            ..Default::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("unknown target 'cursor'"));
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }

    #[test]
    fn validate_rejects_blank_docs_dir() {
        let cfg = InstallerConfig {
            docs_dir: " ".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().iter().any(|w| w.level == WarnLevel::Error));
    }
}
