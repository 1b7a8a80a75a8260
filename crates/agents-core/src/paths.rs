use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DEFINITIONS_DIR: &str = "definitions";
pub const AGENTS_MD: &str = "agents.md";
pub const DOCS_DIR: &str = "docs";
pub const README_MD: &str = "README.md";
pub const CONFIG_FILE: &str = ".agents.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn definitions_dir(root: &Path) -> PathBuf {
    root.join(DEFINITIONS_DIR)
}

pub fn agents_md_path(root: &Path) -> PathBuf {
    root.join(AGENTS_MD)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn readme_path(docs_dir: &Path) -> PathBuf {
    docs_dir.join(README_MD)
}

/// Pick the default input when none was given explicitly.
///
/// `definitions/` wins when present, then a root-level `agents.md`. When
/// neither exists the definitions directory is returned so the build reports
/// it as missing.
pub fn default_input(root: &Path) -> PathBuf {
    let definitions = definitions_dir(root);
    if definitions.exists() {
        return definitions;
    }
    let agents_md = agents_md_path(root);
    if agents_md.is_file() {
        return agents_md;
    }
    definitions
}

/// Lowercased file extension, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// File name with a trailing `.yaml` / `.yml` removed, in any letter case.
pub fn yaml_stem(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    [".yaml", ".yml"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &file_name[..file_name.len() - ext.len()])
        .unwrap_or(file_name)
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

static STRIP_RE: OnceLock<Regex> = OnceLock::new();
static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();

fn strip_re() -> &'static Regex {
    // Word characters are ASCII-only here: accented letters and emoji drop out.
    STRIP_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap())
}

fn separator_re() -> &'static Regex {
    SEPARATOR_RE.get_or_init(|| Regex::new(r"[\s_-]+").unwrap())
}

/// Derive a filesystem-safe slug from an agent name.
///
/// `"Project Architect 🏗️"` becomes `"project-architect"`. The result may be
/// empty when the name has no ASCII word characters.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = strip_re().replace_all(&lowered, "");
    let collapsed = separator_re().replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
