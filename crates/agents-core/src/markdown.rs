//! Markdown agent documents.
//!
//! One agent per level-1 heading:
//!
//! ```markdown
//! # Project Architect 🏗️
//! > The Visionary
//!
//! ## System Prompt
//! Turn the idea into a specification.
//!
//! ## Rules
//! - Ask before assuming
//! * Keep it short
//!
//! ## Tools
//! - web-search
//! ```
//!
//! Parsing never fails; missing pieces come back empty and are left for the
//! schema validator to reject.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

/// Raw agent extracted from one heading block, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownAgent {
    pub name: String,
    pub emoji: String,
    pub role: String,
    pub system_prompt: String,
    pub rules: Vec<String>,
    pub tools: Vec<String>,
}

impl MarkdownAgent {
    /// Convert into the same shape a YAML definition file has, so both
    /// sources share one validator.
    pub fn to_value(&self) -> Value {
        let mut map = Mapping::new();
        map.insert("name".into(), self.name.clone().into());
        map.insert("role".into(), self.role.clone().into());
        if !self.emoji.is_empty() {
            map.insert("emoji".into(), self.emoji.clone().into());
        }
        map.insert("systemPrompt".into(), self.system_prompt.clone().into());
        map.insert("rules".into(), string_list(&self.rules));
        map.insert("tools".into(), string_list(&self.tools));
        Value::Mapping(map)
    }
}

fn string_list(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static AGENT_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static SECTION_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static ROLE_RE: OnceLock<Regex> = OnceLock::new();
static TRAILING_SYMBOL_RE: OnceLock<Regex> = OnceLock::new();

fn agent_heading_re() -> &'static Regex {
    AGENT_HEADING_RE.get_or_init(|| Regex::new(r"(?m)^# ").unwrap())
}

fn section_heading_re() -> &'static Regex {
    SECTION_HEADING_RE.get_or_init(|| Regex::new(r"(?m)^## ").unwrap())
}

fn role_re() -> &'static Regex {
    ROLE_RE.get_or_init(|| Regex::new(r"(?m)^\s*>\s*(.+)$").unwrap())
}

fn trailing_symbol_re() -> &'static Regex {
    TRAILING_SYMBOL_RE
        .get_or_init(|| Regex::new(r"^(.*?)\s+([^A-Za-z0-9_\s]+)$").unwrap())
}

// ---------------------------------------------------------------------------
// Header tokenization
// ---------------------------------------------------------------------------

/// Split a heading line into `(name, emoji)`.
///
/// The last whitespace-separated token is taken as the emoji when it is made
/// only of non-word symbols and contains at least one non-ASCII character.
/// Plain ASCII punctuation (`"Agent X -"`) stays part of the name.
pub fn split_header(header: &str) -> (String, String) {
    let header = header.trim();
    if let Some(caps) = trailing_symbol_re().captures(header) {
        let token = caps[2].trim();
        if !token.is_ascii() {
            return (caps[1].trim().to_string(), token.to_string());
        }
    }
    (header.to_string(), String::new())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse every agent block in `content`.
///
/// Text before the first `# ` heading is ignored, so a document without
/// level-1 headings yields no agents.
pub fn parse_agents(content: &str) -> Vec<MarkdownAgent> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    agent_heading_re()
        .split(&normalized)
        .skip(1)
        .filter(|block| !block.trim().is_empty())
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<MarkdownAgent> {
    let (header, body) = block.split_once('\n').unwrap_or((block, ""));
    let (name, emoji) = split_header(header);
    if name.is_empty() {
        return None;
    }

    let mut agent = MarkdownAgent {
        name,
        emoji,
        ..Default::default()
    };

    if let Some(caps) = role_re().captures(body) {
        agent.role = caps[1].trim().to_string();
    }

    // The first piece is the preamble under the heading, not a section.
    for section in section_heading_re().split(body).skip(1) {
        let section = section.trim();
        if section.is_empty() {
            continue;
        }
        let (title, section_body) = section.split_once('\n').unwrap_or((section, ""));
        let title = title.trim().to_lowercase();

        if title.contains("system prompt") || title.contains("instructions") {
            agent.system_prompt = section_body.trim().to_string();
        } else if title.contains("rules") {
            agent.rules.extend(bullets(section_body));
        } else if title.contains("tools") {
            agent.tools.extend(bullets(section_body));
        }
    }

    Some(agent)
}

fn bullets(body: &str) -> impl Iterator<Item = String> + '_ {
    body.lines().filter_map(|line| {
        let line = line.trim();
        line.strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
            .map(|item| item.trim().to_string())
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
