//! Pure renderers: one agent in, one artifact body out.
//!
//! None of these can fail. Optional fields render as empty text and empty
//! rule/tool lists drop their whole section.

use crate::agent::AgentDefinition;
use serde::{Deserialize, Serialize};

/// Permission groups granted to every generated custom mode.
pub const CUSTOM_MODE_GROUPS: [&str; 5] = ["read", "edit", "browser", "command", "mcp"];

fn push_bullets(parts: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    parts.push(heading.to_string());
    parts.extend(items.iter().map(|item| format!("- {item}")));
}

fn identity_line(agent: &AgentDefinition) -> String {
    match agent.emoji() {
        "" => format!("You are **{}**", agent.name),
        emoji => format!("You are **{}** {emoji}", agent.name),
    }
}

// ---------------------------------------------------------------------------
// Gemini CLI (TOML command)
// ---------------------------------------------------------------------------

pub fn gemini_prompt_body(agent: &AgentDefinition) -> String {
    let mut parts = vec![
        "# Identity".to_string(),
        identity_line(agent),
        format!("Role: {}", agent.role),
        String::new(),
        "# Core Instructions".to_string(),
        agent.system_prompt.trim().to_string(),
    ];
    if !agent.rules.is_empty() {
        parts.push(String::new());
        push_bullets(&mut parts, "# Rules & Guidelines", &agent.rules);
    }
    if !agent.tools.is_empty() {
        parts.push(String::new());
        push_bullets(&mut parts, "# Preferred Tools", &agent.tools);
    }
    parts.join("\n")
}

pub fn gemini_toml(agent: &AgentDefinition) -> String {
    let mut out = format!(
        "description = \"{}\"\n\nprompt = \"\"\"\n{}\n\"\"\"\n",
        escape_basic(agent.summary()),
        escape_multiline(&gemini_prompt_body(agent)),
    );
    if !agent.rules.is_empty() {
        out.push_str("\nrules = [\n");
        for rule in &agent.rules {
            out.push_str(&format!("  \"{}\",\n", escape_basic(rule)));
        }
        out.push_str("]\n");
    }
    out
}

/// Escape text for a single-line TOML basic string.
pub fn escape_basic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push('\t'),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Escape text for a TOML multi-line basic string (`"""`).
///
/// Backslashes are doubled and every run of three quotes is broken up so the
/// body can never close the string early.
pub fn escape_multiline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' | '\t' => out.push(c),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.replace("\"\"\"", "\\\"\\\"\\\"")
}

// ---------------------------------------------------------------------------
// Roo Code / Cline rules
// ---------------------------------------------------------------------------

/// Roo/Cline rules file. The heading carries the plain name; the emoji
/// lives on the custom-mode record instead.
pub fn roo_rules(agent: &AgentDefinition) -> String {
    let mut parts = vec![
        format!("# {} ({})", agent.name, agent.role),
        String::new(),
        agent.system_prompt.trim().to_string(),
    ];
    if !agent.rules.is_empty() {
        parts.push(String::new());
        push_bullets(&mut parts, "## Analytical Rules & Guidelines", &agent.rules);
    }
    if !agent.tools.is_empty() {
        parts.push(String::new());
        parts.push("## Tool Usage Preferences".to_string());
        parts.extend(
            agent
                .tools
                .iter()
                .map(|tool| format!("- Prefer using {tool} when applicable.")),
        );
    }
    parts.push(String::new());
    parts.join("\n")
}

/// One entry of a Roo/Cline `customModes` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMode {
    pub slug: String,
    pub name: String,
    pub role_definition: String,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomModesManifest {
    pub custom_modes: Vec<CustomMode>,
}

pub fn custom_mode(agent: &AgentDefinition, slug: &str) -> CustomMode {
    let mut parts = vec![
        format!("# {} ({})", agent.name, agent.role),
        String::new(),
        agent.system_prompt.trim().to_string(),
    ];
    if !agent.rules.is_empty() {
        parts.push(String::new());
        push_bullets(&mut parts, "## Rules & Guidelines", &agent.rules);
    }

    let name = match agent.emoji() {
        "" => agent.name.clone(),
        emoji => format!("{emoji} {}", agent.name),
    };

    CustomMode {
        slug: slug.to_string(),
        name,
        role_definition: parts.join("\n"),
        groups: CUSTOM_MODE_GROUPS.iter().map(|g| g.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Kilo Code / OpenCode markdown
// ---------------------------------------------------------------------------

fn config_markdown(marker: &str, agent: &AgentDefinition) -> String {
    let mut parts = vec![
        format!("<!--- {marker} Agent Config --->"),
        format!("# {}", agent.title()),
        format!("**Role**: {}", agent.role),
        String::new(),
        "## Instructions".to_string(),
        agent.system_prompt.trim().to_string(),
    ];
    if !agent.rules.is_empty() {
        parts.push(String::new());
        push_bullets(&mut parts, "## Constraints", &agent.rules);
    }
    parts.push(String::new());
    parts.join("\n")
}

pub fn kilo_markdown(agent: &AgentDefinition) -> String {
    config_markdown("Kilo Code", agent)
}

pub fn opencode_markdown(agent: &AgentDefinition) -> String {
    // A JSON string literal is also a valid YAML double-quoted scalar.
    let description = serde_json::Value::String(agent.summary().to_string()).to_string();
    format!(
        "---\ndescription: {description}\n---\n\n{}",
        config_markdown("OpenCode", agent)
    )
}

// ---------------------------------------------------------------------------
// GitHub Copilot instructions
// ---------------------------------------------------------------------------

pub fn copilot_instructions(agent: &AgentDefinition) -> String {
    let mut parts = vec![
        format!("<!-- GitHub Copilot Instructions for {} -->", agent.name),
        "# Identity and Role".to_string(),
        format!("{}.", identity_line(agent)),
        format!("**Role**: {}", agent.role),
        String::new(),
        "## Core Instructions".to_string(),
        agent.system_prompt.trim().to_string(),
    ];
    if !agent.rules.is_empty() {
        parts.push(String::new());
        push_bullets(&mut parts, "## Rules & Guidelines", &agent.rules);
    }
    parts.extend([
        String::new(),
        "## Response Style".to_string(),
        "- Be concise and objective.".to_string(),
        "- Answer in the language of the request unless told otherwise.".to_string(),
        "- Follow the project conventions defined in the workspace.".to_string(),
        String::new(),
    ]);
    parts.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
