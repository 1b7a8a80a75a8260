use serde::{Deserialize, Serialize};

/// A validated agent definition.
///
/// Only produced by [`crate::schema::validate`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDefinition {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub system_prompt: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl AgentDefinition {
    /// Emoji as text, empty when absent.
    pub fn emoji(&self) -> &str {
        self.emoji.as_deref().unwrap_or("")
    }

    /// Name followed by the emoji, separated by a space when there is one.
    pub fn title(&self) -> String {
        match self.emoji() {
            "" => self.name.clone(),
            emoji => format!("{} {}", self.name, emoji),
        }
    }

    /// Short description, falling back to the role.
    pub fn summary(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => &self.role,
        }
    }
}
