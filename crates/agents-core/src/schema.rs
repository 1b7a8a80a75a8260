//! Shape checking for raw agent definitions.
//!
//! Input is an arbitrary YAML value, either parsed straight from a `.yaml`
//! file or assembled by the Markdown parser. Every field is checked
//! independently so a single pass reports all violations at once.

use crate::agent::AgentDefinition;
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;

pub const MIN_SYSTEM_PROMPT_CHARS: usize = 10;

/// Path reported when the document itself is not a mapping.
pub const ROOT_PATH: &str = "(root)";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Non-empty, ordered list of field violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any violation is reported against `field` or one of its elements.
    pub fn touches(&self, field: &str) -> bool {
        self.0.iter().any(|e| {
            e.path == field
                || e.path
                    .strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check `value` against the agent schema.
///
/// Unknown keys are ignored. Optional fields may be absent but, when present,
/// must have the right type.
pub fn validate(value: &Value) -> Result<AgentDefinition, ValidationErrors> {
    let value = untag(value);
    if !value.is_mapping() {
        return Err(ValidationErrors(vec![FieldError::new(
            ROOT_PATH,
            format!("Expected object, received {}", type_name(value)),
        )]));
    }

    let mut errors = Vec::new();
    let name = required_string(value, "name", 1, "Name is required", &mut errors);
    let role = required_string(value, "role", 1, "Role is required", &mut errors);
    let description = optional_string(value, "description", &mut errors);
    let emoji = optional_string(value, "emoji", &mut errors);
    let system_prompt = required_string(
        value,
        "systemPrompt",
        MIN_SYSTEM_PROMPT_CHARS,
        "System prompt must be at least 10 characters",
        &mut errors,
    );
    let rules = optional_string_list(value, "rules", &mut errors);
    let tools = optional_string_list(value, "tools", &mut errors);

    match (name, role, system_prompt) {
        (Some(name), Some(role), Some(system_prompt)) if errors.is_empty() => {
            Ok(AgentDefinition {
                name,
                role,
                description,
                emoji,
                system_prompt,
                rules,
                tools,
            })
        }
        _ => Err(ValidationErrors(errors)),
    }
}

fn required_string(
    value: &Value,
    key: &str,
    min_chars: usize,
    too_short: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(field) = value.get(key).map(untag) else {
        errors.push(FieldError::new(key, "Required"));
        return None;
    };
    let Some(text) = field.as_str() else {
        errors.push(FieldError::new(
            key,
            format!("Expected string, received {}", type_name(field)),
        ));
        return None;
    };
    if text.chars().count() < min_chars {
        errors.push(FieldError::new(key, too_short));
        return None;
    }
    Some(text.to_string())
}

fn optional_string(value: &Value, key: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let field = untag(value.get(key)?);
    match field.as_str() {
        Some(text) => Some(text.to_string()),
        None => {
            errors.push(FieldError::new(
                key,
                format!("Expected string, received {}", type_name(field)),
            ));
            None
        }
    }
}

fn optional_string_list(value: &Value, key: &str, errors: &mut Vec<FieldError>) -> Vec<String> {
    let Some(field) = value.get(key).map(untag) else {
        return Vec::new();
    };
    let Some(items) = field.as_sequence() else {
        errors.push(FieldError::new(
            key,
            format!("Expected array, received {}", type_name(field)),
        ));
        return Vec::new();
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().map(untag).enumerate() {
        match item.as_str() {
            Some(text) => out.push(text.to_string()),
            None => errors.push(FieldError::new(
                format!("{key}.{i}"),
                format!("Expected string, received {}", type_name(item)),
            )),
        }
    }
    out
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn type_name(value: &Value) -> &'static str {
    match untag(value) {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "unknown",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
