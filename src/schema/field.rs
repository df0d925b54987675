use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported data kinds for wizard fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text; together with the `required` flag this covers both
    /// mandatory and optional strings.
    Text,
    /// Text that must read as an email address.
    Email,
    /// Boolean toggle. `false` is a valid answer, not an absent one, so a
    /// flag can never be missing.
    Flag,
}

impl FieldKind {
    /// Value a freshly created session starts with for this kind.
    pub fn default_value(self) -> FieldValue {
        match self {
            FieldKind::Text | FieldKind::Email => FieldValue::Text(String::new()),
            FieldKind::Flag => FieldValue::Flag(false),
        }
    }
}

/// A single field's current value.
///
/// Serialized untagged so snapshots read as plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn flag(value: bool) -> Self {
        FieldValue::Flag(value)
    }

    pub(crate) fn matches_kind(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Text(_), FieldKind::Text)
                | (FieldValue::Text(_), FieldKind::Email)
                | (FieldValue::Flag(_), FieldKind::Flag)
        )
    }
}

/// Field-level validation failure. Always reported as data attached to the
/// session state, never thrown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("a value is required")]
    Missing,
    #[error("the value is not in a valid format")]
    InvalidFormat,
}

/// Declarative description of a single wizard field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    key: String,
    label: String,
    kind: FieldKind,
    #[serde(default = "default_required")]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

fn default_required() -> bool {
    true
}

impl FieldSchema {
    /// Required free-form text field.
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::build(key, label, FieldKind::Text, true)
    }

    /// Email field; required by construction so an empty value reads as
    /// missing rather than silently valid.
    pub fn email(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::build(key, label, FieldKind::Email, true)
    }

    /// Boolean toggle; optional by construction.
    pub fn flag(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::build(key, label, FieldKind::Flag, false)
    }

    fn build(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        required: bool,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            required,
            help: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Pure per-field validation: the kind picks the rule, `required`
    /// decides whether emptiness is an error.
    pub fn validate(&self, value: &FieldValue) -> Option<FieldError> {
        match (self.kind, value) {
            (FieldKind::Flag, FieldValue::Flag(_)) => None,
            (FieldKind::Text, FieldValue::Text(raw)) => {
                if raw.trim().is_empty() && self.required {
                    Some(FieldError::Missing)
                } else {
                    None
                }
            }
            (FieldKind::Email, FieldValue::Text(raw)) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    self.required.then_some(FieldError::Missing)
                } else if is_valid_email(trimmed) {
                    None
                } else {
                    Some(FieldError::InvalidFormat)
                }
            }
            // Kind-mismatched values are rejected at write time by the
            // session; reaching this arm means the value bypassed it.
            _ => Some(FieldError::InvalidFormat),
        }
    }
}

/// Accepts local-part `@` domain where the domain has at least two
/// non-empty dot-separated labels: `a@b` fails, `a@b.com` passes.
fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    let mut labels = 0;
    for label in domain.split('.') {
        if label.is_empty() {
            return false;
        }
        labels += 1;
    }
    labels >= 2
}
