use serde::Serialize;
use thiserror::Error;

/// Errors raised when writing a value through a schema accessor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidChoice { field: String, value: String },
}

/// How a field is edited and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Write-only value, stored as a hash salted with another field of the same entity
    Credential { salt_field: &'static str },
    /// Closed set of choices, in display order
    Choice { choices: &'static [&'static str] },
}

/// Schema metadata for one editable attribute. Never describes the identity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn text(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Text }
    }

    pub fn credential(name: &'static str, salt_field: &'static str) -> Self {
        Self { name, kind: FieldKind::Credential { salt_field } }
    }

    pub fn choice(name: &'static str, choices: &'static [&'static str]) -> Self {
        Self { name, kind: FieldKind::Choice { choices } }
    }

    pub fn is_credential(&self) -> bool {
        matches!(self.kind, FieldKind::Credential { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, FieldKind::Choice { .. })
    }

    /// Name of the field whose value salts this credential
    pub fn salt_field(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Credential { salt_field } => Some(salt_field),
            _ => None,
        }
    }

    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            FieldKind::Choice { choices } => Some(choices),
            _ => None,
        }
    }

    /// Message key for the field's label, e.g. `password_hash` -> `passwordHashFieldLabel`
    pub fn label_key(&self) -> String {
        let mut key = String::with_capacity(self.name.len() + 10);
        let mut upper_next = false;
        for c in self.name.chars() {
            if c == '_' {
                upper_next = true;
            } else if upper_next {
                key.extend(c.to_uppercase());
                upper_next = false;
            } else {
                key.push(c);
            }
        }
        key.push_str("FieldLabel");
        key
    }
}

/// Enumerations that can back a choice field
pub trait Choice: Sized + Copy + Send + Sync + 'static {
    const CHOICES: &'static [&'static str];

    fn as_str(&self) -> &'static str;

    fn from_choice(value: &str) -> Option<Self>;
}
