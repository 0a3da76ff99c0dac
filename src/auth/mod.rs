use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::schema::Choice;

/// One-way credential hash: hex SHA-256 over the salt followed by the raw value
pub fn password_hash(salt: &str, raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a raw password against a stored hash salted with the username
pub fn verify_password(username: &str, raw: &str, stored_hash: &str) -> bool {
    !stored_hash.is_empty() && password_hash(username, raw) == stored_hash
}

/// Coarse privilege gate for routes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrivilegeLevel {
    #[default]
    None,
    Admin,
}

impl Choice for PrivilegeLevel {
    const CHOICES: &'static [&'static str] = &["none", "admin"];

    fn as_str(&self) -> &'static str {
        match self {
            PrivilegeLevel::None => "none",
            PrivilegeLevel::Admin => "admin",
        }
    }

    fn from_choice(value: &str) -> Option<Self> {
        match value {
            "none" => Some(PrivilegeLevel::None),
            "admin" => Some(PrivilegeLevel::Admin),
            _ => None,
        }
    }
}

/// Per-session login state
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    username: Option<String>,
}

impl ClientState {
    pub fn user_level(&self) -> PrivilegeLevel {
        if self.is_logged_in() {
            PrivilegeLevel::Admin
        } else {
            PrivilegeLevel::None
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn log_in(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
    }

    pub fn log_out(&mut self) {
        self.username = None;
    }
}
