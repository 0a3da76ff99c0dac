use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::config;

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("usersNavigationLabel", "Users"),
    ("projectsNavigationLabel", "Projects"),
    ("rolesNavigationLabel", "Roles"),
    ("saveButtonLabel", "Save"),
    ("cancelButtonLabel", "Cancel"),
    ("deleteButtonLabel", "Delete"),
    ("addNewButtonLabel", "New"),
    ("filterPlaceholder", "Filter by name"),
    ("filterButtonLabel", "Filter"),
    ("errorHappened", "An error occurred"),
    ("deleteConfirmTitle", "Delete"),
    ("deleteConfirmMessage", "Are you sure you want to delete {name}?"),
    ("confirmOkLabel", "OK"),
    ("confirmCancelLabel", "Cancel"),
    ("loginTitle", "Log in"),
    ("loginButtonLabel", "Log in"),
    ("logoutButtonLabel", "Log out"),
    ("loginFailed", "Invalid username or password"),
    ("usernameFieldLabel", "Username"),
    ("displayNameFieldLabel", "Display name"),
    ("emailFieldLabel", "Email"),
    ("passwordHashFieldLabel", "Password"),
    ("passwordFieldLabel", "Password"),
    ("nameFieldLabel", "Name"),
    ("descriptionFieldLabel", "Description"),
    ("statusFieldLabel", "Status"),
    ("privilegeLevelFieldLabel", "Privilege level"),
];

/// Display labels keyed by message key
#[derive(Debug, Clone)]
pub struct Messages {
    entries: HashMap<String, String>,
}

impl Messages {
    /// The built-in English labels
    pub fn defaults() -> Self {
        Self {
            entries: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Defaults overlaid with a flat YAML mapping of key to label
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let overrides: HashMap<String, String> = serde_yaml::from_str(yaml)?;
        let mut messages = Self::defaults();
        messages.entries.extend(overrides);
        Ok(messages)
    }

    fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::defaults();
        };

        match std::fs::read_to_string(Path::new(path)) {
            Ok(yaml) => Self::from_yaml(&yaml).unwrap_or_else(|e| {
                warn!("Ignoring malformed messages file {}: {}", path, e);
                Self::defaults()
            }),
            Err(e) => {
                warn!("Cannot read messages file {}: {}", path, e);
                Self::defaults()
            }
        }
    }

    /// Label for `key`, or the key itself when missing
    pub fn get(&self, key: &str) -> String {
        self.entries.get(key).cloned().unwrap_or_else(|| key.to_string())
    }

    /// Label for `key` with `{name}` style placeholders substituted
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.get(key), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::defaults()
    }
}

static MESSAGES: Lazy<Messages> = Lazy::new(|| Messages::load(config::config().ui.messages_path.as_deref()));

pub fn messages() -> &'static Messages {
    &MESSAGES
}
