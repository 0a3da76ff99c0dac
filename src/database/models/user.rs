use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::schema::{Entity, EntitySchema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: Option<i64>,
    pub username: String,
    pub display_name: Option<String>,
    pub email: String,
    /// Hash of the password salted with `username`
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            ..Default::default()
        }
    }
}

static SCHEMA: Lazy<EntitySchema<User>> = Lazy::new(|| {
    EntitySchema::<User>::builder()
        .text("username", |u: &User| u.username.clone(), |u, v| u.username = v)
        .optional_text("display_name", |u: &User| u.display_name.clone(), |u, v| u.display_name = v)
        .text("email", |u: &User| u.email.clone(), |u, v| u.email = v)
        .credential(
            "password_hash",
            "username",
            |u: &User| u.password_hash.clone(),
            |u, v| u.password_hash = v,
        )
        .build()
});

impl Entity for User {
    const TABLE: &'static str = "users";
    const SEARCH_FIELD: &'static str = "username";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn assign_id(&mut self, id: i64) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    fn schema() -> &'static EntitySchema<Self> {
        &SCHEMA
    }

    fn display_name(&self) -> String {
        match &self.display_name {
            Some(name) => format!("{} ({})", name, self.username),
            None => self.username.clone(),
        }
    }
}
