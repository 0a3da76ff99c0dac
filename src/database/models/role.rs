use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::auth::PrivilegeLevel;
use crate::schema::{Entity, EntitySchema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub privilege_level: PrivilegeLevel,
}

impl Role {
    pub fn new(name: impl Into<String>, privilege_level: PrivilegeLevel) -> Self {
        Self {
            name: name.into(),
            privilege_level,
            ..Default::default()
        }
    }
}

static SCHEMA: Lazy<EntitySchema<Role>> = Lazy::new(|| {
    EntitySchema::<Role>::builder()
        .text("name", |r: &Role| r.name.clone(), |r, v| r.name = v)
        .optional_text("description", |r: &Role| r.description.clone(), |r, v| r.description = v)
        .choice("privilege_level", |r: &Role| r.privilege_level, |r, v| r.privilege_level = v)
        .build()
});

impl Entity for Role {
    const TABLE: &'static str = "roles";
    const SEARCH_FIELD: &'static str = "name";

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
        self.name.clone()
    }
}
