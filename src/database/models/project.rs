use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::schema::{Choice, Entity, EntitySchema};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Suspended,
    Closed,
}

impl Choice for ProjectStatus {
    const CHOICES: &'static [&'static str] = &["active", "suspended", "closed"];

    fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Suspended => "suspended",
            ProjectStatus::Closed => "closed",
        }
    }

    fn from_choice(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ProjectStatus::Active),
            "suspended" => Some(ProjectStatus::Suspended),
            "closed" => Some(ProjectStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

static SCHEMA: Lazy<EntitySchema<Project>> = Lazy::new(|| {
    EntitySchema::<Project>::builder()
        .text("name", |p: &Project| p.name.clone(), |p, v| p.name = v)
        .optional_text("description", |p: &Project| p.description.clone(), |p, v| p.description = v)
        .choice("status", |p: &Project| p.status, |p, v| p.status = v)
        .build()
});

impl Entity for Project {
    const TABLE: &'static str = "projects";
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
