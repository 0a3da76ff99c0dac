use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::cli::utils::output_table;
use crate::cli::OutputFormat;
use crate::database::models::{Project, Role, User};
use crate::schema::{Entity, FieldDescriptor, FieldKind};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityKind {
    Users,
    Projects,
    Roles,
}

impl EntityKind {
    fn describe(self) -> (&'static str, &'static str, Vec<FieldDescriptor>) {
        match self {
            EntityKind::Users => (User::TABLE, User::SEARCH_FIELD, User::schema().describe_fields()),
            EntityKind::Projects => (Project::TABLE, Project::SEARCH_FIELD, Project::schema().describe_fields()),
            EntityKind::Roles => (Role::TABLE, Role::SEARCH_FIELD, Role::schema().describe_fields()),
        }
    }
}

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Show the editable fields of an entity type")]
    Show {
        #[arg(value_enum, help = "Entity type")]
        entity: EntityKind,
    },
}

pub async fn handle(cmd: SchemaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SchemaCommands::Show { entity } => {
            let (table, search_field, fields) = entity.describe();
            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "table": table,
                            "search_field": search_field,
                            "fields": fields
                        }))?
                    );
                    Ok(())
                }
                OutputFormat::Text => {
                    let rows = fields.iter().map(|d| vec![d.name.to_string(), kind_text(&d.kind)]).collect();
                    output_table(&output_format, table, &["field", "kind"], rows)
                }
            }
        }
    }
}

fn kind_text(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text => "text".to_string(),
        FieldKind::Credential { salt_field } => format!("credential (salt: {})", salt_field),
        FieldKind::Choice { choices } => format!("choice [{}]", choices.join(", ")),
    }
}
