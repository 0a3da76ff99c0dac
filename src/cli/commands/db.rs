use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::{Project, Role, User};
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create missing tables in the configured PostgreSQL database")]
    Migrate,

    #[command(about = "Print the CREATE TABLE statements without connecting")]
    Ddl,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            let database = &config::config().database;
            let pool = DatabaseManager::connect(database)
                .await
                .context("cannot connect to DATABASE_URL")?;

            DatabaseManager::migrate::<User>(&pool).await?;
            DatabaseManager::migrate::<Project>(&pool).await?;
            DatabaseManager::migrate::<Role>(&pool).await?;

            output_success(
                &output_format,
                "Tables are up to date",
                Some(json!({ "tables": ["users", "projects", "roles"] })),
            )
        }
        DbCommands::Ddl => {
            let statements = [
                DatabaseManager::create_table_ddl::<User>(),
                DatabaseManager::create_table_ddl::<Project>(),
                DatabaseManager::create_table_ddl::<Role>(),
            ];
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "statements": statements }))?);
                }
                OutputFormat::Text => {
                    for statement in &statements {
                        println!("{};\n", statement);
                    }
                }
            }
            Ok(())
        }
    }
}
