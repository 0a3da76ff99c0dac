use clap::Subcommand;
use serde_json::json;
use tracing::warn;

use crate::cli::utils::{output_empty_collection, output_success, output_table};
use crate::cli::OutputFormat;
use crate::config::{self, StorageKind};
use crate::database::models::User;
use crate::database::{Repositories, Repository};
use crate::schema::Entity;
use crate::services::AccountService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a console user")]
    Add {
        #[arg(help = "Login name")]
        username: String,

        #[arg(long, default_value = "", help = "Email address")]
        email: String,

        #[arg(long, help = "Password; stored salted with the username")]
        password: String,
    },

    #[command(about = "List console users")]
    List {
        #[arg(long, help = "Only users whose name starts with this text")]
        filter: Option<String>,
    },
}

async fn open_repositories() -> anyhow::Result<Repositories> {
    let database = &config::config().database;
    if database.storage == StorageKind::Memory {
        warn!("LIMBR_STORAGE is memory; changes made by this command are discarded on exit");
    }
    Ok(Repositories::open(database).await?)
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let repositories = open_repositories().await?;

    match cmd {
        UserCommands::Add { username, email, password } => {
            let accounts = AccountService::new(repositories.users.clone());
            let user = accounts.create_user(&username, &email, &password).await?;
            output_success(
                &output_format,
                &format!("User '{}' created", user.username),
                Some(json!({ "id": user.id(), "username": user.username })),
            )
        }
        UserCommands::List { filter } => {
            let users = match filter.as_deref() {
                Some(prefix) if !prefix.trim().is_empty() => {
                    repositories.users.find_by_prefix(User::SEARCH_FIELD, prefix).await?
                }
                _ => repositories.users.find_all().await?,
            };

            if users.is_empty() {
                return output_empty_collection(&output_format, "users", "No users found");
            }

            let rows = users
                .iter()
                .map(|u| {
                    vec![
                        u.id().map(|id| id.to_string()).unwrap_or_default(),
                        u.username.clone(),
                        u.display_name.clone().unwrap_or_default(),
                        u.email.clone(),
                    ]
                })
                .collect();
            output_table(&output_format, "users", &["id", "username", "display_name", "email"], rows)
        }
    }
}
