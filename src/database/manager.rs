use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::schema::{Entity, FieldKind};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Stored value rejected: {0}")]
    Decode(#[from] crate::schema::FieldError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection pool construction and schema-driven migrations
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against the configured database
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Created database pool for: {}{}",
            parsed.host_str().unwrap_or("localhost"),
            parsed.path()
        );
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Create the table backing an entity type when it does not exist yet
    pub async fn migrate<E: Entity>(pool: &PgPool) -> Result<(), DatabaseError> {
        let ddl = Self::create_table_ddl::<E>();
        sqlx::query(&ddl).execute(pool).await?;
        info!("Ensured table {}", E::TABLE);
        Ok(())
    }

    /// Every attribute is stored as TEXT; the search field, credentials and choices are NOT NULL.
    pub fn create_table_ddl<E: Entity>() -> String {
        let columns: Vec<String> = E::schema()
            .describe_fields()
            .iter()
            .map(|d| {
                let constraint = match d.kind {
                    FieldKind::Text if d.name == E::SEARCH_FIELD => " NOT NULL",
                    FieldKind::Credential { .. } | FieldKind::Choice { .. } => " NOT NULL",
                    FieldKind::Text => "",
                };
                format!("{} TEXT{}", Self::quote_identifier(d.name), constraint)
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\"id\" BIGSERIAL PRIMARY KEY, {})",
            Self::quote_identifier(E::TABLE),
            columns.join(", ")
        )
    }

    /// Quote SQL identifier to prevent injection
    pub fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
