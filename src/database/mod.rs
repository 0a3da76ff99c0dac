pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryRepository;
pub use repository::{PgRepository, Repository};

use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::config::{DatabaseConfig, StorageKind};
use models::{Project, Role, User};

/// The repositories for every managed entity type, sharing one backend
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn Repository<User>>,
    pub projects: Arc<dyn Repository<Project>>,
    pub roles: Arc<dyn Repository<Role>>,
    pool: Option<PgPool>,
}

impl Repositories {
    /// Open the configured backend, creating missing tables for PostgreSQL
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.storage {
            StorageKind::Memory => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageKind::Postgres => {
                let pool = DatabaseManager::connect(config).await?;
                DatabaseManager::migrate::<User>(&pool).await?;
                DatabaseManager::migrate::<Project>(&pool).await?;
                DatabaseManager::migrate::<Role>(&pool).await?;
                Ok(Self::postgres(pool, config.enable_query_logging))
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryRepository::<User>::new()),
            projects: Arc::new(MemoryRepository::<Project>::new()),
            roles: Arc::new(MemoryRepository::<Role>::new()),
            pool: None,
        }
    }

    pub fn postgres(pool: PgPool, log_queries: bool) -> Self {
        Self {
            users: Arc::new(PgRepository::<User>::new(pool.clone()).with_query_logging(log_queries)),
            projects: Arc::new(PgRepository::<Project>::new(pool.clone()).with_query_logging(log_queries)),
            roles: Arc::new(PgRepository::<Role>::new(pool.clone()).with_query_logging(log_queries)),
            pool: Some(pool),
        }
    }

    /// Storage label and connectivity, for the health endpoint
    pub async fn health_check(&self) -> Result<&'static str, DatabaseError> {
        match &self.pool {
            Some(pool) => DatabaseManager::health_check(pool).await.map(|_| "postgres"),
            None => Ok("memory"),
        }
    }
}
