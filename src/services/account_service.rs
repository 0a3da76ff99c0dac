use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{password_hash, verify_password};
use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::database::{DatabaseError, Repository};
use crate::schema::Entity;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid username: {0}")]
    InvalidName(String),
}

/// Login checks and user provisioning outside the editor screens
pub struct AccountService {
    users: Arc<dyn Repository<User>>,
}

impl AccountService {
    pub fn new(users: Arc<dyn Repository<User>>) -> Self {
        Self { users }
    }

    /// Look up a user by exact username and check the password
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, DatabaseError> {
        let user = self.find_exact(username).await?;
        Ok(user.filter(|u| verify_password(&u.username, password, &u.password_hash)))
    }

    /// Create a user with a hashed password
    pub async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User, AccountError> {
        Self::validate_username(username)?;

        if self.find_exact(username).await?.is_some() {
            return Err(AccountError::AlreadyExists(username.to_string()));
        }

        let mut user = User::new(username, email);
        user.password_hash = password_hash(username, password);
        let user = self.users.save(user).await?;

        info!("Created user {} (id {:?})", username, user.id());
        Ok(user)
    }

    /// Create the configured administrator when no users exist yet. Returns true when one was created.
    pub async fn ensure_bootstrap_admin(&self, security: &SecurityConfig) -> Result<bool, AccountError> {
        let (Some(username), Some(password)) = (&security.admin_username, &security.admin_password) else {
            return Ok(false);
        };

        if !self.users.find_all().await?.is_empty() {
            return Ok(false);
        }

        warn!("No users found; creating bootstrap administrator '{}'", username);
        self.create_user(username, "", password).await?;
        Ok(true)
    }

    async fn find_exact(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let candidates = self.users.find_by_prefix(User::SEARCH_FIELD, username).await?;
        Ok(candidates.into_iter().find(|u| u.username == username))
    }

    fn validate_username(name: &str) -> Result<(), AccountError> {
        if name.trim().is_empty() {
            return Err(AccountError::InvalidName("Username must not be empty".to_string()));
        }

        if name.chars().any(char::is_whitespace) {
            return Err(AccountError::InvalidName("Username cannot contain whitespace".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryRepository;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryRepository::<User>::new()))
    }

    fn security(username: Option<&str>, password: Option<&str>) -> SecurityConfig {
        SecurityConfig {
            admin_username: username.map(str::to_string),
            admin_password: password.map(str::to_string),
            secure_cookies: false,
        }
    }

    #[tokio::test]
    async fn authenticates_with_salted_hash() {
        let service = service();
        service.create_user("alice", "alice@example.com", "secret").await.unwrap();

        assert!(service.authenticate("alice", "secret").await.unwrap().is_some());
        assert!(service.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(service.authenticate("ALICE", "secret").await.unwrap().is_none());
        assert!(service.authenticate("bob", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_and_blank_usernames() {
        let service = service();
        service.create_user("alice", "", "pw").await.unwrap();

        assert!(matches!(
            service.create_user("alice", "", "pw").await,
            Err(AccountError::AlreadyExists(_))
        ));
        assert!(matches!(
            service.create_user("  ", "", "pw").await,
            Err(AccountError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn bootstrap_admin_only_on_empty_store() {
        let service = service();
        let config = security(Some("admin"), Some("admin"));

        assert!(service.ensure_bootstrap_admin(&config).await.unwrap());
        assert!(!service.ensure_bootstrap_admin(&config).await.unwrap());
        assert!(service.authenticate("admin", "admin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn bootstrap_admin_requires_credentials() {
        let service = service();
        assert!(!service.ensure_bootstrap_admin(&security(Some("admin"), None)).await.unwrap());
        assert!(service.authenticate("admin", "").await.unwrap().is_none());
    }
}
