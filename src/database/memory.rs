use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::repository::{ensure_known_field, Repository};
use crate::schema::Entity;

/// Process-local repository used when no database is configured
pub struct MemoryRepository<E> {
    state: RwLock<MemoryState<E>>,
}

struct MemoryState<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Repository pre-populated with `entities`, ids assigned in order
    pub async fn seeded(entities: impl IntoIterator<Item = E>) -> Result<Self, DatabaseError> {
        let repository = Self::new();
        for entity in entities {
            repository.save(entity).await?;
        }
        Ok(repository)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, DatabaseError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<E>, DatabaseError> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn find_by_prefix(&self, field: &str, text: &str) -> Result<Vec<E>, DatabaseError> {
        ensure_known_field::<E>(field)?;
        let prefix = text.to_lowercase();
        let schema = E::schema();
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|e| {
                schema
                    .get(e, field)
                    .map(|v| v.to_lowercase().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn save(&self, mut entity: E) -> Result<E, DatabaseError> {
        let mut state = self.state.write().await;
        match entity.id() {
            None => {
                let id = state.next_id;
                state.next_id += 1;
                entity.assign_id(id);
                state.rows.insert(id, entity.clone());
            }
            Some(id) => match state.rows.get_mut(&id) {
                Some(row) => *row = entity.clone(),
                None => return Err(DatabaseError::NotFound(format!("{} {}", E::TABLE, id))),
            },
        }
        Ok(entity)
    }

    async fn delete(&self, entity: &E) -> Result<(), DatabaseError> {
        if let Some(id) = entity.id() {
            self.state.write().await.rows.remove(&id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Project, User};

    #[tokio::test]
    async fn assigns_ids_on_insert() {
        let repo = MemoryRepository::<Project>::new();
        let saved = repo.save(Project::new("Alpha")).await.unwrap();
        assert_eq!(saved.id(), Some(1));
        let saved = repo.save(Project::new("Beta")).await.unwrap();
        assert_eq!(saved.id(), Some(2));
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn updates_existing_rows() {
        let repo = MemoryRepository::seeded(vec![Project::new("Alpha")]).await.unwrap();
        let mut alpha = repo.find_by_id(1).await.unwrap().unwrap();
        alpha.name = "Alpha Prime".to_string();
        repo.save(alpha).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Alpha Prime");
    }

    #[tokio::test]
    async fn prefix_match_is_case_insensitive() {
        let repo = MemoryRepository::seeded(vec![
            Project::new("Alpha"),
            Project::new("beta"),
            Project::new("ALPINE"),
        ])
        .await
        .unwrap();

        let names: Vec<_> = repo
            .find_by_prefix("name", "al")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "ALPINE"]);

        assert!(repo.find_by_prefix("name", "gamma").await.unwrap().is_empty());
        assert!(repo.find_by_prefix("id", "1").await.is_err());
    }

    #[tokio::test]
    async fn delete_removes_row_and_ignores_drafts() {
        let repo = MemoryRepository::seeded(vec![User::new("alice", "a@example.com")])
            .await
            .unwrap();
        repo.delete(&User::new("draft", "")).await.unwrap();
        assert_eq!(repo.len().await, 1);

        let alice = repo.find_by_id(1).await.unwrap().unwrap();
        repo.delete(&alice).await.unwrap();
        assert_eq!(repo.find_by_id(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn updating_missing_row_is_not_found() {
        let repo = MemoryRepository::<Project>::new();
        let mut ghost = Project::new("Ghost");
        ghost.assign_id(42);
        assert!(matches!(repo.save(ghost).await, Err(DatabaseError::NotFound(_))));
    }
}
