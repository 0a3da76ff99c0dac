//! Test doubles shared by unit tests across the crate.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::database::{DatabaseError, MemoryRepository, Repository};
use crate::schema::Entity;
use crate::ui::editor::view::{ConfirmDialog, Confirmation};

/// Dialog that answers every question the same way and counts how often it was asked
#[derive(Debug)]
pub struct ScriptedDialog {
    answer: Confirmation,
    asked: usize,
    last_message: Option<String>,
}

impl ScriptedDialog {
    pub fn new(answer: Confirmation) -> Self {
        Self {
            answer,
            asked: 0,
            last_message: None,
        }
    }

    pub fn asked(&self) -> usize {
        self.asked
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }
}

impl ConfirmDialog for ScriptedDialog {
    fn confirm(&mut self, _title: &str, message: &str) -> Confirmation {
        self.asked += 1;
        self.last_message = Some(message.to_string());
        self.answer
    }
}

/// Repository call as seen by `RecordingRepository`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindById(i64),
    FindAll,
    FindByPrefix(String, String),
    Save(Option<i64>),
    Delete(Option<i64>),
}

/// In-memory repository that records every gateway call
pub struct RecordingRepository<E> {
    inner: MemoryRepository<E>,
    calls: Mutex<Vec<Call>>,
    save_failure: Mutex<Option<DatabaseError>>,
}

impl<E: Entity> RecordingRepository<E> {
    pub fn new() -> Self {
        Self {
            inner: MemoryRepository::new(),
            calls: Mutex::new(Vec::new()),
            save_failure: Mutex::new(None),
        }
    }

    /// Store an entity without recording the call
    pub async fn seed(&self, entity: E) -> E {
        self.inner.save(entity).await.expect("seed entity")
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    /// Make the next `save` fail with `error`
    pub async fn fail_next_save(&self, error: DatabaseError) {
        *self.save_failure.lock().await = Some(error);
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for RecordingRepository<E> {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, DatabaseError> {
        self.record(Call::FindById(id)).await;
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<E>, DatabaseError> {
        self.record(Call::FindAll).await;
        self.inner.find_all().await
    }

    async fn find_by_prefix(&self, field: &str, text: &str) -> Result<Vec<E>, DatabaseError> {
        self.record(Call::FindByPrefix(field.to_string(), text.to_string()))
            .await;
        self.inner.find_by_prefix(field, text).await
    }

    async fn save(&self, entity: E) -> Result<E, DatabaseError> {
        if let Some(error) = self.save_failure.lock().await.take() {
            return Err(error);
        }
        self.record(Call::Save(entity.id())).await;
        self.inner.save(entity).await
    }

    async fn delete(&self, entity: &E) -> Result<(), DatabaseError> {
        self.record(Call::Delete(entity.id())).await;
        self.inner.delete(entity).await
    }
}
