use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::auth::password_hash;
use crate::database::Repository;
use crate::error::AdminError;
use crate::schema::Entity;
use crate::ui::editor::view::{ConfirmDialog, EditorEvent, EditorView};
use crate::ui::messages::Messages;

/// Display value of credential fields meaning "leave unchanged"
pub const UNCHANGED_SENTINEL: &str = " | | | | | ";

/// Notification sent after an entity was persisted or deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityChange {
    Saved(i64),
    Deleted(Option<i64>),
}

/// State of an open editor
#[derive(Debug, Clone)]
pub struct EditorSession<E> {
    pub entity: E,
    pub persisted: bool,
}

/// Generic editor for any `Entity`, driving an `EditorView` from the entity schema
pub struct EditorPresenter<E: Entity, V> {
    repository: Arc<dyn Repository<E>>,
    view: V,
    session: Option<EditorSession<E>>,
    change_handler: Option<UnboundedSender<EntityChange>>,
}

impl<E: Entity, V: EditorView<E>> EditorPresenter<E, V> {
    /// Build the presenter and render one widget per schema field
    pub fn new(repository: Arc<dyn Repository<E>>, mut view: V, messages: &Messages) -> Self {
        view.render(&E::schema().describe_fields(), messages);
        Self {
            repository,
            view,
            session: None,
            change_handler: None,
        }
    }

    pub fn set_entity_change_handler(&mut self, handler: UnboundedSender<EntityChange>) {
        self.change_handler = Some(handler);
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn session(&self) -> Option<&EditorSession<E>> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open the editor on `entity`. Persisted entities are reloaded from the repository first.
    pub async fn edit(&mut self, entity: E) -> Result<(), AdminError> {
        let persisted = entity.id().is_some();

        let entity = match entity.id() {
            Some(id) => match self.repository.find_by_id(id).await? {
                Some(stored) => stored,
                None => {
                    self.hide();
                    return Err(AdminError::not_found(format!("{} {}", E::TABLE, id)));
                }
            },
            None => entity,
        };

        self.view.set_delete_visible(persisted);

        let schema = E::schema();
        for field in schema.fields() {
            let value = if field.descriptor.is_credential() {
                UNCHANGED_SENTINEL.to_string()
            } else {
                field.get(&entity).unwrap_or_default()
            };
            self.view.set_field_value(field.descriptor.name, &value);
        }

        debug!(table = E::TABLE, id = ?entity.id(), "Opening editor");
        self.session = Some(EditorSession { entity, persisted });
        self.view.show();
        Ok(())
    }

    /// Commit the view's values into the entity and persist it
    pub async fn save(&mut self) -> Result<Option<E>, AdminError> {
        let Some(session) = self.session.as_ref() else {
            debug!(table = E::TABLE, "Save ignored; editor is closed");
            return Ok(None);
        };

        let schema = E::schema();
        let mut entity = session.entity.clone();

        for field in schema.fields().iter().filter(|f| !f.descriptor.is_credential()) {
            let value = self.view.field_value(field.descriptor.name).unwrap_or_default();
            field.set(&mut entity, &value)?;
        }

        // Credentials last, so salts see the committed values
        for field in schema.fields() {
            let Some(salt_field) = field.descriptor.salt_field() else {
                continue;
            };
            let raw = self.view.field_value(field.descriptor.name).unwrap_or_default();
            if raw == UNCHANGED_SENTINEL {
                continue;
            }
            match schema.field(salt_field) {
                Some(salt) => {
                    let salt_value = salt.get(&entity).unwrap_or_default();
                    field.set(&mut entity, &password_hash(&salt_value, &raw))?;
                }
                None => warn!(
                    "Cannot find field {} to hash with password field {} of {}",
                    salt_field,
                    field.descriptor.name,
                    E::TABLE
                ),
            }
        }

        let saved = self.repository.save(entity).await?;
        info!(table = E::TABLE, id = ?saved.id(), "Saved entity");

        if let Some(id) = saved.id() {
            self.notify(EntityChange::Saved(id));
        }
        self.hide();
        Ok(Some(saved))
    }

    /// Ask the user to confirm deletion of the open entity
    pub async fn delete_clicked(&mut self, dialog: &mut dyn ConfirmDialog) -> Result<(), AdminError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        if !session.persisted {
            debug!(table = E::TABLE, "Delete ignored for unsaved draft");
            return Ok(());
        }

        if self.view.confirm_delete(&session.entity, dialog) {
            self.delete_confirmed().await?;
        }
        Ok(())
    }

    pub async fn delete_confirmed(&mut self) -> Result<(), AdminError> {
        let Some(session) = self.session.as_ref().filter(|s| s.persisted) else {
            return Ok(());
        };

        self.repository.delete(&session.entity).await?;
        info!(table = E::TABLE, id = ?session.entity.id(), "Deleted entity");

        self.notify(EntityChange::Deleted(session.entity.id()));
        self.hide();
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.hide();
    }

    pub fn hide(&mut self) {
        self.session = None;
        self.view.hide();
    }

    /// Dispatch an event coming from the view
    pub async fn handle(&mut self, event: EditorEvent, dialog: &mut dyn ConfirmDialog) -> Result<(), AdminError> {
        match event {
            EditorEvent::Save => self.save().await.map(|_| ()),
            EditorEvent::DeleteClicked => self.delete_clicked(dialog).await,
            EditorEvent::DeleteConfirmed => self.delete_confirmed().await,
            EditorEvent::Cancel => {
                self.cancel();
                Ok(())
            }
        }
    }

    fn notify(&self, change: EntityChange) {
        if let Some(handler) = &self.change_handler {
            if handler.send(change).is_err() {
                debug!(table = E::TABLE, "Change listener dropped");
            }
        }
    }
}
