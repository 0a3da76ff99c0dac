use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::debug;

use crate::database::Repository;
use crate::error::AdminError;
use crate::schema::Entity;
use crate::ui::editor::{ConfirmDialog, EditorEvent, EditorPresenter, EditorView, EntityChange};
use crate::ui::list::container::EntityContainer;
use crate::ui::list::view::ListView;
use crate::ui::messages::Messages;

/// Screen for one entity type: a filterable list plus its editor
pub struct ListPresenter<E: Entity, V, L> {
    repository: Arc<dyn Repository<E>>,
    editor: EditorPresenter<E, V>,
    view: L,
    changes: UnboundedReceiver<EntityChange>,
}

impl<E, V, L> ListPresenter<E, V, L>
where
    E: Entity,
    V: EditorView<E>,
    L: ListView<E>,
{
    pub fn new(repository: Arc<dyn Repository<E>>, editor_view: V, view: L, messages: &Messages) -> Self {
        let mut editor = EditorPresenter::new(repository.clone(), editor_view, messages);
        let (sender, changes) = unbounded_channel();
        editor.set_entity_change_handler(sender);

        Self {
            repository,
            editor,
            view,
            changes,
        }
    }

    /// All entities for a blank filter, else a case-insensitive prefix match on the search field
    pub async fn list_entities(&self, filter: &str) -> Result<EntityContainer<E>, AdminError> {
        let items = if filter.trim().is_empty() {
            self.repository.find_all().await?
        } else {
            self.repository.find_by_prefix(E::SEARCH_FIELD, filter).await?
        };
        Ok(EntityContainer::new(items))
    }

    /// Reload the list view using its current filter
    pub async fn refresh(&mut self) -> Result<(), AdminError> {
        let filter = self.view.filter().to_string();
        let items = self.list_entities(&filter).await?;
        debug!(table = E::TABLE, filter = %filter, rows = items.len(), "Refreshed list");
        self.view.refresh(items);
        Ok(())
    }

    pub async fn apply_filter(&mut self, text: &str) -> Result<(), AdminError> {
        self.view.set_filter(text);
        self.refresh().await
    }

    /// Open the editor on `item`, or close it when nothing is selected
    pub async fn edit_item_clicked(&mut self, item: Option<E>) -> Result<(), AdminError> {
        match item {
            Some(entity) => {
                self.view.select(entity.id());
                self.editor.edit(entity).await
            }
            None => {
                self.view.select(None);
                self.editor.hide();
                Ok(())
            }
        }
    }

    /// Edit the row with `id`. Rows not on screen are still reloaded by the editor.
    pub async fn select(&mut self, id: i64) -> Result<(), AdminError> {
        let entity = match self.view.items().get(id) {
            Some(entity) => entity.clone(),
            None => {
                let mut stub = E::default();
                stub.assign_id(id);
                stub
            }
        };
        self.edit_item_clicked(Some(entity)).await
    }

    pub async fn add_new_clicked(&mut self) -> Result<(), AdminError> {
        self.view.select(None);
        self.editor.edit(E::default()).await
    }

    /// Close the editor and reload the list after a save or delete
    pub async fn on_entity_changed(&mut self) -> Result<(), AdminError> {
        self.editor.hide();
        self.view.select(None);
        self.refresh().await
    }

    /// Forward a view event to the editor, then apply any resulting change
    pub async fn handle_editor_event(
        &mut self,
        event: EditorEvent,
        dialog: &mut dyn ConfirmDialog,
    ) -> Result<(), AdminError> {
        let result = self.editor.handle(event, dialog).await;

        let mut changed = false;
        while let Ok(change) = self.changes.try_recv() {
            debug!(table = E::TABLE, ?change, "Entity changed");
            changed = true;
        }
        if changed {
            self.on_entity_changed().await?;
        }

        result
    }

    pub fn editor(&self) -> &EditorPresenter<E, V> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorPresenter<E, V> {
        &mut self.editor
    }

    pub fn view(&self) -> &L {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut L {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PrivilegeLevel;
    use crate::database::models::{Project, Role, User};
    use crate::testing::{Call, RecordingRepository, ScriptedDialog};
    use crate::ui::editor::{Confirmation, FormView};
    use crate::ui::list::view::GridView;

    type Screen<E> = ListPresenter<E, FormView<E>, GridView<E>>;

    fn screen<E: Entity>(repo: &Arc<RecordingRepository<E>>) -> Screen<E> {
        let messages = Messages::defaults();
        ListPresenter::new(repo.clone(), FormView::new(), GridView::new(&messages), &messages)
    }

    async fn projects(names: &[&str]) -> Arc<RecordingRepository<Project>> {
        let repo = Arc::new(RecordingRepository::new());
        for name in names {
            repo.seed(Project::new(*name)).await;
        }
        repo
    }

    fn names(container: &EntityContainer<Project>) -> Vec<String> {
        container.iter().map(|p| p.name.clone()).collect()
    }

    #[tokio::test]
    async fn filter_matches_prefix_case_insensitively() {
        let repo = projects(&["Alpha", "beta", "ALPINE", "Gamma al"]).await;
        let screen = screen(&repo);

        assert_eq!(names(&screen.list_entities("al").await.unwrap()), vec!["Alpha", "ALPINE"]);
        assert_eq!(names(&screen.list_entities("BE").await.unwrap()), vec!["beta"]);
        assert!(screen.list_entities("zeta").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_filter_lists_everything_in_repository_order() {
        let repo = projects(&["Alpha"]).await;
        let screen = screen(&repo);

        let all = screen.list_entities("").await.unwrap();
        assert_eq!(names(&all), vec!["Alpha"]);
        assert_eq!(names(&screen.list_entities("   ").await.unwrap()), vec!["Alpha"]);
        assert_eq!(names(&screen.list_entities("al").await.unwrap()), vec!["Alpha"]);

        assert_eq!(
            repo.calls().await,
            vec![
                Call::FindAll,
                Call::FindAll,
                Call::FindByPrefix("name".to_string(), "al".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn apply_filter_refreshes_view() {
        let repo = projects(&["Alpha", "Beta"]).await;
        let mut screen = screen(&repo);

        screen.refresh().await.unwrap();
        assert_eq!(screen.view().items().len(), 2);

        screen.apply_filter("b").await.unwrap();
        assert_eq!(screen.view().filter(), "b");
        assert_eq!(names(screen.view().items()), vec!["Beta"]);
    }

    #[tokio::test]
    async fn filter_prefix_keeps_surrounding_whitespace() {
        let repo = projects(&["Alpha", " alto"]).await;
        let mut screen = screen(&repo);

        assert_eq!(names(&screen.list_entities(" al").await.unwrap()), vec![" alto"]);
        assert_eq!(names(&screen.list_entities("al").await.unwrap()), vec!["Alpha"]);

        screen.apply_filter(" AL").await.unwrap();
        assert_eq!(screen.view().filter(), " AL");
        assert_eq!(names(screen.view().items()), vec![" alto"]);
    }

    #[tokio::test]
    async fn edit_item_clicked_none_closes_editor() {
        let repo = projects(&["Alpha"]).await;
        let mut screen = screen(&repo);

        screen.select(1).await.unwrap();
        assert!(screen.editor().is_open());
        assert_eq!(screen.view().selected(), Some(1));

        screen.edit_item_clicked(None).await.unwrap();
        assert!(!screen.editor().is_open());
        assert_eq!(screen.view().selected(), None);
    }

    #[tokio::test]
    async fn add_new_then_save_refreshes_list() {
        let repo = Arc::new(RecordingRepository::<Role>::new());
        let mut screen = screen(&repo);
        screen.refresh().await.unwrap();

        screen.add_new_clicked().await.unwrap();
        assert!(!screen.editor().view().is_delete_visible());

        let view = screen.editor_mut().view_mut();
        view.set_field_value("name", "operators");
        view.set_field_value("privilege_level", "admin");
        let mut dialog = ScriptedDialog::new(Confirmation::Dismissed);
        screen.handle_editor_event(EditorEvent::Save, &mut dialog).await.unwrap();

        assert!(!screen.editor().is_open());
        let rows: Vec<_> = screen.view().items().iter().cloned().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id(), Some(1));
        assert_eq!(rows[0].privilege_level, PrivilegeLevel::Admin);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_row() {
        let repo = Arc::new(RecordingRepository::<User>::new());
        repo.seed(User::new("alice", "")).await;
        repo.seed(User::new("bob", "")).await;
        let mut screen = screen(&repo);
        screen.refresh().await.unwrap();
        screen.select(2).await.unwrap();

        let mut no = ScriptedDialog::new(Confirmation::Dismissed);
        screen.handle_editor_event(EditorEvent::DeleteClicked, &mut no).await.unwrap();
        assert_eq!(screen.view().items().len(), 2);
        assert!(screen.editor().is_open());

        let mut yes = ScriptedDialog::new(Confirmation::Confirmed);
        screen.handle_editor_event(EditorEvent::DeleteClicked, &mut yes).await.unwrap();
        assert_eq!(yes.last_message(), Some("Are you sure you want to delete bob?"));
        assert_eq!(screen.view().items().ids(), vec![Some(1)]);
        assert!(!screen.editor().is_open());
        assert_eq!(screen.view().selected(), None);
    }

    #[tokio::test]
    async fn select_unlisted_row_reloads_from_repository() {
        let repo = projects(&["Alpha"]).await;
        let mut screen = screen(&repo);

        screen.select(1).await.unwrap();
        assert_eq!(screen.editor().view().field_value("name").as_deref(), Some("Alpha"));

        assert!(matches!(screen.select(9).await, Err(AdminError::NotFound(_))));
        assert!(!screen.editor().is_open());
    }
}
