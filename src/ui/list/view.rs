use crate::schema::Entity;
use crate::ui::list::container::EntityContainer;
use crate::ui::messages::Messages;

/// Table surface driven by `ListPresenter`
pub trait ListView<E: Entity>: Send {
    /// Current filter text
    fn filter(&self) -> &str;

    fn set_filter(&mut self, text: &str);

    /// Replace the displayed rows
    fn refresh(&mut self, items: EntityContainer<E>);

    fn items(&self) -> &EntityContainer<E>;

    fn select(&mut self, id: Option<i64>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub label: String,
}

/// Table model of one entity type, rendered to HTML by `ui::templates`
#[derive(Debug, Clone)]
pub struct GridView<E> {
    columns: Vec<Column>,
    filter: String,
    items: EntityContainer<E>,
    selected: Option<i64>,
}

impl<E: Entity> GridView<E> {
    /// One column per schema field; credentials are never listed
    pub fn new(messages: &Messages) -> Self {
        let columns = E::schema()
            .describe_fields()
            .iter()
            .filter(|d| !d.is_credential())
            .map(|d| Column {
                name: d.name,
                label: messages.get(&d.label_key()),
            })
            .collect();

        Self {
            columns,
            filter: String::new(),
            items: EntityContainer::default(),
            selected: None,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    /// Cell texts of `entity` in column order
    pub fn cells(&self, entity: &E) -> Vec<String> {
        let schema = E::schema();
        self.columns
            .iter()
            .map(|c| schema.get(entity, c.name).unwrap_or_default())
            .collect()
    }
}

impl<E: Entity> ListView<E> for GridView<E> {
    fn filter(&self) -> &str {
        &self.filter
    }

    fn set_filter(&mut self, text: &str) {
        self.filter = text.to_string();
    }

    fn refresh(&mut self, items: EntityContainer<E>) {
        if let Some(id) = self.selected {
            if items.get(id).is_none() {
                self.selected = None;
            }
        }
        self.items = items;
    }

    fn items(&self) -> &EntityContainer<E> {
        &self.items
    }

    fn select(&mut self, id: Option<i64>) {
        self.selected = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::User;

    #[test]
    fn omits_credential_columns() {
        let grid = GridView::<User>::new(&Messages::defaults());
        let names: Vec<_> = grid.columns().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["username", "display_name", "email"]);
        assert_eq!(grid.columns()[2].label, "Email");

        let user = User::new("alice", "alice@example.com");
        assert_eq!(grid.cells(&user), vec!["alice", "", "alice@example.com"]);
    }

    #[test]
    fn refresh_drops_stale_selection() {
        let mut grid = GridView::<User>::new(&Messages::defaults());
        let mut alice = User::new("alice", "");
        alice.assign_id(1);

        grid.refresh(EntityContainer::new(vec![alice.clone()]));
        grid.select(Some(1));
        grid.refresh(EntityContainer::new(vec![alice]));
        assert_eq!(grid.selected(), Some(1));

        grid.refresh(EntityContainer::default());
        assert_eq!(grid.selected(), None);
    }
}
