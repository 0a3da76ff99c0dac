use crate::schema::Entity;

/// Ordered, identity-keyed list of entities as returned by a repository
#[derive(Debug, Clone)]
pub struct EntityContainer<E> {
    items: Vec<E>,
}

impl<E: Entity> EntityContainer<E> {
    pub fn new(items: Vec<E>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.items.iter()
    }

    pub fn get(&self, id: i64) -> Option<&E> {
        self.items.iter().find(|e| e.id() == Some(id))
    }

    pub fn id_by_index(&self, index: usize) -> Option<i64> {
        self.items.get(index).and_then(Entity::id)
    }

    pub fn ids(&self) -> Vec<Option<i64>> {
        self.items.iter().map(Entity::id).collect()
    }
}

impl<E> Default for EntityContainer<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E: Entity> FromIterator<E> for EntityContainer<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
