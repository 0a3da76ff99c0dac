//! Static per-type schemas: ordered field descriptors plus typed accessors.
//!
//! Each entity type registers its schema once (see `database::models`), and the
//! generic editor drives every type through the same descriptor loop.

pub mod field;

pub use field::{Choice, FieldDescriptor, FieldError, FieldKind};

use std::fmt;

type Getter<E> = Box<dyn Fn(&E) -> Option<String> + Send + Sync>;
type Setter<E> = Box<dyn Fn(&mut E, &str) -> Result<(), FieldError> + Send + Sync>;

/// A persisted record type managed by the console
pub trait Entity: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Table name, also used as the route segment
    const TABLE: &'static str;

    /// Attribute matched by list filters
    const SEARCH_FIELD: &'static str;

    fn id(&self) -> Option<i64>;

    /// Set the identity of an unsaved entity. Has no effect once an id is assigned.
    fn assign_id(&mut self, id: i64);

    fn schema() -> &'static EntitySchema<Self>;

    /// Human readable name used in confirmations
    fn display_name(&self) -> String;
}

/// Typed get/set pair for one field
pub struct FieldAccessor<E> {
    pub descriptor: FieldDescriptor,
    get: Getter<E>,
    set: Setter<E>,
}

impl<E> FieldAccessor<E> {
    pub fn get(&self, entity: &E) -> Option<String> {
        (self.get)(entity)
    }

    pub fn set(&self, entity: &mut E, value: &str) -> Result<(), FieldError> {
        (self.set)(entity, value)
    }
}

/// Ordered field table for one entity type
pub struct EntitySchema<E> {
    fields: Vec<FieldAccessor<E>>,
}

impl<E: 'static> EntitySchema<E> {
    pub fn builder() -> SchemaBuilder<E> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Ordered descriptors of the editable fields
    pub fn describe_fields(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(|f| f.descriptor).collect()
    }

    pub fn fields(&self) -> &[FieldAccessor<E>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldAccessor<E>> {
        self.fields.iter().find(|f| f.descriptor.name == name)
    }

    /// Current value of a field; `None` for unknown names and null values
    pub fn get(&self, entity: &E, name: &str) -> Option<String> {
        self.field(name).and_then(|f| f.get(entity))
    }

    pub fn set(&self, entity: &mut E, name: &str, value: &str) -> Result<(), FieldError> {
        match self.field(name) {
            Some(field) => field.set(entity, value),
            None => Err(FieldError::UnknownField(name.to_string())),
        }
    }
}

pub struct SchemaBuilder<E> {
    fields: Vec<FieldAccessor<E>>,
}

impl<E: 'static> SchemaBuilder<E> {
    /// Required text attribute
    pub fn text<G, S>(self, name: &'static str, get: G, set: S) -> Self
    where
        G: Fn(&E) -> String + Send + Sync + 'static,
        S: Fn(&mut E, String) + Send + Sync + 'static,
    {
        self.push(
            FieldDescriptor::text(name),
            Box::new(move |e: &E| Some(get(e))),
            Box::new(move |e: &mut E, v: &str| {
                set(e, v.to_string());
                Ok(())
            }),
        )
    }

    /// Nullable text attribute; an empty value is stored as null
    pub fn optional_text<G, S>(self, name: &'static str, get: G, set: S) -> Self
    where
        G: Fn(&E) -> Option<String> + Send + Sync + 'static,
        S: Fn(&mut E, Option<String>) + Send + Sync + 'static,
    {
        self.push(
            FieldDescriptor::text(name),
            Box::new(get),
            Box::new(move |e: &mut E, v: &str| {
                set(e, (!v.is_empty()).then(|| v.to_string()));
                Ok(())
            }),
        )
    }

    pub fn credential<G, S>(self, name: &'static str, salt_field: &'static str, get: G, set: S) -> Self
    where
        G: Fn(&E) -> String + Send + Sync + 'static,
        S: Fn(&mut E, String) + Send + Sync + 'static,
    {
        self.push(
            FieldDescriptor::credential(name, salt_field),
            Box::new(move |e: &E| Some(get(e))),
            Box::new(move |e: &mut E, v: &str| {
                set(e, v.to_string());
                Ok(())
            }),
        )
    }

    pub fn choice<C, G, S>(self, name: &'static str, get: G, set: S) -> Self
    where
        C: Choice,
        G: Fn(&E) -> C + Send + Sync + 'static,
        S: Fn(&mut E, C) + Send + Sync + 'static,
    {
        self.push(
            FieldDescriptor::choice(name, C::CHOICES),
            Box::new(move |e: &E| Some(get(e).as_str().to_string())),
            Box::new(move |e: &mut E, v: &str| match C::from_choice(v) {
                Some(choice) => {
                    set(e, choice);
                    Ok(())
                }
                None => Err(FieldError::InvalidChoice {
                    field: name.to_string(),
                    value: v.to_string(),
                }),
            }),
        )
    }

    fn push(mut self, descriptor: FieldDescriptor, get: Getter<E>, set: Setter<E>) -> Self {
        debug_assert!(descriptor.name != "id", "identity is not an editable field");
        debug_assert!(
            self.fields.iter().all(|f| f.descriptor.name != descriptor.name),
            "duplicate field {}",
            descriptor.name
        );
        self.fields.push(FieldAccessor { descriptor, get, set });
        self
    }

    pub fn build(self) -> EntitySchema<E> {
        EntitySchema { fields: self.fields }
    }
}
