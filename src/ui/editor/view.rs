use std::marker::PhantomData;
use tracing::debug;

use crate::schema::{Entity, FieldDescriptor, FieldKind};
use crate::ui::messages::Messages;

/// Intents emitted by an editor view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Save,
    DeleteClicked,
    DeleteConfirmed,
    Cancel,
}

/// Outcome of asking the user a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Dismissed,
    /// The question is on screen and has not been answered yet
    Pending,
}

/// Context able to put a blocking yes/no question to the user
pub trait ConfirmDialog: Send {
    fn confirm(&mut self, title: &str, message: &str) -> Confirmation;
}

/// Editor surface driven by `EditorPresenter`
pub trait EditorView<E: Entity>: Send {
    /// Build one labelled input per descriptor
    fn render(&mut self, descriptors: &[FieldDescriptor], messages: &Messages);

    /// Write a value into the named input; unknown names are ignored
    fn set_field_value(&mut self, name: &str, value: &str);

    /// Current value of the named input; `None` for unknown names
    fn field_value(&self, name: &str) -> Option<String>;

    fn set_delete_visible(&mut self, visible: bool);

    fn show(&mut self);

    fn hide(&mut self);

    /// Ask for delete confirmation. Returns true only when the user confirmed.
    fn confirm_delete(&mut self, entity: &E, dialog: &mut dyn ConfirmDialog) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text,
    Masked,
    Select { choices: &'static [&'static str] },
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub name: &'static str,
    pub label: String,
    pub input: Input,
    pub value: String,
}

impl Widget {
    fn from_descriptor(descriptor: &FieldDescriptor, messages: &Messages) -> Self {
        let input = match descriptor.kind {
            FieldKind::Credential { .. } => Input::Masked,
            FieldKind::Choice { choices } => Input::Select { choices },
            FieldKind::Text => Input::Text,
        };
        Self {
            name: descriptor.name,
            label: messages.get(&descriptor.label_key()),
            input,
            value: String::new(),
        }
    }

    /// Selectors only accept their listed choices
    fn accepts(&self, value: &str) -> bool {
        match &self.input {
            Input::Select { choices } => choices.contains(&value),
            Input::Text | Input::Masked => true,
        }
    }
}

/// Question currently shown in the delete dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ActionLabels {
    pub save: String,
    pub cancel: String,
    pub delete: String,
    pub confirm_ok: String,
    pub confirm_cancel: String,
}

/// Form model of the editor window, rendered to HTML by `ui::templates`
#[derive(Debug, Clone)]
pub struct FormView<E> {
    widgets: Vec<Widget>,
    actions: ActionLabels,
    confirm_title: String,
    confirm_message: String,
    delete_visible: bool,
    visible: bool,
    focused: Option<EditorEvent>,
    prompt: Option<Prompt>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> FormView<E> {
    pub fn new() -> Self {
        Self {
            widgets: Vec::new(),
            actions: ActionLabels::default(),
            confirm_title: String::new(),
            confirm_message: String::new(),
            delete_visible: false,
            visible: false,
            focused: None,
            prompt: None,
            _entity: PhantomData,
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn actions(&self) -> &ActionLabels {
        &self.actions
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_delete_visible(&self) -> bool {
        self.delete_visible
    }

    /// Action holding input focus while the window is open
    pub fn focused(&self) -> Option<EditorEvent> {
        self.focused
    }

    /// Delete question awaiting an answer
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    fn widget_mut(&mut self, name: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.name == name)
    }
}

impl<E> Default for FormView<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EditorView<E> for FormView<E> {
    fn render(&mut self, descriptors: &[FieldDescriptor], messages: &Messages) {
        self.widgets = descriptors
            .iter()
            .map(|d| Widget::from_descriptor(d, messages))
            .collect();
        self.actions = ActionLabels {
            save: messages.get("saveButtonLabel"),
            cancel: messages.get("cancelButtonLabel"),
            delete: messages.get("deleteButtonLabel"),
            confirm_ok: messages.get("confirmOkLabel"),
            confirm_cancel: messages.get("confirmCancelLabel"),
        };
        self.confirm_title = messages.get("deleteConfirmTitle");
        self.confirm_message = messages.get("deleteConfirmMessage");
    }

    fn set_field_value(&mut self, name: &str, value: &str) {
        match self.widget_mut(name) {
            Some(widget) if widget.accepts(value) => widget.value = value.to_string(),
            Some(widget) => debug!("Ignoring '{}' for selector {}", value, widget.name),
            None => debug!("Ignoring value for unknown field {}", name),
        }
    }

    fn field_value(&self, name: &str) -> Option<String> {
        self.widgets
            .iter()
            .find(|w| w.name == name)
            .map(|w| w.value.clone())
    }

    fn set_delete_visible(&mut self, visible: bool) {
        self.delete_visible = visible;
    }

    fn show(&mut self) {
        self.visible = true;
        self.prompt = None;
        self.focused = Some(EditorEvent::Save);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.prompt = None;
        self.focused = None;
    }

    fn confirm_delete(&mut self, entity: &E, dialog: &mut dyn ConfirmDialog) -> bool {
        let message = self.confirm_message.replace("{name}", &entity.display_name());
        match dialog.confirm(&self.confirm_title, &message) {
            Confirmation::Confirmed => {
                self.prompt = None;
                true
            }
            Confirmation::Dismissed => {
                self.prompt = None;
                false
            }
            Confirmation::Pending => {
                self.prompt = Some(Prompt {
                    title: self.confirm_title.clone(),
                    message,
                });
                false
            }
        }
    }
}
