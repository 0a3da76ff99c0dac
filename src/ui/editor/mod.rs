//! Generic create/edit/delete window shared by every entity type.

pub mod presenter;
pub mod view;

pub use presenter::{EditorPresenter, EditorSession, EntityChange, UNCHANGED_SENTINEL};
pub use view::{ActionLabels, ConfirmDialog, Confirmation, EditorEvent, EditorView, FormView, Input, Prompt, Widget};
