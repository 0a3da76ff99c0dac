//! Presenters, form models and HTML rendering of the console screens.

pub mod editor;
pub mod list;
pub mod messages;
pub mod session;
pub mod templates;

pub use messages::{messages, Messages};
pub use session::{Console, Managed, SessionStore, UiSession, SESSION_COOKIE};
