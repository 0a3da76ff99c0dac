pub mod project;
pub mod role;
pub mod user;

pub use project::{Project, ProjectStatus};
pub use role::Role;
pub use user::User;
