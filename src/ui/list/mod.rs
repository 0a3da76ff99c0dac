pub mod container;
pub mod presenter;
pub mod view;

pub use container::EntityContainer;
pub use presenter::ListPresenter;
pub use view::{Column, GridView, ListView};
