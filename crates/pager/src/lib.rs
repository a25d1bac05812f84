//! Paginated, filtered list controller for chatdash
//!
//! Drives one listing endpoint page by page: keeps the filter and position,
//! discards out-of-order responses, and hands finished pages to a
//! [`PageRenderer`].

mod controller;
mod error;
mod refresh;
mod renderer;

pub use controller::{PageState, PaginatedFilteredListController};
pub use error::LoadError;
pub use refresh::AutoRefresh;
pub use renderer::PageRenderer;
