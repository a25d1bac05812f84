//! Table rendering for chatdash
//!
//! Turns records and pages into a [`Table`] and writes it as an aligned text
//! table, an escaped HTML fragment or JSON. [`TableRenderer`] plugs a writer
//! into the list controller.

mod error;
pub mod format;
mod renderer;
mod rows;
mod table;

pub use error::RenderError;
pub use renderer::{OutputFormat, TableRenderer};
pub use rows::{TableRow, analysis_details_table, list_table, page_table};
pub use table::{Table, html_escape};
