//! Core types and traits for chatdash
//!
//! Domain records, listing criteria, pagination arithmetic and the
//! `ListSource` seam shared by the client, controller and renderer crates.

mod admin;
mod analysis;
pub mod constants;
pub mod env_config;
mod error;
mod filter;
pub mod json_utils;
mod list_source;
mod pagination;
mod records;

pub use admin::*;
pub use analysis::*;
pub use constants::*;
pub use error::*;
pub use filter::*;
pub use list_source::*;
pub use pagination::*;
pub use records::*;
