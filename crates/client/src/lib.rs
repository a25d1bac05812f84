//! HTTP client for the chat analysis admin API
//!
//! Every endpoint the admin dashboard uses, typed, plus `ListSource`
//! adapters so the paginated ones can drive a list controller.

mod admin;
mod auth;
pub mod client;
pub mod error;
mod listings;
mod session;
mod sources;

pub use client::ApiClient;
pub use error::ClientError;
pub use session::Session;
pub use sources::{AnalysesSource, LogsSource, MessagesSource};

#[cfg(test)]
mod listings_tests;
