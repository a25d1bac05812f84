//! Listing endpoint abstraction
//!
//! Decouples the paginated list controller from HTTP so it can be driven by
//! the API client in production and by in-memory fakes in tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::filter::Filter;
use crate::pagination::{Listing, PageQuery};

/// A remote collection that can be read one filtered window at a time.
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Row type; opaque to the controller.
    type Item: Send + 'static;
    /// Failure type surfaced to the controller's caller.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the rows matching `filter` inside `query`'s window, plus the total match count.
    async fn fetch(
        &self,
        filter: &Filter,
        query: PageQuery,
    ) -> Result<Listing<Self::Item>, Self::Error>;
}

#[async_trait]
impl<S: ListSource + ?Sized> ListSource for Arc<S> {
    type Item = S::Item;
    type Error = S::Error;

    async fn fetch(
        &self,
        filter: &Filter,
        query: PageQuery,
    ) -> Result<Listing<Self::Item>, Self::Error> {
        (**self).fetch(filter, query).await
    }
}
