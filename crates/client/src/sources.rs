//! `ListSource` adapters over the paginated endpoints.

use async_trait::async_trait;
use chatdash_core::{AnalysisSummary, Filter, ListSource, Listing, LogEntry, Message, PageQuery};

use crate::client::ApiClient;
use crate::error::ClientError;

/// Application logs, filterable by `date`.
#[derive(Debug, Clone)]
pub struct LogsSource {
    client: ApiClient,
}

impl LogsSource {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for LogsSource {
    type Item = LogEntry;
    type Error = ClientError;

    async fn fetch(&self, filter: &Filter, query: PageQuery) -> Result<Listing<LogEntry>, ClientError> {
        self.client.list_logs(filter, query).await
    }
}

/// Analysis history.
#[derive(Debug, Clone)]
pub struct AnalysesSource {
    client: ApiClient,
}

impl AnalysesSource {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for AnalysesSource {
    type Item = AnalysisSummary;
    type Error = ClientError;

    async fn fetch(
        &self,
        filter: &Filter,
        query: PageQuery,
    ) -> Result<Listing<AnalysisSummary>, ClientError> {
        self.client.list_analyses(filter, query).await
    }
}

/// Collected chat messages, filterable by date range, user and chat.
#[derive(Debug, Clone)]
pub struct MessagesSource {
    client: ApiClient,
}

impl MessagesSource {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for MessagesSource {
    type Item = Message;
    type Error = ClientError;

    async fn fetch(&self, filter: &Filter, query: PageQuery) -> Result<Listing<Message>, ClientError> {
        self.client.list_messages(filter, query).await
    }
}
