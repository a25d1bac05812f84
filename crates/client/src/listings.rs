//! Paginated listings (logs, analyses, messages) and the analysis workflow.

use chatdash_core::{
    AnalysisDetails, AnalysisSummary, CreateAnalysisRequest, CreatedAnalysis, DownloadLink,
    Filter, Listing, LogEntry, Message, PageQuery, PagingStyle,
};
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ClientError;

#[derive(Deserialize)]
struct LogsResponse {
    #[serde(default)]
    logs: Vec<LogEntry>,
    #[serde(default)]
    total: u64,
}

#[derive(Deserialize)]
struct AnalysesResponse {
    #[serde(default)]
    analyses: Vec<AnalysisSummary>,
    #[serde(default, alias = "total")]
    total_count: u64,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    total: Option<u64>,
}

/// Window parameters followed by the filter; a filter can never override the window.
pub(crate) fn listing_query(
    style: PagingStyle,
    filter: &Filter,
    query: PageQuery,
) -> Vec<(String, String)> {
    let window = style.query_pairs(&query);
    let mut pairs: Vec<(String, String)> =
        window.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect();
    pairs.extend(
        filter
            .iter()
            .filter(|(k, _)| !window.iter().any(|(w, _)| w == k))
            .map(|(k, v)| (k.to_owned(), v.to_owned())),
    );
    pairs
}

/// Rejects ids that would change the request path.
pub(crate) fn path_segment<'a>(kind: &str, id: &'a str) -> Result<&'a str, ClientError> {
    let id = id.trim();
    let valid = !id.is_empty()
        && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && id != "."
        && id != "..";
    if valid {
        Ok(id)
    } else {
        Err(ClientError::InvalidInput(format!("invalid {kind} id: {id:?}")))
    }
}

impl ApiClient {
    /// One page of application logs (`GET /api/logs`), optionally narrowed by `date`.
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn list_logs(
        &self,
        filter: &Filter,
        query: PageQuery,
    ) -> Result<Listing<LogEntry>, ClientError> {
        let params = listing_query(PagingStyle::OffsetLimit, filter, query);
        let response: LogsResponse = self.get_json("/api/logs", &params).await?;
        Ok(Listing::new(response.logs, response.total))
    }

    /// One page of stored analyses (`GET /analysis/all`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn list_analyses(
        &self,
        filter: &Filter,
        query: PageQuery,
    ) -> Result<Listing<AnalysisSummary>, ClientError> {
        let params = listing_query(PagingStyle::OffsetLimit, filter, query);
        let response: AnalysesResponse = self.get_json("/analysis/all", &params).await?;
        Ok(Listing::new(response.analyses, response.total_count))
    }

    /// One page of collected chat messages (`GET /api/messages`, page-numbered).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn list_messages(
        &self,
        filter: &Filter,
        query: PageQuery,
    ) -> Result<Listing<Message>, ClientError> {
        let params = listing_query(PagingStyle::PageNumber, filter, query);
        let response: MessagesResponse = self.get_json("/api/messages", &params).await?;
        let total = response.total.unwrap_or(response.messages.len() as u64);
        Ok(Listing::new(response.messages, total))
    }

    /// Every message matching `filter`, unpaginated (`GET /api/analyze`).
    ///
    /// # Errors
    /// Any transport, status or parse failure.
    pub async fn messages_for_analysis(&self, filter: &Filter) -> Result<Vec<Message>, ClientError> {
        let response: MessagesResponse = self.get_json("/api/analyze", &filter.query_pairs()).await?;
        tracing::info!(count = response.messages.len(), "messages collected for analysis");
        Ok(response.messages)
    }

    /// Full text and token usage of one analysis (`GET /analysis/{id}`).
    ///
    /// # Errors
    /// `InvalidInput` for a malformed id, otherwise any transport, status or parse failure.
    pub async fn analysis(&self, analysis_id: &str) -> Result<AnalysisDetails, ClientError> {
        let id = path_segment("analysis", analysis_id)?;
        self.get_json(&format!("/analysis/{id}"), &[]).await
    }

    /// Runs a prompt over a message set (`POST /analysis/create`).
    ///
    /// # Errors
    /// `InvalidInput` without a prompt or without messages; otherwise any
    /// transport, status or parse failure.
    pub async fn create_analysis(
        &self,
        request: &CreateAnalysisRequest,
    ) -> Result<CreatedAnalysis, ClientError> {
        if request.prompt_id.trim().is_empty() {
            return Err(ClientError::InvalidInput("a prompt must be selected".to_owned()));
        }
        if request.messages.is_empty() {
            return Err(ClientError::InvalidInput(
                "no messages to analyze; adjust the filter first".to_owned(),
            ));
        }
        let created: CreatedAnalysis = self.post_json("/analysis/create", Some(request)).await?;
        tracing::info!(analysis_id = ?created.analysis_id, "analysis created");
        Ok(created)
    }

    /// Presigned download URL for a message attachment (`GET /api/download`).
    ///
    /// # Errors
    /// `MissingField` when the backend answers without a URL.
    pub async fn download_url(&self, s3_key: &str) -> Result<String, ClientError> {
        if s3_key.trim().is_empty() {
            return Err(ClientError::InvalidInput("s3 key must not be empty".to_owned()));
        }
        let params = vec![("s3_key".to_owned(), s3_key.trim().to_owned())];
        let link: DownloadLink = self.get_json("/api/download", &params).await?;
        link.url.filter(|u| !u.is_empty()).ok_or_else(|| ClientError::MissingField("url".to_owned()))
    }
}
