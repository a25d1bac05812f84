use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{INPUT_RATE_PER_1K, OUTPUT_RATE_PER_1K};
use crate::filter::Filter;
use crate::json_utils::{deserialize_opt_id, parse_timestamp};
use crate::records::Message;

/// Full analysis record (`/analysis/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    #[serde(default)]
    pub prompt_name: Option<String>,
    #[serde(default)]
    pub filters: Option<Value>,
    #[serde(default)]
    pub result_text: Option<String>,
    #[serde(default)]
    pub tokens_input: Option<u64>,
    #[serde(default)]
    pub tokens_output: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl AnalysisDetails {
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Dollar cost of the prompt tokens.
    #[must_use]
    pub fn input_cost(&self) -> f64 {
        token_cost(self.tokens_input.unwrap_or(0), INPUT_RATE_PER_1K)
    }

    /// Dollar cost of the completion tokens.
    #[must_use]
    pub fn output_cost(&self) -> f64 {
        token_cost(self.tokens_output.unwrap_or(0), OUTPUT_RATE_PER_1K)
    }
}

/// Cost of `tokens` at `rate_per_1k` dollars per thousand.
#[must_use]
pub fn token_cost(tokens: u64, rate_per_1k: f64) -> f64 {
    (tokens as f64 / 1000.0) * rate_per_1k
}

/// Body of `POST /analysis/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAnalysisRequest {
    pub prompt_id: String,
    pub filters: Filter,
    pub messages: Vec<Message>,
}

/// Reply to `POST /analysis/create`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedAnalysis {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub analysis_id: Option<String>,
    #[serde(default)]
    pub result_text: Option<String>,
}

impl CreatedAnalysis {
    /// The backend stored an analysis and produced text for it.
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.analysis_id.is_some() && self.result_text.as_deref().is_some_and(|t| !t.is_empty())
    }
}
