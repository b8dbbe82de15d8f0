use chrono::{DateTime, Utc};
use medinfo_catalog::InteractionFinding;
use medinfo_llm::ChatMessage;
use serde::{Deserialize, Serialize};

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: usize = 30;

/// Upper bound on search results per request
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Search query
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query text
    #[serde(default)]
    pub q: String,

    /// Result count; kept as text so a malformed value falls back to the default
    pub limit: Option<String>,
}

impl SearchQuery {
    /// Requested limit, defaulted and clamped to [`MAX_SEARCH_LIMIT`]
    pub fn effective_limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .min(MAX_SEARCH_LIMIT)
    }
}

/// Image proxy query
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

/// Chat reply
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Chat unavailable (no provider configured)
#[derive(Debug, Serialize)]
pub struct ChatUnavailableResponse {
    pub error: String,

    /// Canned reply the client may show instead
    pub fallback_reply: String,
}

/// Interaction check request
#[derive(Debug, Deserialize)]
pub struct InteractionRequest {
    #[serde(default)]
    pub drugs: Vec<String>,
}

/// Interaction check result
#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    pub findings: Vec<InteractionFinding>,
    pub message: String,
}

/// Allergy check request
#[derive(Debug, Deserialize)]
pub struct AllergyRequest {
    #[serde(default)]
    pub medications: Vec<String>,

    #[serde(default)]
    pub allergy: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub dataset_records: usize,
    pub chat_enabled: bool,
    pub pill_enabled: bool,
    pub started_at: DateTime<Utc>,
}
