use async_trait::async_trait;
use medinfo_common::{MedInfoError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::llm_trait::ChatProvider;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

const EMPTY_REPLY_MESSAGE: &str = "응답을 생성할 수 없습니다.";

/// Groq (OpenAI-compatible) chat-completions client
#[derive(Debug, Clone)]
pub struct GroqClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GroqClient {
    /// Create new client; `timeout` bounds each completion call
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MedInfoError::config(format!("Failed to create HTTP client: {}", e)))?;

        let model = model.into();
        info!("Chat client initialized: {} ({})", base_url, model);
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            model,
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatProvider for GroqClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatCompletionRequest::new(self.model.clone(), messages);

        debug!(
            "Sending chat completion - Model: {}, Messages: {}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Chat provider request failed: {}", e);
                MedInfoError::llm(format!("LLM 요청 실패: {}", e))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| MedInfoError::llm(format!("Failed to read response body: {}", e)))?;

        interpret_completion(status, &body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map a provider status and body to a reply or error
///
/// 429, or an error body mentioning `rate_limit` or `quota`, becomes
/// [`MedInfoError::RateLimited`]; other failures are [`MedInfoError::Llm`].
pub fn interpret_completion(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        if status == 429 || body.contains("rate_limit") || body.contains("quota") {
            warn!("Chat provider rate limited (HTTP {})", status);
            return Err(MedInfoError::rate_limited(format!("HTTP {}", status)));
        }

        error!("Chat provider HTTP {}: {}", status, body);
        let message = if body.trim().is_empty() {
            format!("LLM API error (HTTP {})", status)
        } else {
            body.to_string()
        };
        return Err(MedInfoError::llm(message));
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| MedInfoError::llm(format!("Failed to parse response: {}", e)))?;

    match parsed.reply() {
        Some(reply) => Ok(reply.to_string()),
        None => {
            let message = parsed
                .error
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| EMPTY_REPLY_MESSAGE.to_string());
            Err(MedInfoError::llm(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_reply() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"안녕하세요"}}]}"#;
        assert_eq!(interpret_completion(200, body).unwrap(), "안녕하세요");
    }

    #[test]
    fn test_rate_limit_by_status() {
        let err = interpret_completion(429, "Too Many Requests").unwrap_err();
        assert!(matches!(err, MedInfoError::RateLimited(_)));
    }

    #[test]
    fn test_rate_limit_by_body() {
        let body = r#"{"error":{"code":"rate_limit_exceeded"}}"#;
        assert!(matches!(
            interpret_completion(400, body).unwrap_err(),
            MedInfoError::RateLimited(_)
        ));
        let body = r#"{"error":{"message":"You exceeded your current quota"}}"#;
        assert!(matches!(
            interpret_completion(403, body).unwrap_err(),
            MedInfoError::RateLimited(_)
        ));
    }

    #[test]
    fn test_other_failure_carries_body() {
        let err = interpret_completion(401, "invalid api key").unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "invalid api key");
    }

    #[test]
    fn test_missing_content() {
        let err = interpret_completion(200, r#"{"choices":[]}"#).unwrap_err();
        assert_eq!(err.message(), EMPTY_REPLY_MESSAGE);

        let body = r#"{"choices":[],"error":{"message":"model overloaded"}}"#;
        assert_eq!(interpret_completion(200, body).unwrap_err().message(), "model overloaded");
    }

    #[test]
    fn test_completions_url() {
        let client = GroqClient::new(
            "https://api.groq.com/openai/v1/",
            "key",
            "llama-3.1-8b-instant",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(client.model(), "llama-3.1-8b-instant");
    }
}
