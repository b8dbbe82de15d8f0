use async_trait::async_trait;
use medinfo_common::Result;

use crate::types::ChatMessage;

/// Chat-completion backend
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete a conversation, returning the assistant reply text
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Model identifier, for logs and the health endpoint
    fn model(&self) -> &str;
}
