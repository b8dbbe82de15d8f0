//! medinfo LLM Integration
//!
//! OpenAI 호환 chat-completions 클라이언트와 의약품 도우미 프롬프트

mod client;
mod llm_trait;
mod prompts;
mod types;

pub use client::{interpret_completion, GroqClient};
pub use llm_trait::ChatProvider;
pub use prompts::{
    build_messages, data_section, mock_reply, system_prompt, BASE_SYSTEM, DISCLAIMER,
    QUOTA_FALLBACK,
};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role};
