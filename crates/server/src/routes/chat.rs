use actix_web::{post, web, HttpResponse};
use medinfo_catalog::{format_for_context, DrugRecord};
use medinfo_common::MedInfoError;
use medinfo_llm::{build_messages, mock_reply, system_prompt, ChatMessage, Role, QUOTA_FALLBACK};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::{ChatRequest, ChatResponse, ChatUnavailableResponse};

/// Dataset records handed to the model as grounding context
pub const CHAT_CONTEXT_RECORDS: usize = 15;

/// Content of the most recent user message
fn last_user_text(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

/// Chat with the medicine assistant
#[post("/chat")]
pub async fn chat(
    req: web::Json<ChatRequest>,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let messages = req.into_inner().messages.unwrap_or_default();
    if messages.is_empty() {
        return Err(MedInfoError::invalid_input("messages 배열이 필요합니다.").into());
    }

    let user_text = last_user_text(&messages);

    let Some(provider) = state.chat.clone() else {
        return Ok(HttpResponse::ServiceUnavailable().json(ChatUnavailableResponse {
            error: "LLM API가 설정되지 않았습니다. .env에 GROQ_API_KEY를 설정해 주세요."
                .to_string(),
            fallback_reply: mock_reply(&user_text),
        }));
    };

    let context = {
        let records: Vec<&DrugRecord> = state
            .dataset
            .search(&user_text, CHAT_CONTEXT_RECORDS)
            .into_iter()
            .map(|hit| hit.record)
            .collect();
        info!("Chat request: {} messages, {} context records", messages.len(), records.len());
        format_for_context(&records)
    };

    let outbound = build_messages(system_prompt(&context), messages);

    match provider.complete(outbound).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(ChatResponse { reply })),
        Err(MedInfoError::RateLimited(detail)) => {
            warn!("Chat provider rate limited ({}); sending fallback reply", detail);
            Ok(HttpResponse::Ok().json(ChatResponse {
                reply: QUOTA_FALLBACK.to_string(),
            }))
        }
        Err(e) => {
            error!("Chat provider error ({}): {}", provider.model(), e);
            Err(e.into())
        }
    }
}
