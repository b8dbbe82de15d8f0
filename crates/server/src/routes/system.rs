use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness and feature availability
#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        dataset_records: state.dataset.len(),
        chat_enabled: state.chat.is_some(),
        pill_enabled: state.pill.is_some(),
        started_at: state.started_at,
    }))
}
