use actix_web::{get, web, HttpResponse};
use medinfo_catalog::DrugRecord;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::SearchQuery;

/// Relevance search over the medicine dataset
#[get("/search")]
pub async fn search(
    query: web::Query<SearchQuery>,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let q = query.q.trim();
    if q.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<DrugRecord>::new()));
    }

    let limit = query.effective_limit();
    let records: Vec<&DrugRecord> = state
        .dataset
        .search(q, limit)
        .into_iter()
        .map(|hit| hit.record)
        .collect();

    debug!("Search {:?} (limit {}) - {} results", q, limit, records.len());

    Ok(HttpResponse::Ok().json(records))
}
