//! medinfo HTTP Server
//!
//! Actix-web 기반 REST API (의약품 검색, 알약 식별, 이미지 프록시, 챗봇)
//! 및 정적 프런트엔드 서빙

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use medinfo_common::{AppConfig, MedInfoError, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub use error::{ApiError, ApiResult};
pub use routes::configure;
pub use state::AppState;

/// Build state from `config` and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    let bind_addr = config.server_bind_address();
    let static_dir = config.static_dir.clone();
    let state = Arc::new(AppState::new(config)?);

    info!(
        "Starting server on {} (dataset: {} records, chat: {}, pill: {})",
        bind_addr,
        state.dataset.len(),
        state.chat.is_some(),
        state.pill.is_some()
    );

    let serve_static = static_dir.is_dir();
    if serve_static {
        info!("Serving static files from {}", static_dir.display());
    } else {
        warn!("Static directory {} not found; API only", static_dir.display());
    }

    let data = web::Data::new(state);

    HttpServer::new(move || {
        let app = App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(configure);

        if serve_static {
            app.service(actix_files::Files::new("/", &static_dir).index_file("index.html"))
        } else {
            app
        }
    })
    .bind(&bind_addr)
    .map_err(|e| MedInfoError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
