//! HTTP routes under `/api`

mod chat;
mod image;
mod pill;
mod safety;
mod search;
mod system;

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use medinfo_common::MedInfoError;

use crate::error::ApiError;

pub use image::validate_image_url;

/// Malformed JSON bodies answer 400 with the usual error body
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        ApiError(MedInfoError::invalid_input(format!("잘못된 요청 본문입니다: {}", err))).into()
    })
}

/// Register every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .service(search::search)
            .service(pill::identify_pill)
            .service(image::image_proxy)
            .service(chat::chat)
            .service(safety::interactions)
            .service(safety::allergy)
            .service(system::health),
    );
}
