use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{get, web, HttpResponse};
use futures::TryStreamExt;
use medinfo_common::{MedInfoError, Result};
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::types::ImageQuery;

const DEFAULT_CONTENT_TYPE: &str = "image/png";
const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";
const FETCH_FAILED_MESSAGE: &str = "이미지를 불러올 수 없습니다.";

/// Check a proxy target: http(s) only, and on `allowed_host` when one is set
pub fn validate_image_url(raw: Option<&str>, allowed_host: Option<&str>) -> Result<Url> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return Err(MedInfoError::invalid_input("유효한 URL이 필요합니다."));
    }

    let url = Url::parse(raw).map_err(|_| MedInfoError::invalid_input("유효한 URL이 필요합니다."))?;

    if let Some(allowed) = allowed_host {
        let on_allowed_host = url
            .host_str()
            .map(|host| host.eq_ignore_ascii_case(allowed))
            .unwrap_or(false);
        if !on_allowed_host {
            return Err(MedInfoError::invalid_input("허용된 도메인만 가능합니다."));
        }
    }

    Ok(url)
}

/// Stream a registry image through this origin
#[get("/image")]
pub async fn image_proxy(
    query: web::Query<ImageQuery>,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let url = validate_image_url(
        query.url.as_deref(),
        state.config.image_allowed_host.as_deref(),
    )?;

    debug!("Proxying image: {}", url);

    let response = state
        .image_client
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
        .send()
        .await
        .map_err(|e| {
            error!("Image proxy request failed for {}: {}", url, e);
            MedInfoError::upstream(FETCH_FAILED_MESSAGE)
        })?;

    if !response.status().is_success() {
        warn!("Image host answered {} for {}", response.status(), url);
        return Err(MedInfoError::upstream(FETCH_FAILED_MESSAGE).into());
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let body = response
        .bytes_stream()
        .inspect_err(|e| warn!("Image stream interrupted: {}", e));

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, content_type))
        .insert_header((CACHE_CONTROL, IMAGE_CACHE_CONTROL))
        .streaming(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::configure;
    use crate::test_support::{sample_dataset, state_with, state_with_config};
    use actix_web::http::header::LOCATION;
    use actix_web::{http::StatusCode, test as actix_test, App, HttpServer};
    use medinfo_common::AppConfig;
    use std::net::TcpListener;

    const HOST: Option<&str> = Some("nedrug.mfds.go.kr");

    #[test]
    fn test_rejects_missing_or_non_http() {
        assert!(validate_image_url(None, None).is_err());
        assert!(validate_image_url(Some(""), None).is_err());
        assert!(validate_image_url(Some("ftp://nedrug.mfds.go.kr/a.png"), None).is_err());
        assert!(validate_image_url(Some("javascript:alert(1)"), None).is_err());
    }

    #[test]
    fn test_allowed_host() {
        let url = validate_image_url(
            Some(" https://nedrug.mfds.go.kr/pbp/cmn/itemImageDownload/1 "),
            HOST,
        )
        .unwrap();
        assert_eq!(url.host_str(), Some("nedrug.mfds.go.kr"));

        let err = validate_image_url(Some("https://example.com/a.png"), HOST).unwrap_err();
        assert_eq!(err.status_code(), 400);

        // host must match exactly, not by prefix
        assert!(validate_image_url(Some("https://nedrug.mfds.go.kr.evil.com/a.png"), HOST).is_err());
    }

    #[test]
    fn test_unrestricted_host() {
        assert!(validate_image_url(Some("http://example.com/a.png"), None).is_ok());
    }

    #[actix_web::test]
    async fn test_route_rejects_bad_url() {
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with(sample_dataset(), None, None))
                .configure(configure),
        )
        .await;

        for uri in ["/api/image", "/api/image?url=file%3A%2F%2F%2Fetc%2Fpasswd"] {
            let req = actix_test::TestRequest::get().uri(uri).to_request();
            let resp = actix_test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_route_rejects_foreign_host() {
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with(sample_dataset(), None, None))
                .configure(configure),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/api/image?url=https%3A%2F%2Fexample.com%2Fa.png")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    /// Local image host on an ephemeral port; returns the port
    fn spawn_upstream() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            App::new()
                .route(
                    "/img",
                    web::get().to(|| async {
                        HttpResponse::Ok().content_type("image/jpeg").body("JPEG")
                    }),
                )
                .route(
                    "/raw",
                    web::get().to(|| async { HttpResponse::Ok().body("RAW") }),
                )
                .route(
                    "/missing",
                    web::get().to(|| async { HttpResponse::NotFound().finish() }),
                )
                .route(
                    "/hop",
                    web::get().to(|| async {
                        HttpResponse::Found().insert_header((LOCATION, "/img")).finish()
                    }),
                )
                .route(
                    "/escape",
                    web::get().to(move || async move {
                        HttpResponse::Found()
                            .insert_header((LOCATION, format!("http://localhost:{}/img", port)))
                            .finish()
                    }),
                )
        })
        .listen(listener)
        .unwrap()
        .workers(1)
        .disable_signals()
        .run();
        actix_web::rt::spawn(server);

        port
    }

    async fn proxy(
        allowed_host: Option<&str>,
        target: String,
    ) -> actix_web::dev::ServiceResponse {
        let config = AppConfig {
            image_allowed_host: allowed_host.map(str::to_string),
            upstream_timeout_secs: 5,
            ..AppConfig::default()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with_config(config, sample_dataset(), None, None))
                .configure(configure),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/image?url={}", target))
            .to_request();
        actix_test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn test_streams_upstream_image() {
        let port = spawn_upstream();

        let resp = proxy(None, format!("http://127.0.0.1:{}/img", port)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "image/jpeg");
        assert_eq!(resp.headers().get(CACHE_CONTROL).unwrap(), IMAGE_CACHE_CONTROL);
        assert_eq!(actix_test::read_body(resp).await, "JPEG");
    }

    #[actix_web::test]
    async fn test_missing_content_type_defaults_to_png() {
        let port = spawn_upstream();

        let resp = proxy(None, format!("http://127.0.0.1:{}/raw", port)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), DEFAULT_CONTENT_TYPE);
        assert_eq!(actix_test::read_body(resp).await, "RAW");
    }

    #[actix_web::test]
    async fn test_upstream_error_is_502() {
        let port = spawn_upstream();

        let resp = proxy(None, format!("http://127.0.0.1:{}/missing", port)).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["error"], FETCH_FAILED_MESSAGE);
    }

    #[actix_web::test]
    async fn test_redirect_on_allowed_host_is_followed() {
        let port = spawn_upstream();

        let resp = proxy(Some("127.0.0.1"), format!("http://127.0.0.1:{}/hop", port)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(resp).await, "JPEG");
    }

    #[actix_web::test]
    async fn test_redirect_off_allowed_host_is_refused() {
        let port = spawn_upstream();

        // same server, but "localhost" is not the allowed host
        let resp = proxy(Some("127.0.0.1"), format!("http://127.0.0.1:{}/escape", port)).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
