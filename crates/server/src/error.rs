use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use medinfo_common::MedInfoError;
use serde::Serialize;
use std::fmt;
use tracing::error;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// HTTP-facing wrapper around [`MedInfoError`]
#[derive(Debug)]
pub struct ApiError(pub MedInfoError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MedInfoError> for ApiError {
    fn from(err: MedInfoError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self.0);
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.0.message(),
        })
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: MedInfoError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).error_response();
        let status = response.status();
        let body = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn test_invalid_input_is_400() {
        let (status, json) = body_json(MedInfoError::invalid_input("q 필요")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "q 필요");
    }

    #[actix_web::test]
    async fn test_not_configured_is_503() {
        let (status, _) = body_json(MedInfoError::not_configured("키 없음")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_upstream_is_502() {
        let (status, json) = body_json(MedInfoError::upstream("registry down")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "registry down");
    }

    #[actix_web::test]
    async fn test_llm_is_500() {
        let (status, _) = body_json(MedInfoError::llm("boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
