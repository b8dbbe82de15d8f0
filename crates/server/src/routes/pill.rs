use actix_web::{get, web, HttpResponse};
use medinfo_common::MedInfoError;
use medinfo_pill::PillQuery;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

/// Identify a pill by shape, color and imprint
#[get("/pill")]
pub async fn identify_pill(
    query: web::Query<PillQuery>,
    state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let Some(identifier) = &state.pill else {
        return Err(MedInfoError::not_configured(
            "공공데이터 API 키가 설정되지 않았습니다. .env에 DATA_GO_KR_KEY를 설정해 주세요.",
        )
        .into());
    };

    let query = PillQuery::new(&query.shape, &query.color, &query.imprint);
    let results = identifier.identify(&query).await?;

    Ok(HttpResponse::Ok().json(results))
}

#[cfg(test)]
mod tests {
    use crate::routes::configure;
    use crate::test_support::{sample_dataset, state_with, StaticRegistry};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_missing_key_is_503() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(sample_dataset(), None, None))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/pill?shape=round").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("DATA_GO_KR_KEY"));
    }

    #[actix_web::test]
    async fn test_empty_query_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(
                    sample_dataset(),
                    None,
                    Some(StaticRegistry::identifier(Vec::new())),
                ))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/pill?shape=&color=%20&imprint=")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_matches_returned() {
        let items = vec![
            json!({"ITEM_NAME": "원형정", "DRUG_SHAPE": "원형", "COLOR_CLASS1": "하양", "PRINT_FRONT": "A-10", "ETC_OTC_NAME": "일반의약품"}),
            json!({"ITEM_NAME": "타원정", "DRUG_SHAPE": "타원형", "COLOR_CLASS1": "하양"}),
        ];
        let app = test::init_service(
            App::new()
                .app_data(state_with(
                    sample_dataset(),
                    None,
                    Some(StaticRegistry::identifier(items)),
                ))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/pill?shape=round&color=white")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["name"], "원형정");
        assert_eq!(body[0]["shape_kr"], "원형");
        assert_eq!(body[0]["imprint"], "A-10");
        assert_eq!(body[0]["type"], "일반의약품");
    }

    #[actix_web::test]
    async fn test_upstream_failure_is_502() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(sample_dataset(), None, Some(StaticRegistry::failing())))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/pill?imprint=TY").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
