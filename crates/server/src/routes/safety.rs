use actix_web::{post, web, HttpResponse};
use medinfo_catalog::{check_allergy, check_interactions, normalize_drug_name};
use medinfo_common::MedInfoError;
use std::collections::HashSet;
use tracing::info;

use crate::error::ApiResult;
use crate::types::{AllergyRequest, InteractionRequest, InteractionResponse};

/// Pairwise interaction check against the static table
#[post("/interactions")]
pub async fn interactions(req: web::Json<InteractionRequest>) -> ApiResult<HttpResponse> {
    let distinct: HashSet<String> = req
        .drugs
        .iter()
        .map(|d| normalize_drug_name(d))
        .filter(|d| !d.is_empty())
        .collect();
    if distinct.len() < 2 {
        return Err(MedInfoError::invalid_input("2개 이상의 약을 입력해 주세요.").into());
    }

    let findings = check_interactions(&req.drugs);
    info!("Interaction check: {} drugs, {} findings", distinct.len(), findings.len());

    let message = if findings.is_empty() {
        "등록된 데이터에서 알려진 상호작용이 없습니다. 전문가 상담을 권장합니다."
    } else {
        "⚠️ 상호작용 주의: 함께 복용하기 전에 의사나 약사와 상담하세요."
    };

    Ok(HttpResponse::Ok().json(InteractionResponse {
        findings,
        message: message.to_string(),
    }))
}

/// Screen a medication list for an allergy
#[post("/allergy")]
pub async fn allergy(req: web::Json<AllergyRequest>) -> ApiResult<HttpResponse> {
    if req.allergy.trim().is_empty() {
        return Err(MedInfoError::invalid_input("알레르기 성분을 입력해 주세요.").into());
    }
    if req.medications.iter().all(|m| m.trim().is_empty()) {
        return Err(MedInfoError::invalid_input("저장된 약이 없습니다. 먼저 약을 추가해 주세요.").into());
    }

    Ok(HttpResponse::Ok().json(check_allergy(&req.medications, &req.allergy)))
}
