//! medinfo Medicine Catalog
//!
//! 의약품 허가정보 데이터셋 로드, 관련도 검색, 상호작용/알레르기 조회

mod allergy;
mod context;
mod dataset;
mod interaction;
mod search;

pub use allergy::{check_allergy, AllergyCheck, AllergyGroup, ALLERGY_GROUPS};
pub use context::{format_for_context, CONTEXT_FIELD_MAX_CHARS};
pub use dataset::{Dataset, DrugRecord};
pub use interaction::{
    check_interactions, normalize_drug_name, InteractionEntry, InteractionFinding,
    INTERACTION_TABLE,
};
pub use search::{query_terms, SearchHit};
