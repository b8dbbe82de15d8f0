//! medinfo Pill Identification
//!
//! 식품의약품안전처 낱알식별정보 API 조회 및 모양/색상/각인 매칭

mod candidate;
mod identify;
mod matcher;
mod registry;

pub use candidate::PillCandidate;
pub use identify::{
    PillIdentifier, PillQuery, MAX_PAGES, MAX_PAGES_WITH_IMPRINT, MAX_RESULTS, PAGE_SIZE,
};
pub use matcher::{
    matches_color, matches_imprint, matches_shape, normalize_imprint, PillColor, PillShape,
};
pub use registry::{parse_registry_body, DataGoKrRegistry, PillRegistry, RegistryPage, ServiceKey};
