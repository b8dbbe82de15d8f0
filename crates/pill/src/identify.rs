use medinfo_common::{MedInfoError, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::candidate::PillCandidate;
use crate::matcher::{matches_color, matches_imprint, matches_shape};
use crate::registry::PillRegistry;

/// Records requested per registry page
pub const PAGE_SIZE: u32 = 100;

/// Matches returned per query
pub const MAX_RESULTS: usize = 15;

/// Page ceiling for shape/color queries
pub const MAX_PAGES: u32 = 10;

/// Page ceiling when an imprint is given; imprints are far more selective
pub const MAX_PAGES_WITH_IMPRINT: u32 = 30;

/// Appearance query; each field is optional but one must be set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PillQuery {
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub imprint: String,
}

impl PillQuery {
    pub fn new(
        shape: impl Into<String>,
        color: impl Into<String>,
        imprint: impl Into<String>,
    ) -> Self {
        Self {
            shape: shape.into().trim().to_string(),
            color: color.into().trim().to_string(),
            imprint: imprint.into().trim().to_string(),
        }
    }

    /// No criterion given
    pub fn is_empty(&self) -> bool {
        self.shape.trim().is_empty() && self.color.trim().is_empty() && self.imprint.trim().is_empty()
    }

    /// Page ceiling for this query
    pub fn max_pages(&self) -> u32 {
        if self.imprint.trim().is_empty() {
            MAX_PAGES
        } else {
            MAX_PAGES_WITH_IMPRINT
        }
    }

    /// Candidate passes all three filters
    pub fn matches(&self, candidate: &PillCandidate) -> bool {
        matches_shape(&candidate.shape, &self.shape)
            && matches_color(&candidate.color, &self.color)
            && matches_imprint(&candidate.print_front, &candidate.print_back, &self.imprint)
    }
}

/// Pages through the registry and filters by appearance
#[derive(Clone)]
pub struct PillIdentifier {
    registry: Arc<dyn PillRegistry>,
}

impl PillIdentifier {
    pub fn new(registry: Arc<dyn PillRegistry>) -> Self {
        Self { registry }
    }

    /// Find up to [`MAX_RESULTS`] candidates matching `query`
    ///
    /// Stops on a short page, once enough matches are collected, or at the
    /// page ceiling. Any registry failure aborts the whole lookup.
    pub async fn identify(&self, query: &PillQuery) -> Result<Vec<PillCandidate>> {
        if query.is_empty() {
            return Err(MedInfoError::invalid_input(
                "모양, 색상, 각인 중 하나 이상을 입력해 주세요.",
            ));
        }

        let max_pages = query.max_pages();
        let mut matches: Vec<PillCandidate> = Vec::new();
        let mut pages_fetched = 0;

        for page_no in 1..=max_pages {
            let page = self.registry.fetch_page(page_no, PAGE_SIZE).await?;
            pages_fetched = page_no;

            let fetched = page.items.len();
            matches.extend(
                page.items
                    .iter()
                    .map(PillCandidate::from_registry_item)
                    .filter(|candidate| query.matches(candidate)),
            );

            debug!(
                "Pill registry page {}: {} items, {} matches so far",
                page_no,
                fetched,
                matches.len()
            );

            if fetched < PAGE_SIZE as usize || matches.len() >= MAX_RESULTS {
                break;
            }
        }

        matches.truncate(MAX_RESULTS);

        info!(
            "Pill identification (shape={:?}, color={:?}, imprint={:?}) - {} results from {} pages",
            query.shape,
            query.color,
            query.imprint,
            matches.len(),
            pages_fetched
        );

        Ok(matches)
    }
}
