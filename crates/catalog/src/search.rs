use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, DrugRecord};

/// Field weights for relevance scoring
pub(crate) const NAME_WEIGHT: u32 = 4;
pub(crate) const CLASSIFICATION_WEIGHT: u32 = 3;
pub(crate) const EFFICACY_WEIGHT: u32 = 3;
pub(crate) const INGREDIENT_WEIGHT: u32 = 1;

/// Lowercased copies of the scored fields, built once per record
#[derive(Debug, Clone)]
pub(crate) struct SearchKey {
    name: String,
    classification: String,
    efficacy: String,
    ingredient: String,
}

impl SearchKey {
    pub(crate) fn from_record(record: &DrugRecord) -> Self {
        Self {
            name: record.name.to_lowercase(),
            classification: record.classification.to_lowercase(),
            efficacy: record.efficacy.to_lowercase(),
            ingredient: record.ingredient.to_lowercase(),
        }
    }

    /// A term may hit several fields and is counted once per field
    fn score(&self, terms: &[String]) -> u32 {
        terms
            .iter()
            .map(|term| {
                let mut score = 0;
                if self.name.contains(term.as_str()) {
                    score += NAME_WEIGHT;
                }
                if self.classification.contains(term.as_str()) {
                    score += CLASSIFICATION_WEIGHT;
                }
                if self.efficacy.contains(term.as_str()) {
                    score += EFFICACY_WEIGHT;
                }
                if self.ingredient.contains(term.as_str()) {
                    score += INGREDIENT_WEIGHT;
                }
                score
            })
            .sum()
    }
}

/// Search result with its relevance score
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub record: &'a DrugRecord,
    pub score: u32,
}

/// Split a query into lowercase whitespace-separated terms
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

impl Dataset {
    /// Rank records against a free-text query
    ///
    /// Returns at most `limit` hits ordered by descending score; records that
    /// score 0 are excluded and equal scores keep dataset order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let terms = query_terms(query);
        if terms.is_empty() || self.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .entries()
            .filter_map(|(record, key)| {
                let score = key.score(&terms);
                (score > 0).then_some(SearchHit { record, score })
            })
            .collect();

        // sort_by is stable: ties stay in storage order
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        let matched = hits.len();
        hits.truncate(limit);

        debug!(
            "Search '{}' - {} matched, {} returned",
            query,
            matched,
            hits.len()
        );
        hits
    }
}
