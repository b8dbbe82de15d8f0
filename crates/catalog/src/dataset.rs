use medinfo_common::{MedInfoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::search::SearchKey;

/// Source column names, in lookup precedence order (first non-empty wins)
mod columns {
    pub const NAME: &[&str] = &["품목명"];
    pub const CLASSIFICATION: &[&str] = &["분류명"];
    pub const INGREDIENT: &[&str] = &["주성분_x", "주성분"];
    pub const EFFICACY: &[&str] = &["이 약의 효능은 무엇입니까?"];
    pub const USAGE: &[&str] = &["이 약은 어떻게 사용합니까?"];
    // The public dataset ships the misspelled header
    pub const BEFORE_USE: &[&str] = &[
        "이 약을 사용하기 전에 반드시 알아야 할 내용은 무엇입니까?",
        "이 약을 사용하기 전에 반드시 알아야 할 내용은 무엇입니가?",
    ];
    pub const PRECAUTIONS: &[&str] = &["이 약의 사용상 주의사항은 무엇입니까?"];
    pub const INTERACTIONS: &[&str] =
        &["이 약을 사용하는 동안 주의해야 할 약 또는 음식은 무엇입니까?"];
    pub const SIDE_EFFECTS: &[&str] = &["이 약은 어떤 이상반응이 나타날 수 있습니까?"];
    pub const STORAGE: &[&str] = &["이 약은 어떻게 보관해야 합니까?"];
    pub const LICENSE_NUMBER: &[&str] = &["품목허가번호"];
    pub const MANUFACTURER: &[&str] = &["업체명"];
    pub const OTC_CLASS: &[&str] = &["전문일반구분"];
    pub const IMAGE_URL: &[&str] = &["큰제품이미지", "큰 제품 이미지"];
}

/// One row of the licensed-medicine dataset
///
/// Serialized with the dataset's Korean column names so API clients see the
/// same keys as the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Product name
    #[serde(rename = "품목명")]
    pub name: String,

    /// Classification name
    #[serde(rename = "분류명")]
    pub classification: String,

    /// Active ingredient
    #[serde(rename = "주성분")]
    pub ingredient: String,

    /// Efficacy text
    #[serde(rename = "이 약의 효능은 무엇입니까?")]
    pub efficacy: String,

    /// Usage text
    #[serde(rename = "이 약은 어떻게 사용합니까?")]
    pub usage: String,

    /// What to know before use
    #[serde(rename = "이 약을 사용하기 전에 반드시 알아야 할 내용은 무엇입니까?")]
    pub before_use: String,

    /// Precautions
    #[serde(rename = "이 약의 사용상 주의사항은 무엇입니까?")]
    pub precautions: String,

    /// Drugs or food to avoid while taking it
    #[serde(rename = "이 약을 사용하는 동안 주의해야 할 약 또는 음식은 무엇입니까?")]
    pub interactions: String,

    /// Side effects
    #[serde(rename = "이 약은 어떤 이상반응이 나타날 수 있습니까?")]
    pub side_effects: String,

    /// Storage instructions
    #[serde(rename = "이 약은 어떻게 보관해야 합니까?")]
    pub storage: String,

    /// License number
    #[serde(rename = "품목허가번호")]
    pub license_number: String,

    /// Manufacturer
    #[serde(rename = "업체명")]
    pub manufacturer: String,

    /// Prescription / over-the-counter class
    #[serde(rename = "전문일반구분")]
    pub otc_class: String,

    /// Product image URL
    #[serde(rename = "큰제품이미지")]
    pub image_url: String,
}

impl DrugRecord {
    /// Rows without product name or classification are not usable
    fn is_listed(&self) -> bool {
        !self.name.is_empty() && !self.classification.is_empty()
    }
}

/// Header name → column index
struct ColumnMap {
    index: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
            .collect();
        Self { index }
    }

    /// First non-empty value among `aliases`
    fn get(&self, row: &csv::StringRecord, aliases: &[&str]) -> String {
        aliases
            .iter()
            .filter_map(|alias| self.index.get(*alias))
            .filter_map(|&i| row.get(i))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    fn record(&self, row: &csv::StringRecord) -> DrugRecord {
        DrugRecord {
            name: self.get(row, columns::NAME),
            classification: self.get(row, columns::CLASSIFICATION),
            ingredient: self.get(row, columns::INGREDIENT),
            efficacy: self.get(row, columns::EFFICACY),
            usage: self.get(row, columns::USAGE),
            before_use: self.get(row, columns::BEFORE_USE),
            precautions: self.get(row, columns::PRECAUTIONS),
            interactions: self.get(row, columns::INTERACTIONS),
            side_effects: self.get(row, columns::SIDE_EFFECTS),
            storage: self.get(row, columns::STORAGE),
            license_number: self.get(row, columns::LICENSE_NUMBER),
            manufacturer: self.get(row, columns::MANUFACTURER),
            otc_class: self.get(row, columns::OTC_CLASS),
            image_url: self.get(row, columns::IMAGE_URL),
        }
    }
}

/// Read-only, in-memory medicine dataset
///
/// Loaded once at startup and shared by handlers behind an `Arc`.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<DrugRecord>,
    keys: Vec<SearchKey>,
}

impl Dataset {
    /// Dataset with no records
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from already-parsed records (unlisted rows are dropped)
    pub fn from_records(records: Vec<DrugRecord>) -> Self {
        let records: Vec<DrugRecord> = records.into_iter().filter(DrugRecord::is_listed).collect();
        let keys = records.iter().map(SearchKey::from_record).collect();
        Self { records, keys }
    }

    /// Parse CSV content with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| MedInfoError::dataset(format!("Failed to read CSV header: {}", e)))?;
        let columns = ColumnMap::from_headers(headers);

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in csv_reader.records() {
            match row {
                Ok(row) => records.push(columns.record(&row)),
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping malformed CSV row: {}", e);
                }
            }
        }

        if skipped > 0 {
            warn!("{} malformed rows skipped", skipped);
        }

        Ok(Self::from_records(records))
    }

    /// Load dataset from a CSV file
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            MedInfoError::dataset(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let dataset = Self::from_reader(file)?;
        info!("Medicine dataset loaded: {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Load dataset, falling back to an empty one
    ///
    /// A missing dataset only disables search results; it never stops the server.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("Medicine dataset unavailable, search will return no results: {}", e);
                Self::empty()
            }
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in storage order
    pub fn records(&self) -> &[DrugRecord] {
        &self.records
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&DrugRecord, &SearchKey)> {
        self.records.iter().zip(self.keys.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\u{feff}품목명,분류명,주성분,주성분_x,이 약의 효능은 무엇입니까?,이 약을 사용하기 전에 반드시 알아야 할 내용은 무엇입니가?,업체명
타이레놀정500밀리그램,해열진통제,아세트아미노펜,,두통 치통 생리통에 사용합니다.,간장애 환자는 의사와 상의하십시오.,한국얀센
게보린정,해열진통제,아세트아미노펜,\"아세트아미노펜,이소프로필안티피린\",두통에 사용합니다.,,삼진제약
분류없는약,,,,,,
";

    #[test]
    fn test_from_reader_maps_columns() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.name, "타이레놀정500밀리그램");
        assert_eq!(first.classification, "해열진통제");
        assert_eq!(first.manufacturer, "한국얀센");
        assert_eq!(first.before_use, "간장애 환자는 의사와 상의하십시오.");
    }

    #[test]
    fn test_ingredient_prefers_x_column() {
        let dataset = Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].ingredient, "아세트아미노펜");
        assert_eq!(
            dataset.records()[1].ingredient,
            "아세트아미노펜,이소프로필안티피린"
        );
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = "품목명,분류명,업체명\n베아제정,소화제\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].manufacturer, "");
    }

    #[test]
    fn test_load_or_empty_missing_file() {
        let dataset = Dataset::load_or_empty(Path::new("./does-not-exist/medicine.csv"));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_serializes_with_korean_keys() {
        let record = DrugRecord {
            name: "타이레놀".to_string(),
            classification: "해열진통제".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["품목명"], "타이레놀");
        assert_eq!(json["분류명"], "해열진통제");
    }
}
