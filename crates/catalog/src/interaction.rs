use serde::Serialize;

/// Static interaction table entry
#[derive(Debug, Clone, Copy)]
pub struct InteractionEntry {
    pub drug: &'static str,
    pub interacts_with: &'static [&'static str],
}

/// Hand-curated interaction table (brand and ingredient names)
pub const INTERACTION_TABLE: &[InteractionEntry] = &[
    InteractionEntry {
        drug: "와파린",
        interacts_with: &["아스피린", "이부프로펜", "나프록센", "아세트아미노펜", "비타민K", "자몽"],
    },
    InteractionEntry {
        drug: "아스피린",
        interacts_with: &["와파린", "이부프로펜", "나프록센", "클로피도그렐", "메토트렉세이트"],
    },
    InteractionEntry {
        drug: "이부프로펜",
        interacts_with: &["아스피린", "와파린", "나프록센", "리튬", "메토트렉세이트"],
    },
    InteractionEntry {
        drug: "아세트아미노펜",
        interacts_with: &["와파린", "알코올", "술"],
    },
    InteractionEntry {
        drug: "타이레놀",
        interacts_with: &["와파린", "알코올", "술"],
    },
    InteractionEntry {
        drug: "클로피도그렐",
        interacts_with: &["오메프라졸", "에소메프라졸", "아스피린"],
    },
    InteractionEntry {
        drug: "심바스타틴",
        interacts_with: &["자몽", "클래리스로마이신", "이트라코나졸"],
    },
    InteractionEntry {
        drug: "메트포르민",
        interacts_with: &["알코올", "술", "조영제"],
    },
    InteractionEntry {
        drug: "시프로플록사신",
        interacts_with: &["제산제", "철분제", "칼슘", "우유"],
    },
    InteractionEntry {
        drug: "레보티록신",
        interacts_with: &["칼슘", "철분제", "제산제"],
    },
    InteractionEntry {
        drug: "슈도에페드린",
        interacts_with: &["카페인", "셀레길린"],
    },
];

/// One detected interaction between two user-supplied names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionFinding {
    pub first: String,
    pub second: String,
    pub message: String,
}

/// Lowercase and drop all whitespace
pub fn normalize_drug_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Either name contains the other
fn names_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn entry_links(entry: &InteractionEntry, drug: &str, other: &str) -> bool {
    names_overlap(&normalize_drug_name(entry.drug), drug)
        && entry
            .interacts_with
            .iter()
            .any(|name| names_overlap(&normalize_drug_name(name), other))
}

/// Check every pair of names against the interaction table
///
/// A pair is flagged in both orientations: either the first name's table
/// entry lists the second, or the second name's entry lists the first. The
/// table is not fully symmetric (아세트아미노펜 lists 와파린, 와파린 does
/// not list 타이레놀), so this reports a superset of a first-name-keyed
/// lookup. Pairs are reported once, in input order. Blank and duplicate
/// names are ignored.
pub fn check_interactions(drugs: &[String]) -> Vec<InteractionFinding> {
    let mut seen = Vec::new();
    let drugs: Vec<(&str, String)> = drugs
        .iter()
        .map(|d| d.trim())
        .filter_map(|d| {
            let norm = normalize_drug_name(d);
            if norm.is_empty() || seen.contains(&norm) {
                return None;
            }
            seen.push(norm.clone());
            Some((d, norm))
        })
        .collect();

    let mut findings = Vec::new();
    for (i, (first, first_norm)) in drugs.iter().enumerate() {
        for (second, second_norm) in drugs.iter().skip(i + 1) {
            let linked = INTERACTION_TABLE.iter().any(|entry| {
                entry_links(entry, first_norm, second_norm)
                    || entry_links(entry, second_norm, first_norm)
            });
            if linked {
                findings.push(InteractionFinding {
                    first: first.to_string(),
                    second: second.to_string(),
                    message: format!("{} ↔ {}: 상호작용 가능", first, second),
                });
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_drug_name() {
        assert_eq!(normalize_drug_name(" 비타민 K "), "비타민k");
        assert_eq!(normalize_drug_name("Warfarin\tSodium"), "warfarinsodium");
    }

    #[test]
    fn test_known_pair_detected() {
        let findings = check_interactions(&names(&["와파린", "아스피린"]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "와파린 ↔ 아스피린: 상호작용 가능");
    }

    #[test]
    fn test_substring_match_on_product_names() {
        // "타이레놀정500" contains the table key "타이레놀"
        let findings = check_interactions(&names(&["타이레놀정500", "와파린정"]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].first, "타이레놀정500");
        assert_eq!(findings[0].second, "와파린정");
    }

    #[test]
    fn test_reverse_orientation_detected() {
        // only 메트포르민 lists 조영제
        let findings = check_interactions(&names(&["조영제", "메트포르민"]));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_no_interaction() {
        assert!(check_interactions(&names(&["베아제", "판콜"])).is_empty());
    }

    #[test]
    fn test_blank_and_duplicate_names_ignored() {
        assert!(check_interactions(&names(&["", "  ", "와파린"])).is_empty());
        let findings = check_interactions(&names(&["와파린", "와 파린", "아스피린"]));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_all_pairs_checked() {
        let findings = check_interactions(&names(&["와파린", "아스피린", "이부프로펜"]));
        assert_eq!(findings.len(), 3);
    }
}
