use serde::Serialize;

/// Ingredient group for allergy screening
#[derive(Debug, Clone, Copy)]
pub struct AllergyGroup {
    pub name: &'static str,
    pub ingredients: &'static [&'static str],
}

pub const ALLERGY_GROUPS: &[AllergyGroup] = &[
    AllergyGroup {
        name: "페니실린",
        ingredients: &["페니실린", "아목시실린", "암피실린", "오구멘틴", "클라불란산"],
    },
    AllergyGroup {
        name: "설폰아마이드",
        ingredients: &["설폰아마이드", "설파메톡사졸", "설파살라진", "박트림"],
    },
    AllergyGroup {
        name: "아스피린",
        ingredients: &["아스피린", "아세틸살리실산", "살리실산"],
    },
    AllergyGroup {
        name: "세팔로스포린",
        ingredients: &["세팔로스포린", "세팔렉신", "세파클러", "세프트리악손", "세푸록심"],
    },
];

/// Result of screening a medication list for one allergy
#[derive(Debug, Clone, Serialize)]
pub struct AllergyCheck {
    pub allergy: String,
    /// Matched allergy group, if the input names a known one
    pub group: Option<&'static str>,
    /// Medications that may contain the allergen
    pub matched: Vec<String>,
    pub message: String,
}

fn overlaps(a: &str, b: &str) -> bool {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    a.contains(&b) || b.contains(&a)
}

/// Screen `medications` for `allergy`
///
/// A known group matches every listed ingredient of the group; otherwise
/// the allergy text itself is compared with each medication name.
pub fn check_allergy(medications: &[String], allergy: &str) -> AllergyCheck {
    let allergy = allergy.trim();
    let medications: Vec<&str> = medications
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect();

    let group = ALLERGY_GROUPS.iter().find(|g| overlaps(g.name, allergy));

    let matched: Vec<String> = match group {
        Some(group) => medications
            .iter()
            .filter(|m| group.ingredients.iter().any(|ing| overlaps(m, ing)))
            .map(|m| m.to_string())
            .collect(),
        None => medications
            .iter()
            .filter(|m| overlaps(m, allergy))
            .map(|m| m.to_string())
            .collect(),
    };

    let message = match (group, matched.is_empty()) {
        (Some(group), false) => format!(
            "⚠️ 알레르기 주의: {}에 {} 계열 성분이 포함될 수 있습니다. 반드시 의사와 상담하세요.",
            matched.join(", "),
            group.name
        ),
        (None, false) => format!(
            "⚠️ 알레르기 주의: \"{}\"에 \"{}\" 성분이 포함될 수 있습니다. 의사와 상담하세요.",
            matched.join(", "),
            allergy
        ),
        (Some(_), true) => "저장된 약 목록에서 해당 알레르기 성분이 발견되지 않았습니다.".to_string(),
        (None, true) => format!(
            "저장된 약 목록에서 해당 알레르기 성분이 발견되지 않았습니다. 등록된 알레르기 그룹: {}",
            ALLERGY_GROUPS.iter().map(|g| g.name).collect::<Vec<_>>().join(", ")
        ),
    };

    AllergyCheck {
        allergy: allergy.to_string(),
        group: group.map(|g| g.name),
        matched,
        message,
    }
}
