//! Dataset records rendered as grounding context for the chat assistant

use crate::dataset::DrugRecord;

/// Long text fields are cut to this many characters
pub const CONTEXT_FIELD_MAX_CHARS: usize = 400;

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Format records as numbered `[의약품 n]` blocks
///
/// Name and classification are always present (`-` when empty); the
/// efficacy, before-use, precaution and interaction texts only when non-empty.
pub fn format_for_context(records: &[&DrugRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut parts = vec![
                format!("[의약품 {}]", i + 1),
                format!("품목명: {}", or_dash(&record.name)),
                format!("분류명: {}", or_dash(&record.classification)),
            ];

            let optional = [
                ("이 약의 효능은 무엇입니까?", &record.efficacy),
                ("이 약을 사용하기 전에 반드시 알아야 할 내용", &record.before_use),
                ("이 약의 사용상 주의사항", &record.precautions),
                ("주의해야 할 약 또는 음식", &record.interactions),
            ];
            for (label, text) in optional {
                if !text.is_empty() {
                    parts.push(format!("{}: {}", label, truncate(text, CONTEXT_FIELD_MAX_CHARS)));
                }
            }

            parts.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_records() {
        assert_eq!(format_for_context(&[]), "");
    }

    #[test]
    fn test_block_layout() {
        let record = DrugRecord {
            name: "타이레놀정".to_string(),
            efficacy: "두통".to_string(),
            ..Default::default()
        };
        let text = format_for_context(&[&record]);
        assert_eq!(
            text,
            "[의약품 1]\n품목명: 타이레놀정\n분류명: -\n이 약의 효능은 무엇입니까?: 두통"
        );
    }

    #[test]
    fn test_blocks_are_numbered_and_separated() {
        let a = DrugRecord { name: "A".to_string(), ..Default::default() };
        let b = DrugRecord { name: "B".to_string(), ..Default::default() };
        let text = format_for_context(&[&a, &b]);
        assert!(text.contains("[의약품 1]\n품목명: A"));
        assert!(text.contains("\n\n[의약품 2]\n품목명: B"));
    }

    #[test]
    fn test_truncates_by_characters() {
        let long = "가".repeat(CONTEXT_FIELD_MAX_CHARS + 10);
        let truncated = truncate(&long, CONTEXT_FIELD_MAX_CHARS);
        assert_eq!(truncated.chars().count(), CONTEXT_FIELD_MAX_CHARS + 3);
        assert!(truncated.ends_with("..."));

        let exact = "나".repeat(CONTEXT_FIELD_MAX_CHARS);
        assert_eq!(truncate(&exact, CONTEXT_FIELD_MAX_CHARS), exact);
    }
}
