//! Prompt templates for the medicine assistant

use crate::types::{ChatMessage, Role};

/// Appended to every canned reply
pub const DISCLAIMER: &str = "⚠️ 본 정보는 참고용이며, 반드시 의사나 약사와 상담하세요.";

/// Reply returned instead of an error when the provider is rate limited
pub const QUOTA_FALLBACK: &str = "현재 AI 사용 한도에 도달했습니다. 잠시(약 1분) 후 다시 시도해 주세요. 의약품 검색은 상단 검색창을 이용해 보세요. ⚠️ 본 정보는 참고용이며, 반드시 의사나 약사와 상담하세요.";

/// System prompt: recommendation rules and JSON output format
pub const BASE_SYSTEM: &str = r#"너는 일반의약품 정보를 바탕으로 사용자에게 관련 가능성이 높은 의약품을 추천하고, 해당 의약품의 공식 정보를 요약해 함께 제공하는 도우미다. 반드시 다음 규칙을 따른다.

[규칙 1: 추천 판단 기준]
- 추천 여부 판단은 오직 다음 정보만 근거로 한다.
  1) 품목명
  2) 분류명
  3) 이 약의 효능은 무엇입니까?
- 사용법, 주의사항, 이상반응, 보관법 정보는 추천 여부 판단에는 사용하지 않는다.

[규칙 2: 부가 정보 출력]
- 추천 결과를 출력할 때, 아래 정보가 존재한다면 간략히 요약해 함께 제공한다.
  - 이 약을 사용하기 전에 반드시 알아야 할 내용
  - 이 약의 사용상 주의사항
  - 이 약을 사용하는 동안 주의해야 할 약 또는 음식
- 각 항목은 1~2문장으로 요약한다.
- 정보가 비어 있거나 없는 항목은 출력하지 않는다.

[규칙 3: 안전]
- 진단, 처방, 복용량 결정은 하지 않는다.
- 모든 답변은 정보 제공 목적임을 유지한다.

항상 JSON 형식으로만 출력한다. 예시: {"추천의약품":[{"품목명":"...","분류명":"...","효능요약":"...","사용법":"...","주의사항":"..."}],"안내":"본 정보는 참고용이며 반드시 의사나 약사와 상담하세요."}"#;

/// Dataset section appended to the system prompt; empty without context
pub fn data_section(context: &str) -> String {
    if context.trim().is_empty() {
        return String::new();
    }
    format!(
        "\n\n[의약품 허가정보 데이터]\n{}\n\n위 데이터만 사용하여 사용자 질문에 맞는 의약품을 추천하고, 규칙에 따라 JSON으로 출력하세요.",
        context
    )
}

/// Full system prompt for a dataset context
pub fn system_prompt(context: &str) -> String {
    format!("{}{}", BASE_SYSTEM, data_section(context))
}

/// Replace client-supplied system messages with `system`
///
/// The result always starts with exactly one system message followed by the
/// remaining messages in their original order.
pub fn build_messages(system: String, incoming: Vec<ChatMessage>) -> Vec<ChatMessage> {
    std::iter::once(ChatMessage::system(system))
        .chain(incoming.into_iter().filter(|m| m.role != Role::System))
        .collect()
}

/// Keyword-based canned reply used when no provider is configured
pub fn mock_reply(user_text: &str) -> String {
    let lower = user_text.to_lowercase();

    let body = if lower.contains("타이레놀") || lower.contains("아세트아미노펜") {
        "타이레놀(아세트아미노펜)은 해열·진통제입니다. 성인 1회 500~1000mg, 1일 3~4회 복용이 일반적입니다. 과다복용 시 간손상 우려가 있으니 1일 최대 4000mg을 넘기지 마세요."
    } else if lower.contains("부작용") {
        "약물별로 부작용이 다릅니다. 의약품명을 알려주시면 해당 약의 주요 부작용을 안내해 드릴 수 있습니다."
    } else if lower.contains("상호작용") {
        "여러 약을 함께 복용할 때 상호작용이 발생할 수 있습니다. 이 앱의 \"상호작용\" 메뉴에서 복용 중인 약을 추가해 검사해 보세요."
    } else {
        "의약품명이나 궁금한 내용을 구체적으로 입력해 주시면 안내해 드리겠습니다. (예: 타이레놀 부작용, 이부프로펜 사용법)"
    };

    format!("{} {}", body, DISCLAIMER)
}
