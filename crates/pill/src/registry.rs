use async_trait::async_trait;
use medinfo_common::{MedInfoError, Result};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, error};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) medinfo/0.1";

const PARSE_ERROR_MESSAGE: &str = "공공데이터 API 응답 형식 오류. 잠시 후 다시 시도해 주세요.";

/// One page of raw registry items
#[derive(Debug, Clone, Default)]
pub struct RegistryPage {
    pub items: Vec<Value>,
    pub total_count: Option<u64>,
}

/// Source of pill appearance records
#[async_trait]
pub trait PillRegistry: Send + Sync {
    /// Fetch page `page_no` (1-based) of `num_of_rows` records
    async fn fetch_page(&self, page_no: u32, num_of_rows: u32) -> Result<RegistryPage>;
}

/// Open-data portal service key
///
/// The portal hands out the same key in an "Encoding" form (already
/// percent-encoded) and a "Decoding" form; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceKey(String);

impl ServiceKey {
    /// Clean a pasted key (surrounding whitespace, line breaks, quotes)
    pub fn new(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n' | '"' | '\''))
            .collect();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Key already percent-encoded (the portal's "Encoding" key)
    pub fn is_pre_encoded(&self) -> bool {
        self.0.contains('%')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 공공데이터포털 낱알식별정보 client
#[derive(Debug, Clone)]
pub struct DataGoKrRegistry {
    client: Client,
    api_url: String,
    service_key: ServiceKey,
}

impl DataGoKrRegistry {
    pub fn new(client: Client, api_url: impl Into<String>, service_key: ServiceKey) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            service_key,
        }
    }

    /// Request URL for one page
    pub fn page_url(&self, page_no: u32, num_of_rows: u32) -> Result<Url> {
        let rows = num_of_rows.to_string();
        let page = page_no.to_string();

        let url = if self.service_key.is_pre_encoded() {
            // Encoding key goes in verbatim; re-encoding would double the '%'
            Url::parse(&format!(
                "{}?serviceKey={}&numOfRows={}&pageNo={}&type=json",
                self.api_url,
                self.service_key.as_str(),
                rows,
                page
            ))
        } else {
            Url::parse_with_params(
                &self.api_url,
                &[
                    ("serviceKey", self.service_key.as_str()),
                    ("numOfRows", rows.as_str()),
                    ("pageNo", page.as_str()),
                    ("type", "json"),
                ],
            )
        };

        url.map_err(|e| MedInfoError::config(format!("Invalid pill registry URL: {}", e)))
    }
}

#[async_trait]
impl PillRegistry for DataGoKrRegistry {
    async fn fetch_page(&self, page_no: u32, num_of_rows: u32) -> Result<RegistryPage> {
        let url = self.page_url(page_no, num_of_rows)?;
        debug!("Fetching pill registry page {} ({} rows)", page_no, num_of_rows);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                error!("Pill registry request failed: {}", e);
                MedInfoError::upstream(format!("공공데이터 API 요청 실패: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Pill registry body read failed: {}", e);
            MedInfoError::upstream(PARSE_ERROR_MESSAGE)
        })?;

        if !status.is_success() {
            error!(
                "Pill registry HTTP {}: {}",
                status.as_u16(),
                text.chars().take(500).collect::<String>()
            );
            return Err(MedInfoError::upstream(format!(
                "공공데이터 API 요청 실패({}). 공공데이터포털 마이페이지에서 '일반 인증키(Encoding)' 또는 '일반 인증키(Decoding)'를 복사해 .env에 넣어 보세요. 활용신청 승인 여부도 확인하세요.",
                status.as_u16()
            )));
        }

        parse_registry_body(&text)
    }
}

/// First present value among JSON pointers
fn first_pointer<'a>(data: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .filter_map(|p| data.pointer(p))
        .find(|v| !v.is_null())
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a registry response body
///
/// Handles both the `response.{header,body}` envelope and a bare
/// `{header,body}`; `items` may be `{ item: [...] }`, `{ item: {...} }`, an
/// array, or empty. A `resultCode` other than `00`/`0` is an upstream error
/// even on HTTP 200.
pub fn parse_registry_body(text: &str) -> Result<RegistryPage> {
    let data: Value = serde_json::from_str(text).map_err(|e| {
        error!(
            "Pill registry response parse error: {} ({})",
            e,
            text.chars().take(300).collect::<String>()
        );
        MedInfoError::upstream(PARSE_ERROR_MESSAGE)
    })?;

    let result_code = first_pointer(
        &data,
        &["/response/header/resultCode", "/header/resultCode", "/resultCode"],
    )
    .and_then(value_text)
    .filter(|code| !code.is_empty());

    if let Some(code) = result_code {
        if code != "00" && code != "0" {
            let message = first_pointer(
                &data,
                &["/response/header/resultMsg", "/header/resultMsg", "/resultMsg"],
            )
            .and_then(value_text)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| {
                "공공데이터 API 오류. 인증키(일반 인증키 Decoding)와 활용신청을 확인해 주세요."
                    .to_string()
            });
            error!("Pill registry result code {}: {}", code, message);
            return Err(MedInfoError::upstream(message));
        }
    }

    let body = first_pointer(&data, &["/response/body", "/body"]);

    let items = match body.and_then(|b| b.get("items")) {
        Some(Value::Object(map)) if map.contains_key("item") => map.get("item"),
        other => other,
    };
    let items = match items {
        Some(Value::Array(list)) => list.clone(),
        Some(Value::Object(item)) => vec![Value::Object(item.clone())],
        _ => Vec::new(),
    };

    let total_count = body
        .and_then(|b| b.get("totalCount"))
        .and_then(value_text)
        .and_then(|s| s.parse().ok());

    Ok(RegistryPage { items, total_count })
}
