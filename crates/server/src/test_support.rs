//! In-memory fakes shared by route tests

use actix_web::web;
use async_trait::async_trait;
use medinfo_catalog::{Dataset, DrugRecord};
use medinfo_common::{AppConfig, MedInfoError, Result};
use medinfo_llm::{ChatMessage, ChatProvider};
use medinfo_pill::{PillIdentifier, PillRegistry, RegistryPage};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::state::AppState;

/// What the fake provider answers
pub enum FakeOutcome {
    Reply(&'static str),
    RateLimited,
    Fail(&'static str),
}

/// Chat provider that records what it was sent
pub struct FakeChat {
    outcome: FakeOutcome,
    calls: AtomicU32,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl FakeChat {
    pub fn new(outcome: FakeOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicU32::new(0),
            last_messages: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages;
        match &self.outcome {
            FakeOutcome::Reply(reply) => Ok(reply.to_string()),
            FakeOutcome::RateLimited => Err(MedInfoError::rate_limited("HTTP 429")),
            FakeOutcome::Fail(msg) => Err(MedInfoError::llm(*msg)),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// Registry serving one short page, or failing
pub struct StaticRegistry {
    items: Vec<Value>,
    fail: bool,
}

impl StaticRegistry {
    pub fn identifier(items: Vec<Value>) -> PillIdentifier {
        PillIdentifier::new(Arc::new(Self { items, fail: false }))
    }

    pub fn failing() -> PillIdentifier {
        PillIdentifier::new(Arc::new(Self {
            items: Vec::new(),
            fail: true,
        }))
    }
}

#[async_trait]
impl PillRegistry for StaticRegistry {
    async fn fetch_page(&self, page_no: u32, _num_of_rows: u32) -> Result<RegistryPage> {
        if self.fail {
            return Err(MedInfoError::upstream("공공데이터 API 요청 실패(500)"));
        }
        let items = if page_no == 1 { self.items.clone() } else { Vec::new() };
        Ok(RegistryPage {
            items,
            total_count: None,
        })
    }
}

fn record(name: &str, classification: &str, ingredient: &str, efficacy: &str) -> DrugRecord {
    DrugRecord {
        name: name.to_string(),
        classification: classification.to_string(),
        ingredient: ingredient.to_string(),
        efficacy: efficacy.to_string(),
        ..Default::default()
    }
}

pub fn sample_dataset() -> Dataset {
    Dataset::from_records(vec![
        record("베아제정", "소화제", "판크레아틴", "소화불량"),
        record("타이레놀정500밀리그람", "해열진통제", "아세트아미노펜", "두통, 치통, 발열"),
        record("애드빌정", "해열진통제", "이부프로펜", "두통, 생리통"),
    ])
}

pub fn state_with(
    dataset: Dataset,
    chat: Option<Arc<dyn ChatProvider>>,
    pill: Option<PillIdentifier>,
) -> web::Data<Arc<AppState>> {
    state_with_config(AppConfig::default(), dataset, chat, pill)
}

pub fn state_with_config(
    config: AppConfig,
    dataset: Dataset,
    chat: Option<Arc<dyn ChatProvider>>,
    pill: Option<PillIdentifier>,
) -> web::Data<Arc<AppState>> {
    let state = AppState::with_parts(config, Arc::new(dataset), chat, pill).unwrap();
    web::Data::new(Arc::new(state))
}
