use chrono::{DateTime, Utc};
use medinfo_catalog::Dataset;
use medinfo_common::{AppConfig, MedInfoError, Result};
use medinfo_llm::{ChatProvider, GroqClient};
use medinfo_pill::{DataGoKrRegistry, PillIdentifier, ServiceKey};
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Shared application state
///
/// Everything here is read-only after startup.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Medicine dataset (empty when the CSV could not be loaded)
    pub dataset: Arc<Dataset>,

    /// Chat provider, when a credential is configured
    pub chat: Option<Arc<dyn ChatProvider>>,

    /// Pill identifier, when a registry key is configured
    pub pill: Option<PillIdentifier>,

    /// Outbound client for the image proxy; redirects stay on the allowed host
    pub image_client: reqwest::Client,

    /// Server start time
    pub started_at: DateTime<Utc>,
}

/// Outbound HTTP client with the configured timeout
pub fn build_http_client(config: &AppConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()
        .map_err(|e| MedInfoError::config(format!("Failed to create HTTP client: {}", e)))
}

/// Redirect hops followed by the image proxy
pub const MAX_IMAGE_REDIRECTS: usize = 10;

/// Image proxy client: every redirect hop is re-checked against the allowed host
///
/// A hop to another host is not followed; the 3xx then reaches the proxy
/// as a non-success answer.
pub fn build_image_client(config: &AppConfig) -> Result<reqwest::Client> {
    let allowed_host = config.image_allowed_host.clone();
    let policy = Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_IMAGE_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let on_allowed_host = match &allowed_host {
            Some(allowed) => attempt
                .url()
                .host_str()
                .map(|host| host.eq_ignore_ascii_case(allowed))
                .unwrap_or(false),
            None => true,
        };
        if on_allowed_host {
            attempt.follow()
        } else {
            warn!("Image redirect to {} left the allowed host", attempt.url());
            attempt.stop()
        }
    });

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .redirect(policy)
        .build()
        .map_err(|e| MedInfoError::config(format!("Failed to create image client: {}", e)))
}

impl AppState {
    /// Create application state from configuration
    ///
    /// Loads the dataset and wires the optional chat provider and pill
    /// registry; a missing credential only disables its feature.
    pub fn new(config: AppConfig) -> Result<Self> {
        let dataset = Arc::new(Dataset::load_or_empty(&config.dataset_path));
        let http = build_http_client(&config)?;

        let chat = match &config.groq_api_key {
            Some(key) => {
                let client = GroqClient::new(
                    &config.groq_base_url,
                    key,
                    &config.groq_model,
                    Duration::from_secs(config.upstream_timeout_secs),
                )?;
                Some(Arc::new(client) as Arc<dyn ChatProvider>)
            }
            None => {
                warn!("GROQ_API_KEY is not set; chat answers with canned replies only");
                None
            }
        };

        let pill = match config.data_go_kr_key.as_deref().and_then(ServiceKey::new) {
            Some(key) => {
                info!("Pill registry connected: {}", config.pill_api_url);
                let registry = DataGoKrRegistry::new(http, &config.pill_api_url, key);
                Some(PillIdentifier::new(Arc::new(registry)))
            }
            None => {
                warn!("DATA_GO_KR_KEY is not set; pill identification is disabled");
                None
            }
        };

        Self::with_parts(config, dataset, chat, pill)
    }

    /// Assemble state from prebuilt parts; the image client follows `config`
    pub fn with_parts(
        config: AppConfig,
        dataset: Arc<Dataset>,
        chat: Option<Arc<dyn ChatProvider>>,
        pill: Option<PillIdentifier>,
    ) -> Result<Self> {
        let image_client = build_image_client(&config)?;
        Ok(Self {
            config,
            dataset,
            chat,
            pill,
            image_client,
            started_at: Utc::now(),
        })
    }
}
