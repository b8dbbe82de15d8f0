use crate::error::MedInfoError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Groq (OpenAI-compatible) endpoint
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat model
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// 식품의약품안전처 의약품 낱알식별정보 API
pub const DEFAULT_PILL_API_URL: &str =
    "https://apis.data.go.kr/1471000/MdcinGrnIdntfcInfoService03/getMdcinGrnIdntfcInfoList03";

/// Host serving registry pill photos
pub const DEFAULT_IMAGE_HOST: &str = "nedrug.mfds.go.kr";

/// medinfo application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Medicine dataset (CSV) path
    pub dataset_path: PathBuf,

    /// Static front-end directory
    pub static_dir: PathBuf,

    /// LLM provider API key
    #[serde(skip_serializing)]
    pub groq_api_key: Option<String>,

    /// LLM chat model name
    pub groq_model: String,

    /// LLM provider base URL
    pub groq_base_url: String,

    /// Open-data portal service key (pill registry)
    #[serde(skip_serializing)]
    pub data_go_kr_key: Option<String>,

    /// Pill registry endpoint
    pub pill_api_url: String,

    /// Only host the image proxy may fetch from (None = any http(s) host)
    pub image_allowed_host: Option<String>,

    /// Timeout for outbound HTTP calls, in seconds
    pub upstream_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3001,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
            dataset_path: PathBuf::from("./medicine_data_final_updated.csv"),
            static_dir: PathBuf::from("./public"),
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            data_go_kr_key: None,
            pill_api_url: DEFAULT_PILL_API_URL.to_string(),
            image_allowed_host: Some(DEFAULT_IMAGE_HOST.to_string()),
            upstream_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, MedInfoError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            // PORT is what hosting platforms set; SERVER_PORT wins when both exist
            server_port: std::env::var("SERVER_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            dataset_path: Self::get_env_path("MEDICINE_CSV_PATH")
                .unwrap_or(defaults.dataset_path),
            static_dir: Self::get_env_path("STATIC_DIR").unwrap_or(defaults.static_dir),
            groq_api_key: Self::get_env_secret("GROQ_API_KEY"),
            groq_model: std::env::var("GROQ_MODEL").unwrap_or(defaults.groq_model),
            groq_base_url: std::env::var("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            data_go_kr_key: Self::get_env_secret("DATA_GO_KR_KEY"),
            pill_api_url: std::env::var("PILL_API_URL").unwrap_or(defaults.pill_api_url),
            image_allowed_host: match std::env::var("IMAGE_ALLOWED_HOST") {
                Ok(host) => Self::parse_allowed_host(&host),
                Err(_) => defaults.image_allowed_host,
            },
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.upstream_timeout_secs),
        };

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get a credential; blank values count as unset
    fn get_env_secret(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// `""` and `"*"` lift the image host restriction
    pub fn parse_allowed_host(value: &str) -> Option<String> {
        let value = value.trim();
        if value.is_empty() || value == "*" {
            None
        } else {
            Some(value.to_lowercase())
        }
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), MedInfoError> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                MedInfoError::config(format!(
                    "Failed to create directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Chat assistant is available
    pub fn chat_enabled(&self) -> bool {
        self.groq_api_key.is_some()
    }

    /// Pill identification is available
    pub fn pill_enabled(&self) -> bool {
        self.data_go_kr_key.is_some()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), MedInfoError> {
        for (name, url) in [
            ("GROQ_BASE_URL", &self.groq_base_url),
            ("PILL_API_URL", &self.pill_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(MedInfoError::config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.groq_model.trim().is_empty() {
            return Err(MedInfoError::config("GROQ_MODEL cannot be empty"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(MedInfoError::config("Server port cannot be 0"));
        }

        if self.upstream_timeout_secs == 0 {
            return Err(MedInfoError::config("UPSTREAM_TIMEOUT_SECS cannot be 0"));
        }

        Ok(())
    }
}
