/// medinfo error types
#[derive(Debug, thiserror::Error)]
pub enum MedInfoError {
    /// Invalid client input (missing or malformed parameters)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A feature whose credential is not configured
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// External registry / image host failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// LLM provider failure
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM provider rate limit or quota exhausted
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Medicine dataset error
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MedInfoError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create not configured error
    pub fn not_configured<S: Into<String>>(msg: S) -> Self {
        Self::NotConfigured(msg.into())
    }

    /// Create upstream error
    pub fn upstream<S: Into<String>>(msg: S) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create LLM error
    pub fn llm<S: Into<String>>(msg: S) -> Self {
        Self::Llm(msg.into())
    }

    /// Create rate limited error
    pub fn rate_limited<S: Into<String>>(msg: S) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create dataset error
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Message shown to API clients, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput(msg)
            | Self::NotConfigured(msg)
            | Self::Upstream(msg)
            | Self::Llm(msg)
            | Self::RateLimited(msg)
            | Self::Dataset(msg)
            | Self::Config(msg) => msg.clone(),
            Self::Io(e) => e.to_string(),
            Self::Json(e) => e.to_string(),
            Self::Other(e) => e.to_string(),
        }
    }
}

// HTTP response conversion (used by the actix-web layer)
impl MedInfoError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotConfigured(_) => 503,
            Self::Upstream(_) => 502,
            Self::Llm(_) => 500,
            Self::RateLimited(_) => 429,
            Self::Dataset(_) => 500,
            Self::Config(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(MedInfoError::invalid_input("x").status_code(), 400);
        assert_eq!(MedInfoError::not_configured("x").status_code(), 503);
        assert_eq!(MedInfoError::upstream("x").status_code(), 502);
        assert_eq!(MedInfoError::llm("x").status_code(), 500);
        assert_eq!(MedInfoError::rate_limited("x").status_code(), 429);
        assert_eq!(MedInfoError::config("x").status_code(), 500);
    }

    #[test]
    fn test_message_has_no_prefix() {
        let err = MedInfoError::invalid_input("모양, 색상, 각인 중 하나 이상을 입력해 주세요.");
        assert_eq!(err.message(), "모양, 색상, 각인 중 하나 이상을 입력해 주세요.");
        assert!(err.to_string().starts_with("Invalid input"));
    }
}
