use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("model API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
    #[error("model client misconfigured: {0}")]
    Config(String),
}

impl AiError {
    /// Status 429, or an API or transport message mentioning 429.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            AiError::RateLimited(_) => true,
            AiError::Api { status, message } => *status == 429 || message.contains("429"),
            AiError::Transport(message) => message.contains("429"),
            AiError::InvalidResponse(_) | AiError::Config(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
    /// Structured-output schema the reply must conform to.
    pub response_schema: Value,
    pub thinking_budget: Option<u32>,
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the reply text, expected to be JSON matching the schema.
    async fn generate(&self, request: &ModelRequest) -> Result<String, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_detection() {
        assert!(AiError::RateLimited("quota".into()).is_rate_limit());
        assert!(AiError::Api { status: 429, message: "slow down".into() }.is_rate_limit());
        assert!(AiError::Transport("got HTTP 429 from proxy".into()).is_rate_limit());
        assert!(!AiError::Api { status: 500, message: "boom".into() }.is_rate_limit());
        assert!(!AiError::InvalidResponse("expected array".into()).is_rate_limit());
    }

    #[test]
    fn parse_positions_are_not_rate_limits() {
        let invalid = AiError::InvalidResponse(
            "unexpected response body: expected `,` or `]` at line 1 column 429".into(),
        );
        assert!(!invalid.is_rate_limit());
        assert!(!AiError::Config("port 4290 unreachable".into()).is_rate_limit());
    }
}
