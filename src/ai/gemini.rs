use super::model::{AiError, GenerativeModel, ModelRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Generative Language API client using structured JSON output.
pub struct GeminiModel {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiModel {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    fn build_body(request: &ModelRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.response_schema.clone(),
                thinking_config: request.thinking_budget.map(|thinking_budget| ThinkingConfig {
                    thinking_budget,
                }),
            },
        }
    }

    fn map_api_error(status: u16, body: &str) -> AiError {
        let message = serde_json::from_str::<GenerateContentResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.to_string(), |e| e.message);

        if status == 429 {
            AiError::RateLimited(message)
        } else {
            AiError::Api { status, message }
        }
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String, AiError> {
        if let Some(error) = response.error {
            return Err(AiError::Api {
                status: error.code.unwrap_or(0),
                message: error.message,
            });
        }
        let text: String = response
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AiError::InvalidResponse("empty model reply".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(&self, request: &ModelRequest) -> Result<String, AiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AiError::Config("GEMINI_API_KEY is not set".to_string()));
        };

        debug!(model = %request.model, "sending generateContent request");
        let response = self
            .client
            .post(self.build_url(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::Transport(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            error!(status = %status, "model API error");
            return Err(Self::map_api_error(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::InvalidResponse(format!("unexpected response body: {e}")))?;
        Self::extract_text(parsed)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u16>,
    message: String,
}
