use crate::config::Settings;
use crate::domain::analysis::GroundingSource;
use crate::llm::error::AnalysisError;
use crate::llm::{GenerationClient, GroundedResponse};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Fails with `Configuration` when the API key is missing, before any
    /// network call is attempted.
    pub fn from_settings(settings: &Settings) -> Result<Self, AnalysisError> {
        let api_key = settings.require_gemini_api_key()?.to_string();
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|err| {
                AnalysisError::Configuration(format!("failed to build http client: {err}"))
            })?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn headers(&self) -> Result<HeaderMap, AnalysisError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&self.api_key).map_err(|_| {
            AnalysisError::Configuration("GEMINI_API_KEY is not a valid header value".to_string())
        })?;
        headers.insert("x-goog-api-key", value);
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GroundedResponse, AnalysisError> {
        let req = GenerateContentRequest::for_prompt(prompt);
        let res = self
            .http
            .post(self.url())
            .headers(self.headers()?)
            .json(&req)
            .send()
            .await
            .map_err(|err| AnalysisError::Generation(format!("request failed: {err}")))?;

        let status = res.status();
        let text = res.text().await.map_err(|err| {
            AnalysisError::Generation(format!("failed to read response body: {err}"))
        })?;

        if !status.is_success() {
            return Err(classify_failure(status, &text));
        }

        let parsed = serde_json::from_str::<GenerateContentResponse>(&text).map_err(|err| {
            AnalysisError::Generation(format!("provider response is not valid JSON: {err}"))
        })?;
        Ok(parsed.into_grounded_response())
    }
}

/// Classifies a non-success provider response. Authentication failures are
/// recognized from the HTTP status and the structured `error.status` code,
/// never from message substrings.
fn classify_failure(status: StatusCode, body: &str) -> AnalysisError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let rejected_credential = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || envelope.as_ref().is_some_and(|e| {
            matches!(
                e.error.status.as_deref(),
                Some("UNAUTHENTICATED") | Some("PERMISSION_DENIED")
            )
        });

    let message = envelope
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    if rejected_credential {
        AnalysisError::Authentication(message)
    } else {
        AnalysisError::Generation(message)
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
}

impl GenerateContentRequest {
    fn for_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            tools: vec![Tool::GoogleSearch {}],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize)]
enum Tool {
    #[serde(rename = "google_search")]
    GoogleSearch {},
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingSource>,
}

impl GenerateContentResponse {
    fn into_grounded_response(self) -> GroundedResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            // An empty candidate list surfaces downstream as an extraction
            // failure on the empty text.
            return GroundedResponse {
                text: String::new(),
                sources: Vec::new(),
            };
        };

        let mut text = String::new();
        if let Some(content) = candidate.content {
            for part in content.parts {
                if part.text.is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&part.text);
            }
        }

        let sources = candidate
            .grounding_metadata
            .map(|meta| meta.grounding_chunks)
            .unwrap_or_default();

        GroundedResponse { text, sources }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}
