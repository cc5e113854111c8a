/// Generation client — the single point of entry for Gemini API calls.
///
/// No other module may call the generative API directly. Everything goes
/// through [`ResumeGenerator`], implemented here by [`GeminiClient`].
///
/// Endpoint default: gemini-2.5-flash-preview-05-20 `generateContent`.
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::resume::GeneratedResume;

pub mod prompts;
pub mod retry;

use prompts::{resume_schema, RESUME_SYSTEM, RESUME_USER_PROMPT};
use retry::{RetryPolicy, Sleeper, TokioSleeper};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";
/// Per-attempt budget. The overall deadline is enforced by the provider.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ERROR_BODY_CHARS: usize = 512;

/// How long [`GeminiClient::new`] can take on one `generate` call when every
/// attempt times out, backoff included.
pub fn worst_case_generation_time() -> Duration {
    RetryPolicy::default().worst_case(ATTEMPT_TIMEOUT)
}

/// Coarse failure classification used for logs and outcome counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Timeout,
    Network,
    UpstreamStatus,
    Parse,
    Structure,
    Schema,
    Unexpected,
}

impl FailureKind {
    pub const ALL: [FailureKind; 7] = [
        FailureKind::Timeout,
        FailureKind::Network,
        FailureKind::UpstreamStatus,
        FailureKind::Parse,
        FailureKind::Structure,
        FailureKind::Schema,
        FailureKind::Unexpected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::UpstreamStatus => "upstream_status",
            FailureKind::Parse => "parse",
            FailureKind::Structure => "structure",
            FailureKind::Schema => "schema",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("Failed to connect to the API: {0}")]
    Network(String),

    #[error("API error (status {status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Generated content could not be parsed as JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("API returned no valid content structure: {0}")]
    Structure(String),

    #[error("Generated resume does not match the schema: {0}")]
    Schema(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GenerationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GenerationError::Timeout { .. } => FailureKind::Timeout,
            GenerationError::Network(_) => FailureKind::Network,
            GenerationError::UpstreamStatus { .. } => FailureKind::UpstreamStatus,
            GenerationError::Parse(_) => FailureKind::Parse,
            GenerationError::Structure(_) => FailureKind::Structure,
            GenerationError::Schema(_) => FailureKind::Schema,
            GenerationError::Unexpected(_) => FailureKind::Unexpected,
        }
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Timeout { .. } | GenerationError::Network(_)
        )
    }
}

/// Source of freshly generated resumes. Carried by the provider as
/// `Arc<dyn ResumeGenerator>` so tests can swap in fakes.
#[async_trait]
pub trait ResumeGenerator: Send + Sync {
    async fn generate(&self) -> Result<GeneratedResume, GenerationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    system_instruction: RequestContent<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
    }
}

fn build_request() -> GenerateContentRequest<'static> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart {
                text: RESUME_USER_PROMPT,
            }],
        }],
        system_instruction: RequestContent {
            parts: vec![RequestPart {
                text: RESUME_SYSTEM,
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: resume_schema(),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client with bounded retry on transport failures.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl GeminiClient {
    pub fn new(api_key: String, endpoint: String) -> Result<Self> {
        Self::with_options(
            api_key,
            endpoint,
            ATTEMPT_TIMEOUT,
            RetryPolicy::default(),
            Arc::new(TokioSleeper),
        )
    }

    pub fn with_options(
        api_key: String,
        endpoint: String,
        attempt_timeout: Duration,
        retry: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(attempt_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            retry,
            sleeper,
        })
    }

    async fn attempt(
        &self,
        attempt: u32,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GeneratedResume, GenerationError> {
        info!(
            attempt,
            max_attempts = self.retry.max_attempts,
            "Making API request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(e, attempt))?;

        let status = response.status();
        debug!(status = status.as_u16(), "API response received");

        if status != StatusCode::OK {
            let body = truncate(response.text().await.unwrap_or_default());
            warn!(status = status.as_u16(), "API error response: {body}");
            return Err(GenerationError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, attempt))?;

        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::Structure(format!("response envelope is not valid JSON: {e}"))
        })?;

        let text = envelope.into_text().ok_or_else(|| {
            warn!("API returned unexpected structure: {}", truncate(body.clone()));
            GenerationError::Structure("missing candidates[0].content.parts[0].text".to_string())
        })?;

        debug!(
            "Received JSON response: {}...",
            text.chars().take(100).collect::<String>()
        );

        parse_resume(&text)
    }
}

#[async_trait]
impl ResumeGenerator for GeminiClient {
    async fn generate(&self) -> Result<GeneratedResume, GenerationError> {
        let request = &build_request();
        let generated = self
            .retry
            .run(
                self.sleeper.as_ref(),
                GenerationError::is_retryable,
                move |attempt| self.attempt(attempt, request),
            )
            .await?;

        let resume = generated.resume();
        info!(name = %resume.name, title = %resume.title, "Successfully parsed generated resume");
        Ok(generated)
    }
}

/// Parses the model's text part into a schema-conforming resume. The parsed
/// JSON is kept as-is for the response.
fn parse_resume(text: &str) -> Result<GeneratedResume, GenerationError> {
    let value: Value =
        serde_json::from_str(strip_json_fences(text)).map_err(GenerationError::Parse)?;

    GeneratedResume::from_value(value).map_err(|e| GenerationError::Schema(e.to_string()))
}

/// The request URL carries the API key, so it is stripped before the error
/// is logged or stored.
fn transport_error(error: reqwest::Error, attempt: u32) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout { attempts: attempt }
    } else {
        GenerationError::Network(error.without_url().to_string())
    }
}

fn truncate(mut body: String) -> String {
    if let Some((idx, _)) = body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        body.truncate(idx);
        body.push_str("...");
    }
    body
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}
