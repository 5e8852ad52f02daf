/// LLM Client: the single point of entry for all Claude API calls in TalentFlow.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Résumé summaries and job matching reach the model through `TextCompleter`.
///
/// Model: claude-sonnet-4-5 (hardcoded, not configurable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls in TalentFlow.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Minimal text-in, text-out view of the model.
///
/// Carried in `AppState` as `Arc<dyn TextCompleter>` so tests can swap in fakes.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    content: Vec<ReplyBlock>,
    #[serde(default)]
    usage: Option<ReplyUsage>,
}

#[derive(Debug, Deserialize)]
struct ReplyBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesReply {
    /// Trimmed text of the first non-blank text block.
    fn into_text(self) -> Result<String, LlmError> {
        self.content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Outcome of one HTTP round trip.
#[derive(Debug)]
enum Attempt {
    Done(MessagesReply),
    Retry(LlmError),
    Fail(LlmError),
}

/// Classifies a finished response by status and body.
/// 429 and 5xx are retried; other non-2xx statuses and undecodable bodies fail.
fn settle(status: StatusCode, body: &str) -> Attempt {
    if status.is_success() {
        return match serde_json::from_str::<MessagesReply>(body) {
            Ok(reply) => Attempt::Done(reply),
            Err(e) => Attempt::Fail(LlmError::Parse(e)),
        };
    }

    let error = LlmError::Api {
        status: status.as_u16(),
        message: api_error_message(body),
    };
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Attempt::Retry(error)
    } else {
        Attempt::Fail(error)
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.saturating_sub(1).min(6))
}

/// Final error once every attempt was retried away. A trailing 429 is
/// reported as `RateLimited`.
fn exhausted(last: Option<LlmError>) -> LlmError {
    match last {
        Some(LlmError::Api { status: 429, .. }) | None => LlmError::RateLimited {
            retries: MAX_ATTEMPTS - 1,
        },
        Some(other) => other,
    }
}

/// Anthropic Messages API client with retry on rate limits, server errors and
/// transport failures.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    async fn attempt(&self, request: &MessagesRequest<'_>) -> Attempt {
        let response = match self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(LlmError::Http(e)),
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => settle(status, &body),
            Err(e) => Attempt::Retry(LlmError::Http(e)),
        }
    }

    async fn send(&self, prompt: &str, system: &str) -> Result<MessagesReply, LlmError> {
        let request = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = backoff(attempt);
                warn!("Retrying LLM call in {delay:?} (attempt {})", attempt + 1);
                tokio::time::sleep(delay).await;
            }

            match self.attempt(&request).await {
                Attempt::Done(reply) => {
                    if let Some(usage) = &reply.usage {
                        debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "LLM call succeeded"
                        );
                    }
                    return Ok(reply);
                }
                Attempt::Retry(e) => {
                    warn!("LLM call failed: {e}");
                    last_error = Some(e);
                }
                Attempt::Fail(e) => return Err(e),
            }
        }

        Err(exhausted(last_error))
    }
}

#[async_trait]
impl TextCompleter for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.send(prompt, system).await?.into_text()
    }
}

/// Strips a ```json or bare ``` fence from LLM output. An unterminated fence
/// keeps everything after the opener.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
