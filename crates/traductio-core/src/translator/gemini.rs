use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::traits::{TranslationRequest, Translator, TranslatorInfo};
use crate::config::TranslatorConfig;
use crate::error::{Error, Result};
use crate::prompt::{build_prompt, system_instruction};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERIC_SERVICE_ERROR: &str = "error communicating with the Gemini API";

/// Google Gemini `generateContent` translator
pub struct GeminiTranslator {
    client: Client,
    config: TranslatorConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl GeminiTranslator {
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::TranslationRequest(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, request: &TranslationRequest) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: build_prompt(request),
                }],
            }],
            system_instruction: Content {
                role: Some("user"),
                parts: vec![Part {
                    text: system_instruction(request.domain).to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
            },
        }
    }

    /// Make API request with retry logic.
    ///
    /// Client errors other than rate limiting are returned immediately;
    /// network failures and server errors are retried.
    async fn request_with_retry(&self, api_key: &str, body: &GenerateRequest) -> Result<String> {
        let url = self.endpoint();
        let attempts = self.config.retry_count.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            debug!("Translation request attempt {}/{} to {}", attempt + 1, attempts, url);

            let sent = self
                .client
                .post(&url)
                .header(API_KEY_HEADER, api_key)
                .json(body)
                .send()
                .await;

            match sent {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse().ok());

                        warn!("Rate limited, retry after {:?}s", retry_after);
                        last_error = Some(Error::TranslationRateLimited { retry_after });

                        if attempt + 1 < attempts {
                            let wait_secs = retry_after.unwrap_or(5);
                            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                        }
                        continue;
                    }

                    let text = response
                        .text()
                        .await
                        .map_err(|e| Error::TranslationInvalidResponse(e.to_string()))?;

                    if status.is_success() {
                        return parse_response(&text);
                    }

                    let message = service_error_message(&text);
                    warn!("Gemini API error: {} - {}", status, message);
                    if status.is_client_error() {
                        return Err(Error::TranslationService(message));
                    }
                    last_error = Some(Error::TranslationService(message));
                }
                Err(e) => {
                    warn!("Request failed: {}", e);
                    last_error = Some(if e.is_timeout() {
                        Error::TranslationTimeout
                    } else {
                        Error::TranslationRequest(e.to_string())
                    });
                }
            }

            if attempt + 1 < attempts {
                tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
            }
        }

        error!("Translation failed after {} attempts", attempts);
        Err(last_error.unwrap_or(Error::TranslationMaxRetriesExceeded))
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "Google Gemini",
        }
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        let api_key = self.api_key().ok_or(Error::TranslationMissingApiKey)?;

        if request.text.trim().is_empty() {
            return Ok(String::new());
        }

        let body = self.request_body(request);
        self.request_with_retry(api_key, &body).await
    }

    fn is_available(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Extract the first candidate's text from a success body.
fn parse_response(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| Error::TranslationInvalidResponse(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| {
            Error::TranslationInvalidResponse("no candidate text in response".to_string())
        })
}

/// The service's own error message, when the body carries one.
fn service_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SERVICE_ERROR.to_string())
}
