use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::config::{parse_summary_provider_model, SummarizerConfig};
use crate::error::{CasenoteError, Result};
use crate::llm::prompts::{SummaryInput, SUMMARY_SYSTEM_PROMPT};
use crate::llm::response::ProviderResponse;

const HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";
const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Substring that marks a cold-start error body from the inference API.
const MODEL_LOADING_MARKER: &str = "currently loading";

/// Which request/response wire shape the provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    /// `{"inputs": ...}` against a summarization pipeline.
    Extractive,
    /// OpenAI-style `/chat/completions`.
    Chat,
}

/// How one failed attempt affects the retry loop.
enum AttemptError {
    /// Counts against `max_attempts`, retried after `retry_delay_ms`.
    Transient(CasenoteError),
    /// Model is warming up. Waits `cold_start_delay_ms` without
    /// consuming an attempt, bounded by `max_cold_start_retries`.
    ColdStart,
    /// Not worth retrying.
    Fatal(CasenoteError),
}

/// HTTP client for a single summarization provider, with retry.
#[derive(Debug)]
pub struct SummaryApiClient {
    http: reqwest::Client,
    config: SummarizerConfig,
    kind: RequestKind,
    endpoint: String,
    model: String,
}

impl SummaryApiClient {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let (provider, model) = parse_summary_provider_model(&config.model);
        let kind = match provider {
            "huggingface" => RequestKind::Extractive,
            _ => RequestKind::Chat,
        };

        let needs_key = provider != "ollama";
        if needs_key && config.api_key.is_none() {
            return Err(CasenoteError::SummarizerUnavailable(format!(
                "SUMMARIZER_API_KEY is required for the {provider} provider"
            )));
        }

        let base = config.base_url.clone().unwrap_or_else(|| {
            match provider {
                "mistral" => MISTRAL_BASE_URL,
                "openai" => OPENAI_BASE_URL,
                "openrouter" => OPENROUTER_BASE_URL,
                "ollama" => OLLAMA_BASE_URL,
                _ => HUGGINGFACE_BASE_URL,
            }
            .to_string()
        });
        let base = base.trim_end_matches('/');
        let endpoint = match kind {
            RequestKind::Extractive => format!("{base}/models/{model}"),
            RequestKind::Chat => format!("{base}/chat/completions"),
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
            kind,
            endpoint,
            model: model.to_string(),
        })
    }

    /// Run the request with retry until success, exhaustion, or a fatal
    /// provider error.
    pub async fn generate(&self, input: &SummaryInput) -> Result<ProviderResponse> {
        let body = self.build_body(input);
        let mut failures: u32 = 0;
        let mut cold_starts: u32 = 0;

        loop {
            match self.attempt(&body).await {
                Ok(response) => return Ok(response),
                Err(AttemptError::Fatal(error)) => return Err(error),
                Err(AttemptError::ColdStart) => {
                    cold_starts += 1;
                    if cold_starts > self.config.max_cold_start_retries {
                        return Err(CasenoteError::Provider {
                            status: 503,
                            message: "model is still loading after repeated waits".to_string(),
                        });
                    }
                    tracing::info!(
                        model = %self.model,
                        cold_starts,
                        "Model is loading, waiting before retry"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.cold_start_delay_ms))
                        .await;
                }
                Err(AttemptError::Transient(error)) => {
                    failures += 1;
                    if failures >= self.config.max_attempts {
                        return Err(error);
                    }
                    tracing::warn!(
                        model = %self.model,
                        attempt = failures,
                        error = %error,
                        "Transient summarizer failure, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
            }
        }
    }

    async fn attempt(&self, body: &Value) -> std::result::Result<ProviderResponse, AttemptError> {
        let mut request = self.http.post(&self.endpoint).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Transient(e.into()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AttemptError::Transient(e.into()))?;

        if status.is_success() {
            let parsed: ProviderResponse = serde_json::from_str(&text).map_err(|e| {
                AttemptError::Transient(CasenoteError::InvalidResponse(format!(
                    "unparseable provider response: {e}"
                )))
            })?;
            if parsed.text().is_none() {
                return Err(AttemptError::Transient(CasenoteError::InvalidResponse(
                    "no recognized text field in provider response".to_string(),
                )));
            }
            return Ok(parsed);
        }

        if text.contains(MODEL_LOADING_MARKER) {
            return Err(AttemptError::ColdStart);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Fatal(CasenoteError::RateLimited {
                retry_after: None,
            }));
        }

        let error = CasenoteError::Provider {
            status: status.as_u16(),
            message: truncate(&text, 200),
        };
        if status.is_server_error() {
            Err(AttemptError::Transient(error))
        } else {
            Err(AttemptError::Fatal(error))
        }
    }

    fn build_body(&self, input: &SummaryInput) -> Value {
        match self.kind {
            RequestKind::Extractive => json!({
                "inputs": input.extractive,
                "parameters": {
                    "max_length": self.config.max_length,
                    "min_length": self.config.min_length,
                    "temperature": self.config.temperature,
                    "do_sample": false,
                },
            }),
            RequestKind::Chat => json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": SUMMARY_SYSTEM_PROMPT},
                    {"role": "user", "content": input.chat},
                ],
                "temperature": self.config.temperature,
                "max_tokens": self.config.max_length,
            }),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
