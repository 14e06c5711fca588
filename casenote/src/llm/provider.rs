use crate::config::{parse_summary_provider_model, SummarizerConfig};
use crate::error::{CasenoteError, Result};
use crate::llm::api::SummaryApiClient;
use crate::llm::normalize::normalize;
use crate::llm::prompts::SummaryInput;
use crate::models::{Case, Note};

/// The configured summarization backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryBackend {
    HuggingFace,
    Mistral,
    OpenAi,
    OpenRouter,
    Ollama,
    /// No backend configured; requests fail with a clear reason.
    Unavailable { reason: String },
}

impl SummaryBackend {
    fn from_model(model: &str) -> Self {
        match parse_summary_provider_model(model).0 {
            "mistral" => Self::Mistral,
            "openai" => Self::OpenAi,
            "openrouter" => Self::OpenRouter,
            "ollama" => Self::Ollama,
            _ => Self::HuggingFace,
        }
    }
}

/// Facade over the summarization pipeline: prompt construction, the
/// provider call with retry, and response normalization.
#[derive(Clone)]
pub struct SummaryProvider {
    backend: SummaryBackend,
    config: Option<SummarizerConfig>,
}

impl SummaryProvider {
    pub fn new(config: Option<&SummarizerConfig>) -> Self {
        match config {
            Some(cfg) => Self {
                backend: SummaryBackend::from_model(&cfg.model),
                config: Some(cfg.clone()),
            },
            None => Self::unavailable("SUMMARIZER_MODEL is not configured"),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: SummaryBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, SummaryBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &SummaryBackend {
        &self.backend
    }

    /// Generate the normalized summary text for a case.
    pub async fn summarize_case(&self, case: &Case, notes: &[Note]) -> Result<String> {
        let config = match (&self.backend, &self.config) {
            (SummaryBackend::Unavailable { reason }, _) => {
                return Err(CasenoteError::SummarizerUnavailable(reason.clone()));
            }
            (_, Some(config)) => config,
            (_, None) => {
                return Err(CasenoteError::SummarizerUnavailable(
                    "summarizer configuration is missing".to_string(),
                ));
            }
        };

        let client = SummaryApiClient::new(config)?;
        let input = SummaryInput::for_case(case, notes);
        let response = client.generate(&input).await?;
        normalize(&response)
    }
}
