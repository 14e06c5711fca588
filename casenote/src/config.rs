use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub rate_limit: RateLimitConfig,
    pub summary: SummaryConfig,
    pub summarizer: Option<SummarizerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Fixed-window admission control for the summary endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// Most recent notes forwarded to the provider per request.
    pub max_notes: usize,
}

/// Configuration for the external summarization provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// `provider/model`, e.g. `huggingface/t5-small` or `mistral/mistral-tiny`.
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    /// Bound on attempts consumed by transient failures.
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    /// Cold-start waits are tracked separately from failure attempts.
    pub cold_start_delay_ms: u64,
    pub max_cold_start_retries: u32,
    pub max_length: u32,
    pub min_length: u32,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("CASENOTE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("CASENOTE_PORT", 3000),
                api_keys: env::var("CASENOTE_API_KEYS")
                    .map(|keys| {
                        keys.split(',')
                            .map(str::trim)
                            .filter(|key| !key.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:casenote.db".to_string()),
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_env_or("RATE_LIMIT_MAX_REQUESTS", 3),
                window_secs: parse_env_or("RATE_LIMIT_WINDOW_SECS", 60),
            },
            summary: SummaryConfig {
                max_notes: parse_env_or("SUMMARY_MAX_NOTES", 5),
            },
            summarizer: env::var("SUMMARIZER_MODEL").ok().map(|model| SummarizerConfig {
                model,
                api_key: env::var("SUMMARIZER_API_KEY").ok(),
                base_url: env::var("SUMMARIZER_BASE_URL").ok(),
                timeout_secs: parse_env_or("SUMMARIZER_TIMEOUT_SECS", 30),
                max_attempts: parse_env_or("SUMMARIZER_MAX_ATTEMPTS", 3),
                retry_delay_ms: parse_env_or("SUMMARIZER_RETRY_DELAY_MS", 3000),
                cold_start_delay_ms: parse_env_or("SUMMARIZER_COLD_START_DELAY_MS", 5000),
                max_cold_start_retries: parse_env_or("SUMMARIZER_MAX_COLD_START_RETRIES", 5),
                max_length: parse_env_or("SUMMARIZER_MAX_LENGTH", 150),
                min_length: parse_env_or("SUMMARIZER_MIN_LENGTH", 30),
                temperature: parse_env_or("SUMMARIZER_TEMPERATURE", 0.3),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known summarization providers.
pub const KNOWN_SUMMARY_PROVIDERS: &[&str] =
    &["huggingface", "mistral", "openai", "openrouter", "ollama"];

/// Parse a model name into a (provider, model) tuple.
///
/// Prefixes are matched case-sensitively against [`KNOWN_SUMMARY_PROVIDERS`];
/// anything else (including unqualified model ids like `t5-small`) defaults
/// to the Hugging Face inference API, which is where such ids resolve.
pub fn parse_summary_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        if KNOWN_SUMMARY_PROVIDERS.contains(&prefix) {
            return (prefix, rest);
        }
    }
    ("huggingface", model)
}
