use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::llm::SummaryBackend;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub summarizer: SummarizerStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SummarizerStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let db_status = match check_database(&state).await {
        Ok(_) => DatabaseStatus {
            status: "ok".to_string(),
        },
        Err(_) => DatabaseStatus {
            status: "error".to_string(),
        },
    };

    let summarizer_status = if state.summarizer.is_available() {
        let provider = match state.summarizer.backend() {
            SummaryBackend::HuggingFace => "huggingface",
            SummaryBackend::Mistral => "mistral",
            SummaryBackend::OpenAi => "openai",
            SummaryBackend::OpenRouter => "openrouter",
            SummaryBackend::Ollama => "ollama",
            SummaryBackend::Unavailable { .. } => "unavailable",
        };
        let model = state.config.summarizer.as_ref().map(|c| c.model.clone());
        SummarizerStatus {
            status: "available".to_string(),
            provider: Some(provider.to_string()),
            model,
        }
    } else {
        SummarizerStatus {
            status: "unavailable".to_string(),
            provider: None,
            model: None,
        }
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        summarizer: summarizer_status,
    })
}

async fn check_database(state: &AppState) -> crate::error::Result<()> {
    let conn = state.db.connect()?;
    conn.query("SELECT 1", ()).await?;
    Ok(())
}
