//! Interaction request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Interaction;

/// Request body for `POST /v1/cases/{caseId}/interactions`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    /// Interaction kind, e.g. `consultation`, `follow-up`, `procedure`.
    #[validate(length(min = 1, max = 100))]
    pub kind: String,
    /// When the interaction took place. Defaults to now.
    #[schema(value_type = Option<String>)]
    pub date: Option<DateTime<Utc>>,
    /// Clinical notes for this interaction.
    #[validate(length(min = 1, max = 10000))]
    pub notes: String,
    #[validate(length(max = 2000))]
    pub diagnosis: Option<String>,
    #[validate(length(max = 2000))]
    pub prescription: Option<String>,
}

/// Full interaction response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionResponse {
    /// Unique interaction ID (nanoid, 21 chars).
    pub interaction_id: String,
    pub case_id: String,
    pub kind: String,
    #[schema(value_type = String)]
    pub date: DateTime<Utc>,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Interaction> for InteractionResponse {
    fn from(interaction: Interaction) -> Self {
        Self {
            interaction_id: interaction.id,
            case_id: interaction.case_id,
            kind: interaction.kind,
            date: interaction.date,
            notes: interaction.notes,
            diagnosis: interaction.diagnosis,
            prescription: interaction.prescription,
            created_at: interaction.created_at,
            updated_at: interaction.updated_at,
        }
    }
}

/// Response body for `GET /v1/cases/{caseId}/interactions`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ListInteractionsResponse {
    pub interactions: Vec<InteractionResponse>,
}
