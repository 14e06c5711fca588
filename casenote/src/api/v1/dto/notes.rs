//! Visit note request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Note;

/// Request body for `POST /v1/cases/{caseId}/notes`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    /// Free-text visit note.
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    /// When the visit took place. Defaults to now.
    #[schema(value_type = Option<String>)]
    pub visit_date: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /v1/notes/{noteId}`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[validate(length(min = 1, max = 10000))]
    pub content: Option<String>,
    #[schema(value_type = Option<String>)]
    pub visit_date: Option<DateTime<Utc>>,
}

/// Full note response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Unique note ID (nanoid, 21 chars).
    pub note_id: String,
    pub case_id: String,
    pub content: String,
    #[schema(value_type = String)]
    pub visit_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            note_id: note.id,
            case_id: note.case_id,
            content: note.content,
            visit_date: note.visit_date,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Response body for `GET /v1/cases/{caseId}/notes`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ListNotesResponse {
    pub notes: Vec<NoteResponse>,
}
