//! Case request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Case, CaseStatus, Gender};

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/cases`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    /// Patient name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Patient age in years.
    #[validate(range(min = 0, max = 150))]
    pub age: i64,
    pub gender: Gender,
    /// Presenting complaint recorded at admission.
    #[validate(length(min = 1, max = 2000))]
    pub reason_for_admission: String,
}

/// Request body for `PATCH /v1/cases/{caseId}`. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaseRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    #[validate(length(min = 1, max = 2000))]
    pub reason_for_admission: Option<String>,
    /// Status transition. `closed` is not accepted here; closing happens
    /// through the summary endpoint.
    pub status: Option<CaseStatus>,
    /// Discharge timestamp, usually set together with `status: discharged`.
    #[schema(value_type = Option<String>)]
    pub discharge_date: Option<DateTime<Utc>>,
}

/// Query parameters for `GET /v1/cases`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListCasesQuery {
    /// Maximum results per page (default 20, max 100).
    pub limit: Option<u32>,
    /// Number of cases to skip.
    pub offset: Option<u32>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Full case response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseResponse {
    /// Unique case ID (nanoid, 21 chars).
    pub case_id: String,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub reason_for_admission: String,
    pub status: CaseStatus,
    /// Generated summary. Present only on closed cases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub discharge_date: Option<DateTime<Utc>>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Case> for CaseResponse {
    fn from(case: Case) -> Self {
        Self {
            case_id: case.id,
            name: case.name,
            age: case.age,
            gender: case.gender,
            reason_for_admission: case.reason_for_admission,
            status: case.status,
            summary: case.summary,
            discharge_date: case.discharge_date,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Response body for `GET /v1/cases`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ListCasesResponse {
    pub cases: Vec<CaseResponse>,
}
