//! v1 Summary generation handler.

use axum::extract::{Path, State};

use crate::api::v1::dto::CaseResponse;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `POST /api/v1/cases/{caseId}/summary`
///
/// Generates a summary from the case's most recent visit notes and closes
/// the case. Requests beyond the rate-limit window are rejected with 429,
/// and a case can only be closed once (409 on repeat).
#[utoipa::path(
    post,
    path = "/api/v1/cases/{caseId}/summary",
    tag = "summary",
    operation_id = "cases.summarize",
    params(("caseId" = String, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case closed with generated summary", body = CaseResponse),
        (status = 404, description = "Case not found", body = ApiError),
        (status = 409, description = "Case is already closed", body = ApiError),
        (status = 429, description = "Rate limit exceeded", body = ApiError),
        (status = 500, description = "Summarizer unavailable or failed", body = ApiError),
    )
)]
pub async fn generate_summary(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResponse<CaseResponse> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    match state.summary.summarize_and_close(&conn, &case_id).await {
        Ok(case) => ApiResponse::success(CaseResponse::from(case)),
        Err(e) => e.into(),
    }
}
