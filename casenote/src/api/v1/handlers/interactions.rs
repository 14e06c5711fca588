//! v1 Interaction handlers.

use axum::extract::{Path, State};
use chrono::Utc;
use validator::Validate;

use crate::api::v1::dto::{
    CreateInteractionRequest, InteractionResponse, ListInteractionsResponse,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::db::repository::{CaseRepository, InteractionRepository};
use crate::models::Interaction;

/// `POST /api/v1/cases/{caseId}/interactions`
#[utoipa::path(
    post,
    path = "/api/v1/cases/{caseId}/interactions",
    tag = "interactions",
    operation_id = "interactions.create",
    params(("caseId" = String, Path, description = "Case ID")),
    request_body = CreateInteractionRequest,
    responses(
        (status = 201, description = "Interaction recorded", body = InteractionResponse),
        (status = 404, description = "Case not found", body = ApiError),
        (status = 409, description = "Case is closed", body = ApiError),
    )
)]
pub async fn create_interaction(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    axum::Json(req): axum::Json<CreateInteractionRequest>,
) -> ApiResponse<InteractionResponse> {
    if let Err(e) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, e.to_string());
    }

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let case = match CaseRepository::get_by_id(&conn, &case_id).await {
        Ok(Some(case)) => case,
        Ok(None) => {
            return ApiResponse::error(ErrorCode::NotFound, format!("Case {case_id} not found"))
        }
        Err(e) => return e.into(),
    };

    if !case.status.accepts_updates() {
        return ApiResponse::error(
            ErrorCode::Conflict,
            format!("Case {case_id} is closed and no longer accepts interactions"),
        );
    }

    let mut interaction = Interaction::new(
        nanoid::nanoid!(),
        case_id,
        req.kind,
        req.date.unwrap_or_else(Utc::now),
        req.notes,
    );
    interaction.diagnosis = req.diagnosis;
    interaction.prescription = req.prescription;

    match InteractionRepository::create(&conn, &interaction).await {
        Ok(()) => ApiResponse::created(InteractionResponse::from(interaction)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/cases/{caseId}/interactions`
#[utoipa::path(
    get,
    path = "/api/v1/cases/{caseId}/interactions",
    tag = "interactions",
    operation_id = "interactions.list",
    params(("caseId" = String, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Interactions listed", body = ListInteractionsResponse),
        (status = 404, description = "Case not found", body = ApiError),
    )
)]
pub async fn list_interactions(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResponse<ListInteractionsResponse> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    match CaseRepository::get_by_id(&conn, &case_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return ApiResponse::error(ErrorCode::NotFound, format!("Case {case_id} not found"))
        }
        Err(e) => return e.into(),
    }

    match InteractionRepository::list_for_case(&conn, &case_id).await {
        Ok(interactions) => ApiResponse::success(ListInteractionsResponse {
            interactions: interactions
                .into_iter()
                .map(InteractionResponse::from)
                .collect(),
        }),
        Err(e) => e.into(),
    }
}
