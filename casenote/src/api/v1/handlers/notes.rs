//! v1 Visit note handlers.

use axum::extract::{Path, State};
use chrono::Utc;
use validator::Validate;

use crate::api::v1::dto::{CreateNoteRequest, ListNotesResponse, NoteResponse, UpdateNoteRequest};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::db::repository::{CaseRepository, NoteRepository};
use crate::models::Note;

/// `POST /api/v1/cases/{caseId}/notes`
#[utoipa::path(
    post,
    path = "/api/v1/cases/{caseId}/notes",
    tag = "notes",
    operation_id = "notes.create",
    params(("caseId" = String, Path, description = "Case ID")),
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 404, description = "Case not found", body = ApiError),
        (status = 409, description = "Case is closed", body = ApiError),
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    axum::Json(req): axum::Json<CreateNoteRequest>,
) -> ApiResponse<NoteResponse> {
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
            format!("Case {case_id} is closed and no longer accepts notes"),
        );
    }

    let note = Note::new(
        nanoid::nanoid!(),
        case_id,
        req.content,
        req.visit_date.unwrap_or_else(Utc::now),
    );

    match NoteRepository::create(&conn, &note).await {
        Ok(()) => ApiResponse::created(NoteResponse::from(note)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/cases/{caseId}/notes`
///
/// Notes are returned in chronological visit order.
#[utoipa::path(
    get,
    path = "/api/v1/cases/{caseId}/notes",
    tag = "notes",
    operation_id = "notes.list",
    params(("caseId" = String, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Notes listed", body = ListNotesResponse),
        (status = 404, description = "Case not found", body = ApiError),
    )
)]
pub async fn list_notes(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResponse<ListNotesResponse> {
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

    match NoteRepository::list_for_case(&conn, &case_id).await {
        Ok(notes) => ApiResponse::success(ListNotesResponse {
            notes: notes.into_iter().map(NoteResponse::from).collect(),
        }),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/notes/{noteId}`
#[utoipa::path(
    patch,
    path = "/api/v1/notes/{noteId}",
    tag = "notes",
    operation_id = "notes.update",
    params(("noteId" = String, Path, description = "Note ID")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 404, description = "Note not found", body = ApiError),
        (status = 409, description = "Case is closed", body = ApiError),
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Json(req): axum::Json<UpdateNoteRequest>,
) -> ApiResponse<NoteResponse> {
    if let Err(e) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, e.to_string());
    }

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let mut note = match NoteRepository::get_by_id(&conn, &id).await {
        Ok(Some(note)) => note,
        Ok(None) => {
            return ApiResponse::error(ErrorCode::NotFound, format!("Note {id} not found"))
        }
        Err(e) => return e.into(),
    };

    if let Err(e) = ensure_case_accepts_updates(&state, &note.case_id).await {
        return e;
    }

    if let Some(content) = req.content {
        note.content = content;
    }
    if let Some(visit_date) = req.visit_date {
        note.visit_date = visit_date;
    }
    note.updated_at = Utc::now();

    match NoteRepository::update(&conn, &note).await {
        Ok(()) => ApiResponse::success(NoteResponse::from(note)),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/notes/{noteId}`
#[utoipa::path(
    delete,
    path = "/api/v1/notes/{noteId}",
    tag = "notes",
    operation_id = "notes.delete",
    params(("noteId" = String, Path, description = "Note ID")),
    responses(
        (status = 200, description = "Note deleted"),
        (status = 404, description = "Note not found", body = ApiError),
        (status = 409, description = "Case is closed", body = ApiError),
    )
)]
pub async fn delete_note(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse<()> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let note = match NoteRepository::get_by_id(&conn, &id).await {
        Ok(Some(note)) => note,
        Ok(None) => {
            return ApiResponse::error(ErrorCode::NotFound, format!("Note {id} not found"))
        }
        Err(e) => return e.into(),
    };

    if let Err(e) = ensure_case_accepts_updates(&state, &note.case_id).await {
        return e;
    }

    match NoteRepository::delete(&conn, &id).await {
        Ok(true) => ApiResponse::success(()),
        Ok(false) => ApiResponse::error(ErrorCode::NotFound, format!("Note {id} not found")),
        Err(e) => e.into(),
    }
}

/// Closed cases are immutable, including their notes.
async fn ensure_case_accepts_updates<T: serde::Serialize>(
    state: &AppState,
    case_id: &str,
) -> Result<(), ApiResponse<T>> {
    let conn = state.db.connect().map_err(ApiResponse::from)?;
    match CaseRepository::get_by_id(&conn, case_id).await {
        Ok(Some(case)) if case.status.accepts_updates() => Ok(()),
        Ok(Some(_)) => Err(ApiResponse::error(
            ErrorCode::Conflict,
            format!("Case {case_id} is closed and no longer accepts changes"),
        )),
        Ok(None) => Err(ApiResponse::error(
            ErrorCode::NotFound,
            format!("Case {case_id} not found"),
        )),
        Err(e) => Err(e.into()),
    }
}
