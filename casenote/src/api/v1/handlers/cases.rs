//! v1 Case handlers.

use axum::extract::{Path, State};
use axum_extra::extract::Query;
use validator::Validate;

use crate::api::v1::dto::{
    CaseResponse, CreateCaseRequest, ListCasesQuery, ListCasesResponse, UpdateCaseRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::AppState;
use crate::db::repository::CaseRepository;
use crate::models::{Case, CaseStatus};

/// `POST /api/v1/cases`
#[utoipa::path(
    post,
    path = "/api/v1/cases",
    tag = "cases",
    operation_id = "cases.create",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = CaseResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn create_case(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<CreateCaseRequest>,
) -> ApiResponse<CaseResponse> {
    if let Err(e) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, e.to_string());
    }

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let case = Case::new(
        nanoid::nanoid!(),
        req.name,
        req.age,
        req.gender,
        req.reason_for_admission,
    );

    match CaseRepository::create(&conn, &case).await {
        Ok(()) => ApiResponse::created(CaseResponse::from(case)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/cases/{caseId}`
#[utoipa::path(
    get,
    path = "/api/v1/cases/{caseId}",
    tag = "cases",
    operation_id = "cases.get",
    params(("caseId" = String, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case found", body = CaseResponse),
        (status = 404, description = "Case not found", body = ApiError),
    )
)]
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<CaseResponse> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    match CaseRepository::get_by_id(&conn, &id).await {
        Ok(Some(case)) => ApiResponse::success(CaseResponse::from(case)),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, format!("Case {id} not found")),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/cases`
#[utoipa::path(
    get,
    path = "/api/v1/cases",
    tag = "cases",
    operation_id = "cases.list",
    params(ListCasesQuery),
    responses(
        (status = 200, description = "Cases listed", body = ListCasesResponse),
    )
)]
pub async fn list_cases(
    State(state): State<AppState>,
    Query(query): Query<ListCasesQuery>,
) -> ApiResponse<ListCasesResponse> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = query.offset.unwrap_or(0);

    let cases = match CaseRepository::list(&conn, limit, offset).await {
        Ok(cases) => cases,
        Err(e) => return e.into(),
    };
    let total = match CaseRepository::count(&conn).await {
        Ok(total) => total,
        Err(e) => return e.into(),
    };

    let cases = cases.into_iter().map(CaseResponse::from).collect();
    ApiResponse::success_with_meta(
        ListCasesResponse { cases },
        ResponseMeta { total: Some(total) },
    )
}

/// `PATCH /api/v1/cases/{caseId}`
///
/// Partial update of patient details or a discharge transition. Closed
/// cases are immutable; `status: closed` is only reachable through the
/// summary endpoint.
#[utoipa::path(
    patch,
    path = "/api/v1/cases/{caseId}",
    tag = "cases",
    operation_id = "cases.update",
    params(("caseId" = String, Path, description = "Case ID")),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Case updated", body = CaseResponse),
        (status = 404, description = "Case not found", body = ApiError),
        (status = 409, description = "Case is closed", body = ApiError),
    )
)]
pub async fn update_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Json(req): axum::Json<UpdateCaseRequest>,
) -> ApiResponse<CaseResponse> {
    if let Err(e) = req.validate() {
        return ApiResponse::error(ErrorCode::InvalidRequest, e.to_string());
    }
    if req.status == Some(CaseStatus::Closed) {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            "Cases are closed by generating a summary, not by a status update",
        );
    }

    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    let mut case = match CaseRepository::get_by_id(&conn, &id).await {
        Ok(Some(case)) => case,
        Ok(None) => {
            return ApiResponse::error(ErrorCode::NotFound, format!("Case {id} not found"))
        }
        Err(e) => return e.into(),
    };

    if !case.status.accepts_updates() {
        return ApiResponse::error(ErrorCode::Conflict, format!("Case {id} is already closed"));
    }

    if let Some(name) = req.name {
        case.name = name;
    }
    if let Some(age) = req.age {
        case.age = age;
    }
    if let Some(gender) = req.gender {
        case.gender = gender;
    }
    if let Some(reason) = req.reason_for_admission {
        case.reason_for_admission = reason;
    }
    if let Some(status) = req.status {
        case.status = status;
    }
    if let Some(discharge_date) = req.discharge_date {
        case.discharge_date = Some(discharge_date);
    }
    case.updated_at = chrono::Utc::now();

    match CaseRepository::update(&conn, &case).await {
        Ok(()) => ApiResponse::success(CaseResponse::from(case)),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/cases/{caseId}`
#[utoipa::path(
    delete,
    path = "/api/v1/cases/{caseId}",
    tag = "cases",
    operation_id = "cases.delete",
    params(("caseId" = String, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case deleted"),
        (status = 404, description = "Case not found", body = ApiError),
    )
)]
pub async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    let conn = match state.db.connect() {
        Ok(conn) => conn,
        Err(e) => return e.into(),
    };

    match CaseRepository::delete(&conn, &id).await {
        Ok(true) => ApiResponse::success(()),
        Ok(false) => ApiResponse::error(ErrorCode::NotFound, format!("Case {id} not found")),
        Err(e) => e.into(),
    }
}
