use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Casenote API",
        version = "1.0.0",
        description = "Medical case management with LLM-generated discharge summaries.",
    ),
    paths(
        handlers::health::health_check,
        handlers::cases::create_case,
        handlers::cases::get_case,
        handlers::cases::list_cases,
        handlers::cases::update_case,
        handlers::cases::delete_case,
        handlers::notes::create_note,
        handlers::notes::list_notes,
        handlers::notes::update_note,
        handlers::notes::delete_note,
        handlers::interactions::create_interaction,
        handlers::interactions::list_interactions,
        handlers::summary::generate_summary,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Models
        crate::models::CaseStatus,
        crate::models::Gender,
        // Cases
        dto::cases::CreateCaseRequest,
        dto::cases::UpdateCaseRequest,
        dto::cases::ListCasesQuery,
        dto::cases::CaseResponse,
        dto::cases::ListCasesResponse,
        // Notes
        dto::notes::CreateNoteRequest,
        dto::notes::UpdateNoteRequest,
        dto::notes::NoteResponse,
        dto::notes::ListNotesResponse,
        // Interactions
        dto::interactions::CreateInteractionRequest,
        dto::interactions::InteractionResponse,
        dto::interactions::ListInteractionsResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::SummarizerStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "cases", description = "Case CRUD and listing"),
        (name = "notes", description = "Visit notes attached to a case"),
        (name = "interactions", description = "Structured clinical interactions"),
        (name = "summary", description = "Summary generation and case closing"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
