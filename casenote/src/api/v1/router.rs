use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let cases = Router::new()
        .route(
            "/",
            get(handlers::cases::list_cases).post(handlers::cases::create_case),
        )
        .route(
            "/{caseId}",
            get(handlers::cases::get_case)
                .patch(handlers::cases::update_case)
                .delete(handlers::cases::delete_case),
        )
        .route(
            "/{caseId}/notes",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route(
            "/{caseId}/interactions",
            get(handlers::interactions::list_interactions)
                .post(handlers::interactions::create_interaction),
        )
        .route(
            "/{caseId}/summary",
            post(handlers::summary::generate_summary),
        );

    let notes = Router::new().route(
        "/{noteId}",
        patch(handlers::notes::update_note).delete(handlers::notes::delete_note),
    );

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/cases", cases)
        .nest("/notes", notes)
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
