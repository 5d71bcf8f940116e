use crate::infrastructure::http::controllers::access_control;
use crate::infrastructure::http::middleware::{require_auth, AppState};
use axum::{
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/organizations/:org/roles",
            get(access_control::list_roles),
        )
        .route(
            "/api/organizations/:org/roles-cache-key",
            get(access_control::get_roles_cache_key),
        )
        .route(
            "/api/organizations/:org/roles/:role",
            get(access_control::get_role),
        )
        .route(
            "/api/organizations/:org/roles/:role/subjects",
            post(access_control::add_subjects),
        )
        .route(
            "/api/organizations/:org/roles/:role/subjects/:type/:name",
            delete(access_control::remove_subject),
        )
        .route(
            "/api/organizations/:org/service-accounts/suggestions",
            get(access_control::list_service_account_suggestions),
        )
        .layer(middleware::from_fn(require_auth));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
