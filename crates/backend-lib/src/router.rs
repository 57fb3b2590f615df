// ============================
// jobboard-backend-lib/src/router.rs
// ============================
//! HTTP router.
use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AllowedOrigins, CorsSettings};
use crate::handlers::{auth, health, jobs};
use crate::AppState;

/// Create the HTTP router with CORS and request tracing
pub fn create_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.settings.cors)?;

    Ok(Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/reset-password", post(auth::reset_password))
        .route("/change-password", post(auth::change_password))
        .route("/me", get(auth::me))
        .route("/jobs", get(jobs::list_jobs).post(jobs::post_job))
        .route("/jobs/{id}", delete(jobs::delete_job))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Credentials are only allowed with an explicit origin list
pub fn cors_layer(settings: &CorsSettings) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Ok(match settings.origins()? {
        AllowedOrigins::Any => cors.allow_origin(AllowOrigin::any()),
        AllowedOrigins::List(origins) => cors
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true),
    })
}
