//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod auth;
pub mod auth_context;
pub mod diagrams;
pub mod error;
pub mod openapi;

use axum::{Router, middleware::from_fn_with_state, response::Json, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::middleware::{create_cors_layer, rate_limit_middleware};
use crate::storage::StorageError;

pub use app_state::AppState;
pub use auth::open_session;
pub use error::ApiError;

/// Create the API router combining all route modules.
///
/// State is applied by callers (see [`build_app`]).
pub fn create_api_router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/diagrams", diagrams::diagrams_router())
        .nest("/auth", auth::auth_router())
        .merge(openapi::openapi_router())
        .layer(from_fn_with_state(
            app_state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
}

/// Build the complete application: health checks, `/api/v1` routes and middleware.
pub fn build_app(app_state: AppState, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/health", get(health_check))
        .nest("/api/v1", create_api_router(app_state.clone()))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_allowed_origins)),
        )
}

/// Create the application state backed by in-memory storage.
pub fn create_app_state(config: &ApiConfig) -> AppState {
    AppState::new(config)
}

/// Create the application state with storage initialization (async).
///
/// This is the preferred method for production use.
pub async fn create_app_state_with_storage(config: &ApiConfig) -> Result<AppState, StorageError> {
    let mut state = AppState::new(config);
    state.init_storage(config).await?;
    Ok(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "diagram-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
