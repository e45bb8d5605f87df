//! Diagram routes.
//!
//! `POST /diagrams` is the form-encoded save endpoint: without `diagram_id` it
//! creates a diagram owned by the caller, with one it updates a diagram the
//! caller owns.

use axum::{
    Form, Router,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::models::{Diagram, DiagramId, DiagramSummary, SaveDiagramForm, SaveDiagramResponse};
use crate::services::UpsertDiagram;

/// Create the diagram router
pub fn diagrams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_diagrams).post(save_diagram))
        .route("/{diagram_id}", get(get_diagram))
}

/// POST /diagrams - Create or update a diagram
#[utoipa::path(
    post,
    path = "/diagrams",
    tag = "Diagrams",
    request_body(content = SaveDiagramForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Diagram saved", body = SaveDiagramResponse),
        (status = 400, description = "Missing name or graph_json, malformed field, or undecodable form body"),
        (status = 401, description = "Not authenticated, or not the owner of the diagram"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_diagram(
    State(state): State<AppState>,
    auth: AuthContext,
    form: Result<Form<SaveDiagramForm>, FormRejection>,
) -> Result<Json<SaveDiagramResponse>, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    let request = UpsertDiagram::from_form(form)?;
    let outcome = state.diagram_service.upsert(auth.user_id, request).await?;

    Ok(Json(SaveDiagramResponse {
        id: outcome.diagram_id,
        created: outcome.created,
    }))
}

/// GET /diagrams - List the caller's diagrams
#[utoipa::path(
    get,
    path = "/diagrams",
    tag = "Diagrams",
    responses(
        (status = 200, description = "Diagrams owned by the caller", body = Vec<DiagramSummary>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_diagrams(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<DiagramSummary>>, ApiError> {
    let diagrams = state.diagram_service.list_owned(auth.user_id).await?;
    Ok(Json(diagrams.iter().map(DiagramSummary::from).collect()))
}

/// GET /diagrams/{diagram_id} - Get a diagram the caller owns or that is public
#[utoipa::path(
    get,
    path = "/diagrams/{diagram_id}",
    tag = "Diagrams",
    params(
        ("diagram_id" = i64, Path, description = "Diagram id")
    ),
    responses(
        (status = 200, description = "Diagram retrieved", body = Diagram),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorized, or no readable diagram with this id"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_diagram(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(diagram_id): Path<DiagramId>,
) -> Result<Json<Diagram>, ApiError> {
    let diagram = state.diagram_service.get(auth.user_id, diagram_id).await?;
    Ok(Json(diagram))
}
