//! Session and token routes.
//!
//! Login itself happens outside this service; it calls [`open_session`] to
//! register a session and hand out JWTs. Tokens are only honoured while their
//! session is registered, so logout revokes them before expiry.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::post};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::app_state::AppState;
use super::auth_context::AuthContext;
use crate::models::UserId;
use crate::services::TokenPair;

/// Session storage - keeps track of active sessions for revocation
/// Key: session_id (from JWT), Value: session metadata
pub type SessionStore = Arc<Mutex<HashMap<String, SessionMetadata>>>;

/// Session metadata stored server-side (for revocation and tracking)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub user_id: UserId,
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_activity: chrono::DateTime<chrono::Utc>,
}

pub fn new_session_store() -> SessionStore {
    Arc::new(Mutex::new(HashMap::new()))
}

#[derive(Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Create the auth router
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
}

/// Drop sessions idle for longer than `max_idle`.
///
/// Every refresh token is issued at or before its session's `last_activity`,
/// so once `max_idle` is the refresh lifetime none of a pruned session's
/// tokens can still be used.
pub fn prune_expired_sessions(
    sessions: &mut HashMap<String, SessionMetadata>,
    max_idle: chrono::Duration,
    now: chrono::DateTime<chrono::Utc>,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| now - session.last_activity <= max_idle);
    before - sessions.len()
}

/// Register a new session for an already-authenticated user and issue tokens.
///
/// Expired sessions are pruned first.
pub async fn open_session(
    state: &AppState,
    user_id: UserId,
    username: &str,
) -> Result<TokenPair, String> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let tokens = state
        .jwt_service
        .generate_token_pair(user_id, username, &session_id)?;

    let now = chrono::Utc::now();
    let mut sessions = state.session_store.lock().await;
    let pruned =
        prune_expired_sessions(&mut sessions, state.jwt_service.refresh_token_lifetime(), now);
    if pruned > 0 {
        info!("Pruned {} expired sessions", pruned);
    }
    sessions.insert(
        session_id.clone(),
        SessionMetadata {
            user_id,
            username: username.to_string(),
            created_at: now,
            last_activity: now,
        },
    );
    drop(sessions);

    info!("Opened session {} for user {}", session_id, user_id);
    Ok(tokens)
}

/// POST /auth/refresh - Refresh access token using refresh token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Authentication",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Invalid refresh token or session ended")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenPair>, StatusCode> {
    let claims = state
        .jwt_service
        .validate_refresh_token(&request.refresh_token)
        .map_err(|e| {
            warn!("Invalid refresh token: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

    let mut sessions = state.session_store.lock().await;
    let Some(session) = sessions.get_mut(&claims.session_id) else {
        warn!("Session not found for refresh: {}", claims.session_id);
        return Err(StatusCode::UNAUTHORIZED);
    };

    let new_tokens = state
        .jwt_service
        .refresh_access_token(&request.refresh_token)
        .map_err(|e| {
            warn!("Failed to refresh token: {}", e);
            StatusCode::UNAUTHORIZED
        })?;
    session.last_activity = chrono::Utc::now();

    info!("Refreshed tokens for session: {}", claims.session_id);
    Ok(Json(new_tokens))
}

/// POST /auth/logout - End the caller's session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(State(state): State<AppState>, auth: AuthContext) -> StatusCode {
    state.session_store.lock().await.remove(&auth.session_id);
    info!("Logged out and revoked session: {}", auth.session_id);
    StatusCode::NO_CONTENT
}
