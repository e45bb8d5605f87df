//! Authentication context utilities.
//!
//! Resolves "is this request authenticated, and for which user" from the
//! bearer token and the session store.

use super::app_state::AppState;
use crate::models::UserId;
use crate::services::jwt_service::JwtService;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

/// Authentication context extracted from request
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: UserId,
    pub username: String,
    pub session_id: String,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        // Try Authorization header first (preferred)
        let token =
            if let Some(auth_header) = headers.get("authorization").and_then(|h| h.to_str().ok()) {
                JwtService::extract_bearer_token(auth_header)
            } else {
                headers.get("x-session-id").and_then(|h| h.to_str().ok())
            };

        let token = token.ok_or_else(|| {
            tracing::warn!("No authorization token provided");
            StatusCode::UNAUTHORIZED
        })?;

        let claims = state.jwt_service.validate_access_token(token).map_err(|e| {
            tracing::warn!("JWT validation failed: {}", e);
            StatusCode::UNAUTHORIZED
        })?;

        let user_id = claims.user_id().ok_or_else(|| {
            tracing::warn!("JWT subject '{}' is not a user id", claims.sub);
            StatusCode::UNAUTHORIZED
        })?;

        let mut sessions = state.session_store.lock().await;
        let Some(session) = sessions.get_mut(&claims.session_id) else {
            tracing::warn!("Session {} not found in store", claims.session_id);
            return Err(StatusCode::UNAUTHORIZED);
        };
        if session.user_id != user_id {
            tracing::warn!(
                "Session {} belongs to user {}, token claims {}",
                claims.session_id,
                session.user_id,
                user_id
            );
            return Err(StatusCode::UNAUTHORIZED);
        }
        session.last_activity = chrono::Utc::now();
        drop(sessions);

        Ok(AuthContext {
            user_id,
            username: claims.username,
            session_id: claims.session_id,
        })
    }
}
