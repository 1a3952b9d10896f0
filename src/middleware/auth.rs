use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use crate::errors::AppError;
use crate::models::UserQuery;
use crate::state::AppState;

/// The user a request acts for, taken from `?user_id=`.
///
/// When an `Authorization: Bearer` token is present it must be valid and
/// issued to that same user; without the header the query parameter is
/// trusted as-is.
pub struct ScopedUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for ScopedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<UserQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(ScopedUser(query.user_id));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let token_user = state.sessions.verify(token.trim())?;
        if token_user != query.user_id {
            warn!("Session for user {} used to access user {}", token_user, query.user_id);
            return Err(AppError::Unauthorized);
        }

        Ok(ScopedUser(query.user_id))
    }
}
