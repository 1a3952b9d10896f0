use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, MessageResponse, SignupRequest};
use crate::services::auth_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(data): Json<SignupRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    info!("POST /signup - Registering {}", data.email.trim());
    auth_service::signup(state.store.as_ref(), data).await
        .map_err(|e| {
            if matches!(e, AppError::Db(_) | AppError::Internal(_)) {
                error!("Signup failed: {}", e);
            }
            e
        })?;
    Ok(Json(MessageResponse::new("User created successfully")))
}

/// Returns the bare user id (what existing clients keep as their session key)
/// plus a signed token that can be sent back as `Authorization: Bearer`.
pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("POST /login - Login attempt for {}", data.email.trim());
    let response = auth_service::login(state.store.as_ref(), state.sessions.as_ref(), data).await?;
    Ok(Json(response))
}
