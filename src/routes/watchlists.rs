use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, info};

use crate::errors::AppError;
use crate::middleware::auth::ScopedUser;
use crate::models::{AddWatchlistItemRequest, WatchlistChangeResponse, WatchlistInfoResponse, WatchlistResponse};
use crate::services::watchlist_service;
use crate::state::AppState;

// ==============================================================================
// Router
// ==============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/watchlist", get(get_watchlist).post(add_ticker))
        .route("/watchlist-info", get(get_watchlist_info))
        .route("/watchlist/:ticker", delete(remove_ticker))
}

// ==============================================================================
// Handlers
// ==============================================================================

async fn get_watchlist(
    State(state): State<AppState>,
    ScopedUser(user_id): ScopedUser,
) -> Result<Json<WatchlistResponse>, AppError> {
    info!("GET /watchlist - user {}", user_id);
    let watchlist = watchlist_service::list_tickers(state.store.as_ref(), user_id).await?;
    Ok(Json(WatchlistResponse { watchlist }))
}

async fn get_watchlist_info(
    State(state): State<AppState>,
    ScopedUser(user_id): ScopedUser,
) -> Result<Json<WatchlistInfoResponse>, AppError> {
    info!("GET /watchlist-info - user {}", user_id);
    let info = watchlist_service::watchlist_info(
        state.store.as_ref(),
        state.market_data.as_ref(),
        user_id,
    )
    .await
    .map_err(|e| {
        error!("Failed to build watchlist info for user {}: {}", user_id, e);
        e
    })?;
    Ok(Json(info))
}

async fn add_ticker(
    State(state): State<AppState>,
    ScopedUser(user_id): ScopedUser,
    Json(req): Json<AddWatchlistItemRequest>,
) -> Result<Json<WatchlistChangeResponse>, AppError> {
    info!("POST /watchlist - user {} adding {}", user_id, req.ticker);
    let (ticker, watchlist) = watchlist_service::add_ticker(state.store.as_ref(), user_id, req).await?;
    Ok(Json(WatchlistChangeResponse {
        message: format!("{} added to watchlist", ticker),
        watchlist,
    }))
}

async fn remove_ticker(
    State(state): State<AppState>,
    ScopedUser(user_id): ScopedUser,
    Path(ticker): Path<String>,
) -> Result<Json<WatchlistChangeResponse>, AppError> {
    info!("DELETE /watchlist/{} - user {}", ticker, user_id);
    let (ticker, watchlist) = watchlist_service::remove_ticker(state.store.as_ref(), user_id, &ticker).await?;
    Ok(Json(WatchlistChangeResponse {
        message: format!("{} removed from watchlist", ticker),
        watchlist,
    }))
}
