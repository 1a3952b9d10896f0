use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::middleware::auth::ScopedUser;
use crate::models::{AddPortfolioItemRequest, PortfolioChangeResponse, PortfolioResponse};
use crate::services::portfolio_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/portfolio", get(fetch_portfolio).post(add_holding))
        .route("/portfolio/:ticker", delete(remove_holding))
}

pub async fn fetch_portfolio(
    State(state): State<AppState>,
    ScopedUser(user_id): ScopedUser,
) -> Result<Json<PortfolioResponse>, AppError> {
    info!("GET /portfolio - user {}", user_id);
    let portfolio = portfolio_service::fetch_holdings(state.store.as_ref(), user_id).await?;
    Ok(Json(PortfolioResponse { portfolio }))
}

pub async fn add_holding(
    State(state): State<AppState>,
    ScopedUser(user_id): ScopedUser,
    Json(data): Json<AddPortfolioItemRequest>,
) -> Result<Json<PortfolioChangeResponse>, AppError> {
    info!("POST /portfolio - user {} adding {}", user_id, data.ticker);
    let (ticker, portfolio) = portfolio_service::add_holding(state.store.as_ref(), user_id, data).await?;
    Ok(Json(PortfolioChangeResponse {
        message: format!("{} added to portfolio", ticker),
        portfolio,
    }))
}

pub async fn remove_holding(
    State(state): State<AppState>,
    ScopedUser(user_id): ScopedUser,
    Path(ticker): Path<String>,
) -> Result<Json<PortfolioChangeResponse>, AppError> {
    info!("DELETE /portfolio/{} - user {}", ticker, user_id);
    let (ticker, portfolio) = portfolio_service::remove_holding(state.store.as_ref(), user_id, &ticker).await?;
    Ok(Json(PortfolioChangeResponse {
        message: format!("{} removed from portfolio", ticker),
        portfolio,
    }))
}
