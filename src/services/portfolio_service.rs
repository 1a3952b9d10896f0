use tracing::info;

use crate::db::{Store, StoreError};
use crate::errors::AppError;
use crate::models::{AddPortfolioItemRequest, PortfolioHolding};
use crate::services::ticker;

pub async fn fetch_holdings(store: &dyn Store, user_id: i64) -> Result<Vec<PortfolioHolding>, AppError> {
    let entries = store.list_portfolio(user_id).await?;
    Ok(entries.into_iter().map(PortfolioHolding::from).collect())
}

pub async fn add_holding(
    store: &dyn Store,
    user_id: i64,
    input: AddPortfolioItemRequest,
) -> Result<(String, Vec<PortfolioHolding>), AppError> {
    let ticker = ticker::normalize(&input.ticker)?;
    let shares = input.shares.unwrap_or(0.0);
    if !shares.is_finite() || shares < 0.0 {
        return Err(AppError::Validation("Shares must be a non-negative number".into()));
    }

    match store.insert_portfolio_entry(user_id, &ticker, shares).await {
        Ok(_) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::Conflict(format!("{} is already in the portfolio", ticker)));
        }
        Err(e) => return Err(e.into()),
    }

    info!("User {} added {} shares of {} to portfolio", user_id, shares, ticker);
    Ok((ticker, fetch_holdings(store, user_id).await?))
}

pub async fn remove_holding(
    store: &dyn Store,
    user_id: i64,
    raw_ticker: &str,
) -> Result<(String, Vec<PortfolioHolding>), AppError> {
    let ticker = ticker::normalize(raw_ticker)?;

    if !store.delete_portfolio_entry(user_id, &ticker).await? {
        return Err(AppError::NotFound(format!("{} is not in the portfolio", ticker)));
    }

    info!("User {} removed {} from portfolio", user_id, ticker);
    Ok((ticker, fetch_holdings(store, user_id).await?))
}
