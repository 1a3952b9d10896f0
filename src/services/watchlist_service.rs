use futures::future::join_all;
use tracing::{info, warn};

use crate::db::{Store, StoreError};
use crate::errors::AppError;
use crate::external::market_data::{MarketDataProvider, Quote};
use crate::models::{
    AddWatchlistItemRequest, NewWatchlistEntry, WatchlistEntry, WatchlistInfoItem, WatchlistInfoResponse,
};
use crate::services::ticker;

pub async fn list_tickers(store: &dyn Store, user_id: i64) -> Result<Vec<String>, AppError> {
    let entries = store.list_watchlist(user_id).await?;
    Ok(entries.into_iter().map(|e| e.ticker).collect())
}

fn validate_new_entry(req: AddWatchlistItemRequest) -> Result<NewWatchlistEntry, AppError> {
    let ticker = ticker::normalize(&req.ticker)?;
    let quantity = req.quantity.unwrap_or(0);
    let purchase_price = req.purchase_price.unwrap_or(0.0);

    if quantity < 0 {
        return Err(AppError::Validation("Quantity cannot be negative".into()));
    }
    if !purchase_price.is_finite() || purchase_price < 0.0 {
        return Err(AppError::Validation("Purchase price must be a non-negative number".into()));
    }

    Ok(NewWatchlistEntry { ticker, quantity, purchase_price })
}

fn already_present(ticker: &str) -> AppError {
    AppError::Conflict(format!("{} is already in the watchlist", ticker))
}

/// Insert a ticker for `user_id` and return the user's updated ticker list.
///
/// The ticker is not checked against the market-data provider.
pub async fn add_ticker(
    store: &dyn Store,
    user_id: i64,
    req: AddWatchlistItemRequest,
) -> Result<(String, Vec<String>), AppError> {
    let entry = validate_new_entry(req)?;

    if store.find_watchlist_entry(user_id, &entry.ticker).await?.is_some() {
        warn!("User {} already watches {}", user_id, entry.ticker);
        return Err(already_present(&entry.ticker));
    }

    match store.insert_watchlist_entry(user_id, &entry).await {
        Ok(_) => {}
        Err(StoreError::Duplicate(_)) => return Err(already_present(&entry.ticker)),
        Err(e) => return Err(e.into()),
    }

    info!("User {} added {} to watchlist", user_id, entry.ticker);
    let tickers = list_tickers(store, user_id).await?;
    Ok((entry.ticker, tickers))
}

pub async fn remove_ticker(
    store: &dyn Store,
    user_id: i64,
    raw_ticker: &str,
) -> Result<(String, Vec<String>), AppError> {
    let ticker = ticker::normalize(raw_ticker)?;

    if !store.delete_watchlist_entry(user_id, &ticker).await? {
        return Err(AppError::NotFound(format!("{} is not in the watchlist", ticker)));
    }

    info!("User {} removed {} from watchlist", user_id, ticker);
    let tickers = list_tickers(store, user_id).await?;
    Ok((ticker, tickers))
}

/// Enrich every stored row with a live quote.
///
/// Rows whose quote fails or has no display name are left out and counted in
/// `omitted`; the call itself only fails when the store does.
pub async fn watchlist_info(
    store: &dyn Store,
    market_data: &dyn MarketDataProvider,
    user_id: i64,
) -> Result<WatchlistInfoResponse, AppError> {
    let entries = store.list_watchlist(user_id).await?;
    let total = entries.len();

    let quotes = join_all(entries.iter().map(|e| market_data.get_quote(&e.ticker))).await;

    let watchlist: Vec<WatchlistInfoItem> = entries
        .into_iter()
        .zip(quotes)
        .filter_map(|(entry, quote)| match quote {
            Ok(quote) => enrich(entry, quote),
            Err(e) => {
                warn!("Dropping {} from watchlist info: {}", entry.ticker, e);
                None
            }
        })
        .collect();

    let omitted = total - watchlist.len();
    info!("Watchlist info for user {}: {} rows, {} omitted", user_id, watchlist.len(), omitted);

    Ok(WatchlistInfoResponse { watchlist, omitted })
}

fn enrich(entry: WatchlistEntry, quote: Quote) -> Option<WatchlistInfoItem> {
    let Some(name) = quote.name else {
        warn!("Dropping {} from watchlist info: provider returned no name", entry.ticker);
        return None;
    };

    Some(WatchlistInfoItem {
        ticker: entry.ticker,
        name,
        price: quote.price.unwrap_or(0.0),
        exchange: quote.exchange.unwrap_or_else(|| "N/A".to_string()),
        quantity: entry.quantity,
        purchase_price: entry.purchase_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(ticker: &str, quantity: Option<i64>, price: Option<f64>) -> AddWatchlistItemRequest {
        AddWatchlistItemRequest {
            ticker: ticker.to_string(),
            quantity,
            purchase_price: price,
        }
    }

    fn entry(ticker: &str) -> WatchlistEntry {
        WatchlistEntry {
            id: 1,
            user_id: 1,
            ticker: ticker.to_string(),
            quantity: 3,
            purchase_price: 12.5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_entry_defaults_to_zero() {
        let entry = validate_new_entry(request("msft", None, None)).unwrap();
        assert_eq!(
            entry,
            NewWatchlistEntry { ticker: "MSFT".into(), quantity: 0, purchase_price: 0.0 }
        );
    }

    #[test]
    fn test_negative_holdings_rejected() {
        assert!(matches!(
            validate_new_entry(request("MSFT", Some(-1), None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_new_entry(request("MSFT", None, Some(-0.01))),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_new_entry(request("MSFT", None, Some(f64::NAN))),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_enrich_defaults_missing_price_and_exchange() {
        let quote = Quote { name: Some("Microsoft".into()), price: None, exchange: None };
        let item = enrich(entry("MSFT"), quote).unwrap();

        assert_eq!(item.price, 0.0);
        assert_eq!(item.exchange, "N/A");
        assert_eq!(item.quantity, 3);
        assert_eq!(item.purchase_price, 12.5);
    }

    #[test]
    fn test_enrich_drops_nameless_quote() {
        let quote = Quote { name: None, price: Some(10.0), exchange: Some("NMS".into()) };
        assert!(enrich(entry("MSFT"), quote).is_none());
    }
}
