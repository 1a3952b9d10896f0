use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// Watchlist Models
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub ticker: String,
    pub quantity: i64,
    pub purchase_price: f64,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new watchlist row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatchlistEntry {
    pub ticker: String,
    pub quantity: i64,
    pub purchase_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddWatchlistItemRequest {
    pub ticker: String,
    pub quantity: Option<i64>,
    pub purchase_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchlistResponse {
    pub watchlist: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchlistChangeResponse {
    pub message: String,
    pub watchlist: Vec<String>,
}

// ==============================================================================
// Enriched rows
// ==============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistInfoItem {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    pub exchange: String,
    pub quantity: i64,
    pub purchase_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchlistInfoResponse {
    pub watchlist: Vec<WatchlistInfoItem>,
    /// Rows left out because the market-data provider failed for them.
    pub omitted: usize,
}
