use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A holding of a ticker owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioEntry {
    pub id: i64,
    pub user_id: i64,
    pub ticker: String,
    pub shares: f64,
    pub created_at: chrono::DateTime<chrono::Utc>
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddPortfolioItemRequest {
    pub ticker: String,
    pub shares: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioHolding {
    pub ticker: String,
    pub shares: f64,
}

impl From<PortfolioEntry> for PortfolioHolding {
    fn from(entry: PortfolioEntry) -> Self {
        Self {
            ticker: entry.ticker,
            shares: entry.shares,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioResponse {
    pub portfolio: Vec<PortfolioHolding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioChangeResponse {
    pub message: String,
    pub portfolio: Vec<PortfolioHolding>,
}
