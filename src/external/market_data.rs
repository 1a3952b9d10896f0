use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPricePoint {
    /// Bar time in the exchange's local offset, so the calendar date is the trading day.
    pub timestamp: DateTime<FixedOffset>,
    pub close: f64,
}

/// Snapshot of a ticker as reported by the provider. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub exchange: Option<String>,
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("no data found for {0}")]
    NotFound(String),
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn get_quote(&self, ticker: &str) -> Result<Quote, MarketDataError>;

    /// Close prices for `ticker`, oldest first. `period` and `interval` are
    /// handed to the provider untouched. An empty series is
    /// [`MarketDataError::NotFound`].
    async fn get_history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<ExternalPricePoint>, MarketDataError>;
}
