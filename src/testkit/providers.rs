use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::external::llm::{LlmError, LlmProvider};
use crate::external::market_data::{ExternalPricePoint, MarketDataError, MarketDataProvider, Quote};
use crate::external::news::{select_recent, Headline, NewsError, NewsProvider};

/// Scripted quotes and histories. Unknown tickers behave like the provider
/// has never heard of them.
#[derive(Default)]
pub struct StubMarketData {
    quotes: HashMap<String, Quote>,
    histories: HashMap<String, Vec<ExternalPricePoint>>,
    failing: HashSet<String>,
}

impl StubMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, ticker: &str, name: &str, price: f64, exchange: &str) -> Self {
        self.quotes.insert(
            ticker.to_string(),
            Quote {
                name: Some(name.to_string()),
                price: Some(price),
                exchange: Some(exchange.to_string()),
            },
        );
        self
    }

    pub fn with_raw_quote(mut self, ticker: &str, quote: Quote) -> Self {
        self.quotes.insert(ticker.to_string(), quote);
        self
    }

    pub fn with_history(mut self, ticker: &str, points: Vec<ExternalPricePoint>) -> Self {
        self.histories.insert(ticker.to_string(), points);
        self
    }

    /// Every call for `ticker` fails with a network error.
    pub fn failing(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }
}

#[async_trait]
impl MarketDataProvider for StubMarketData {
    async fn get_quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        if self.failing.contains(ticker) {
            return Err(MarketDataError::Network(format!("connection reset fetching {}", ticker)));
        }
        self.quotes
            .get(ticker)
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
    }

    async fn get_history(
        &self,
        ticker: &str,
        _period: &str,
        _interval: &str,
    ) -> Result<Vec<ExternalPricePoint>, MarketDataError> {
        if self.failing.contains(ticker) {
            return Err(MarketDataError::Network(format!("connection reset fetching {}", ticker)));
        }
        match self.histories.get(ticker) {
            Some(points) if !points.is_empty() => {
                let mut points = points.clone();
                points.sort_by_key(|p| p.timestamp);
                Ok(points)
            }
            _ => Err(MarketDataError::NotFound(ticker.to_string())),
        }
    }
}

/// Returns the same headlines for every ticker and counts calls.
#[derive(Default)]
pub struct StubNews {
    headlines: Vec<Headline>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubNews {
    pub fn with_headlines(headlines: Vec<Headline>) -> Self {
        Self { headlines, ..Self::default() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsProvider for StubNews {
    async fn recent_news(
        &self,
        _ticker: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<Headline>, NewsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NewsError::Status(503));
        }
        Ok(select_recent(self.headlines.clone()))
    }
}

/// Canned completion (or failure) that records every prompt it receives.
pub struct StubLlm {
    reply: Option<String>,
    prompts: parking_lot::Mutex<Vec<String>>,
}

impl StubLlm {
    pub fn replying(reply: &str) -> Self {
        Self { reply: Some(reply.to_string()), prompts: Default::default() }
    }

    pub fn failing() -> Self {
        Self { reply: None, prompts: Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError> {
        self.prompts.lock().push(prompt);
        self.reply
            .clone()
            .ok_or_else(|| LlmError::ApiError("HTTP 500: upstream unavailable".to_string()))
    }
}
