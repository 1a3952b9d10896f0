use std::sync::Arc;

use crate::db::Store;
use crate::external::llm::LlmProvider;
use crate::external::market_data::MarketDataProvider;
use crate::external::news::NewsProvider;
use crate::services::session::SessionIssuer;

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub market_data: Arc<dyn MarketDataProvider>,
    /// `None` when no news API key is configured.
    pub news_provider: Option<Arc<dyn NewsProvider>>,
    /// `None` when no LLM API key is configured.
    pub llm_provider: Option<Arc<dyn LlmProvider>>,
    pub sessions: Arc<dyn SessionIssuer>,
}

impl AppState {
    pub fn news(&self) -> Option<&dyn NewsProvider> {
        self.news_provider.as_deref()
    }

    pub fn llm(&self) -> Option<&dyn LlmProvider> {
        self.llm_provider.as_deref()
    }
}
