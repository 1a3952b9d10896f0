//! In-memory doubles for the store and the external providers.
//!
//! Compiled for unit tests and behind the `testkit` feature for the
//! integration tests in `tests/`.

pub mod providers;
pub mod store;

use std::sync::Arc;

use crate::services::session::JwtSessionIssuer;
use crate::state::AppState;

pub use providers::{StubLlm, StubMarketData, StubNews};
pub use store::MemoryStore;

pub const SESSION_SECRET: &str = "testkit-session-secret";

/// Wire the doubles into an [`AppState`]. Pass `None` to leave a provider unconfigured.
pub fn app_state(
    store: Arc<MemoryStore>,
    market_data: Arc<StubMarketData>,
    news: Option<Arc<StubNews>>,
    llm: Option<Arc<StubLlm>>,
) -> AppState {
    AppState {
        store,
        market_data,
        news_provider: news.map(|n| n as _),
        llm_provider: llm.map(|l| l as _),
        sessions: Arc::new(JwtSessionIssuer::new(SESSION_SECRET, chrono::Duration::hours(1))),
    }
}
