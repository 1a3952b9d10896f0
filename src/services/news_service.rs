use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::external::news::{Headline, NewsProvider};
use crate::models::NewsItem;

/// Look-back window for the news endpoint.
pub const NEWS_WINDOW_DAYS: i64 = 7;

/// Up to `limit` headlines from the last `days` days, newest first.
///
/// Provider failures and a missing provider both yield an empty list.
pub async fn recent_headlines(
    provider: Option<&dyn NewsProvider>,
    ticker: &str,
    days: i64,
    limit: usize,
) -> Vec<Headline> {
    let Some(provider) = provider else {
        info!("News provider not configured, no headlines for {}", ticker);
        return Vec::new();
    };

    let to = Utc::now().date_naive();
    let from = to - Duration::days(days);

    match provider.recent_news(ticker, from, to).await {
        Ok(mut headlines) => {
            headlines.truncate(limit);
            headlines
        }
        Err(e) => {
            warn!("News lookup for {} failed: {}", ticker, e);
            Vec::new()
        }
    }
}

pub async fn stock_news(provider: Option<&dyn NewsProvider>, ticker: &str) -> Vec<NewsItem> {
    recent_headlines(provider, ticker, NEWS_WINDOW_DAYS, crate::external::news::MAX_HEADLINES)
        .await
        .into_iter()
        .map(|h| NewsItem { title: h.headline, url: h.url })
        .collect()
}
