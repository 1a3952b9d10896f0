use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Most headlines any news query returns.
pub const MAX_HEADLINES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub headline: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("network error: {0}")]
    Network(String),

    #[error("news provider returned HTTP {0}")]
    Status(u16),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Trait for news providers
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Headlines about `ticker` published between `from` and `to` (inclusive),
    /// most recent first, at most [`MAX_HEADLINES`], each with a non-empty
    /// headline and URL.
    async fn recent_news(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Headline>, NewsError>;
}

/// Keep usable entries, newest first, capped at [`MAX_HEADLINES`].
pub fn select_recent(mut items: Vec<Headline>) -> Vec<Headline> {
    items.retain(|h| !h.headline.trim().is_empty() && !h.url.trim().is_empty());
    // None sorts before Some, so undated items fall to the end after reversing
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items.truncate(MAX_HEADLINES);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline(title: &str, url: &str, ts: Option<i64>) -> Headline {
        Headline {
            headline: title.to_string(),
            url: url.to_string(),
            published_at: ts.and_then(|t| DateTime::from_timestamp(t, 0)),
        }
    }

    #[test]
    fn test_select_recent_drops_incomplete_entries() {
        let items = vec![
            headline("Has both", "https://a", Some(10)),
            headline("", "https://b", Some(20)),
            headline("No url", "  ", Some(30)),
        ];

        let selected = select_recent(items);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].headline, "Has both");
    }

    #[test]
    fn test_select_recent_orders_newest_first_and_truncates() {
        let items: Vec<Headline> = (0..15)
            .map(|i| headline(&format!("h{}", i), "https://x", Some(i)))
            .collect();

        let selected = select_recent(items);
        assert_eq!(selected.len(), MAX_HEADLINES);
        assert_eq!(selected[0].headline, "h14");
        assert_eq!(selected[9].headline, "h5");
    }

    #[test]
    fn test_undated_items_sort_last() {
        let items = vec![
            headline("undated", "https://u", None),
            headline("dated", "https://d", Some(1)),
        ];

        let selected = select_recent(items);
        assert_eq!(selected[0].headline, "dated");
        assert_eq!(selected[1].headline, "undated");
    }
}
