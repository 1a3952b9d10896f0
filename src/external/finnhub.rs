use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::external::news::{select_recent, Headline, NewsError, NewsProvider};

const COMPANY_NEWS_URL: &str = "https://finnhub.io/api/v1/company-news";

/// Finnhub company-news provider
pub struct FinnhubProvider {
    api_key: String,
    client: Client,
}

impl FinnhubProvider {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { api_key, client }
    }
}

#[derive(Debug, Deserialize)]
struct FinnhubNewsItem {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    datetime: Option<i64>,
}

impl From<FinnhubNewsItem> for Headline {
    fn from(item: FinnhubNewsItem) -> Self {
        Headline {
            headline: item.headline,
            url: item.url,
            published_at: item.datetime.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

fn parse_company_news(items: Vec<FinnhubNewsItem>) -> Vec<Headline> {
    select_recent(items.into_iter().map(Headline::from).collect())
}

#[async_trait]
impl NewsProvider for FinnhubProvider {
    async fn recent_news(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Headline>, NewsError> {
        info!("Fetching news from Finnhub for {} ({} to {})", ticker, from, to);

        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        let response = self
            .client
            .get(COMPANY_NEWS_URL)
            .query(&[
                ("symbol", ticker),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Finnhub request failed: {}", e);
                NewsError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!("Finnhub returned HTTP {} for {}", status, ticker);
            return Err(NewsError::Status(status.as_u16()));
        }

        let items: Vec<FinnhubNewsItem> = response.json().await.map_err(|e| {
            error!("Failed to parse Finnhub response: {}", e);
            NewsError::Parse(e.to_string())
        })?;

        let headlines = parse_company_news(items);
        info!("Fetched {} headlines from Finnhub for {}", headlines.len(), ticker);
        Ok(headlines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_news_payload() {
        let items: Vec<FinnhubNewsItem> = serde_json::from_value(serde_json::json!([
            {
                "category": "company",
                "datetime": 1700000000,
                "headline": "Older story",
                "id": 1,
                "related": "AAPL",
                "source": "Reuters",
                "summary": "",
                "url": "https://example.com/older"
            },
            {
                "category": "company",
                "datetime": 1700090000,
                "headline": "Newer story",
                "id": 2,
                "url": "https://example.com/newer"
            },
            { "datetime": 1700095000, "headline": "", "url": "https://example.com/blank" }
        ]))
        .unwrap();

        let headlines = parse_company_news(items);
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].headline, "Newer story");
        assert_eq!(headlines[1].url, "https://example.com/older");
    }
}
