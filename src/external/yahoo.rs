use crate::external::market_data::{ExternalPricePoint, MarketDataError, MarketDataProvider, Quote};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Deserialize;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_chart(
        &self,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> Result<YahooResult, MarketDataError> {
        let url = format!("{CHART_URL}/{ticker}");

        let resp = self.client
            .get(url)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await
            .map_err(|e| MarketDataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }

        // Unknown symbols come back as 404 with a chart.error body, so parse
        // before looking at the status.
        let status = resp.status();
        let body = resp
            .json::<YahooChartResponse>()
            .await
            .map_err(|e| {
                if status.is_success() {
                    MarketDataError::Parse(e.to_string())
                } else {
                    MarketDataError::BadResponse(format!("HTTP {}", status))
                }
            })?;

        extract_result(body, ticker)
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Option<YahooIndicators>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    short_name: Option<String>,
    long_name: Option<String>,
    exchange_name: Option<String>,
    full_exchange_name: Option<String>,
    regular_market_price: Option<f64>,
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn extract_result(body: YahooChartResponse, ticker: &str) -> Result<YahooResult, MarketDataError> {
    if let Some(err) = body.chart.error {
        let code = err.code.unwrap_or_default();
        let description = err.description.unwrap_or_default();
        if code.eq_ignore_ascii_case("not found") {
            return Err(MarketDataError::NotFound(ticker.to_string()));
        }
        return Err(MarketDataError::BadResponse(format!("{}: {}", code, description)));
    }

    body.chart.result
        .and_then(|mut r| r.pop())
        .ok_or_else(|| MarketDataError::BadResponse("missing result".into()))
}

fn quote_from_meta(meta: YahooMeta) -> Quote {
    Quote {
        name: meta.short_name.or(meta.long_name).filter(|n| !n.trim().is_empty()),
        price: meta.regular_market_price,
        exchange: meta.exchange_name.or(meta.full_exchange_name),
    }
}

fn closes_from_result(result: YahooResult, ticker: &str) -> Result<Vec<ExternalPricePoint>, MarketDataError> {
    // timestamp aligns with close list by index
    let closes = result.indicators
        .and_then(|i| i.quote.into_iter().next())
        .map(|q| q.close)
        .unwrap_or_default();

    let offset = result.meta.gmtoffset
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());

    let mut out = Vec::with_capacity(result.timestamp.len());

    for (i, ts) in result.timestamp.iter().enumerate() {
        // skip missing closes
        let Some(close) = closes.get(i).copied().flatten() else { continue };

        let timestamp = DateTime::from_timestamp(*ts, 0)
            .ok_or_else(|| MarketDataError::Parse("bad timestamp".into()))?
            .with_timezone(&offset);

        out.push(ExternalPricePoint { timestamp, close });
    }

    if out.is_empty() {
        return Err(MarketDataError::NotFound(ticker.to_string()));
    }

    // Ensure ascending by date
    out.sort_by_key(|p| p.timestamp);

    Ok(out)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn get_quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let result = self.fetch_chart(ticker, "1d", "1d").await?;
        Ok(quote_from_meta(result.meta))
    }

    async fn get_history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<ExternalPricePoint>, MarketDataError> {
        let result = self.fetch_chart(ticker, period, interval).await?;
        closes_from_result(result, ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> YahooChartResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_quote_prefers_short_name_and_exchange_code() {
        let body = parse(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "AAPL",
                        "shortName": "Apple Inc.",
                        "longName": "Apple Inc. (Long)",
                        "exchangeName": "NMS",
                        "fullExchangeName": "NasdaqGS",
                        "regularMarketPrice": 189.5
                    },
                    "timestamp": [1700000000],
                    "indicators": { "quote": [{ "close": [189.5] }] }
                }],
                "error": null
            }
        }));

        let quote = quote_from_meta(extract_result(body, "AAPL").unwrap().meta);
        assert_eq!(quote.name.as_deref(), Some("Apple Inc."));
        assert_eq!(quote.exchange.as_deref(), Some("NMS"));
        assert_eq!(quote.price, Some(189.5));
    }

    #[test]
    fn test_quote_without_name_or_price() {
        let body = parse(serde_json::json!({
            "chart": { "result": [{ "meta": { "symbol": "ZZZ" } }], "error": null }
        }));

        let quote = quote_from_meta(extract_result(body, "ZZZ").unwrap().meta);
        assert_eq!(quote, Quote::default());
    }

    #[test]
    fn test_not_found_error_body() {
        let body = parse(serde_json::json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }));

        let err = extract_result(body, "NOPE").unwrap_err();
        assert!(matches!(err, MarketDataError::NotFound(t) if t == "NOPE"));
    }

    #[test]
    fn test_history_skips_null_closes_and_sorts() {
        let body = parse(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {},
                    "timestamp": [1700172800, 1700000000, 1700086400],
                    "indicators": { "quote": [{ "close": [3.0, 1.0, null] }] }
                }],
                "error": null
            }
        }));

        let points = closes_from_result(extract_result(body, "AAPL").unwrap(), "AAPL").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 1.0);
        assert_eq!(points[1].close, 3.0);
        assert!(points[0].timestamp < points[1].timestamp);
    }

    #[test]
    fn test_history_empty_series_is_not_found() {
        let body = parse(serde_json::json!({
            "chart": {
                "result": [{ "meta": {}, "indicators": { "quote": [{}] } }],
                "error": null
            }
        }));

        let err = closes_from_result(extract_result(body, "AAPL").unwrap(), "AAPL").unwrap_err();
        assert!(matches!(err, MarketDataError::NotFound(_)));
    }

    #[test]
    fn test_history_keeps_exchange_offset() {
        // 2023-11-16 00:00 JST, i.e. 15:00 UTC the day before
        let body = parse(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "7203.T", "gmtoffset": 32400 },
                    "timestamp": [1700060400],
                    "indicators": { "quote": [{ "close": [2750.5] }] }
                }],
                "error": null
            }
        }));

        let points = closes_from_result(extract_result(body, "7203.T").unwrap(), "7203.T").unwrap();
        assert_eq!(points[0].timestamp.offset().local_minus_utc(), 32400);
        assert_eq!(points[0].timestamp.date_naive().to_string(), "2023-11-16");
    }

    #[test]
    fn test_history_without_offset_is_utc() {
        let body = parse(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {},
                    "timestamp": [1700000000],
                    "indicators": { "quote": [{ "close": [1.0] }] }
                }],
                "error": null
            }
        }));

        let points = closes_from_result(extract_result(body, "AAPL").unwrap(), "AAPL").unwrap();
        assert_eq!(points[0].timestamp.offset().local_minus_utc(), 0);
    }
}
