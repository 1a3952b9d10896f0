use tracing::{error, info};

use crate::errors::AppError;
use crate::external::market_data::{ExternalPricePoint, MarketDataError, MarketDataProvider};
use crate::models::ChartResponse;
use crate::services::ticker;

pub const DEFAULT_PERIOD: &str = "6mo";
pub const DEFAULT_INTERVAL: &str = "1d";

/// Minute and hour bars need a time component; everything else is one bar per day or longer.
fn is_intraday(interval: &str) -> bool {
    interval.ends_with('h') || (interval.ends_with('m') && !interval.ends_with("mo"))
}

fn shape_chart(points: Vec<ExternalPricePoint>, interval: &str) -> ChartResponse {
    let intraday = is_intraday(interval);
    let (dates, prices) = points
        .into_iter()
        .map(|p| {
            let date = if intraday {
                p.timestamp.to_rfc3339()
            } else {
                p.timestamp.date_naive().format("%Y-%m-%d").to_string()
            };
            (date, p.close)
        })
        .unzip();

    ChartResponse { dates, prices }
}

pub async fn get_chart(
    market_data: &dyn MarketDataProvider,
    raw_ticker: &str,
    period: Option<&str>,
    interval: Option<&str>,
) -> Result<ChartResponse, AppError> {
    let ticker = ticker::normalize(raw_ticker)?;
    let period = period.map(str::trim).filter(|p| !p.is_empty()).unwrap_or(DEFAULT_PERIOD);
    let interval = interval.map(str::trim).filter(|i| !i.is_empty()).unwrap_or(DEFAULT_INTERVAL);

    let points = market_data
        .get_history(&ticker, period, interval)
        .await
        .map_err(|e| {
            error!("Failed to fetch {} history for {} ({}): {}", period, ticker, interval, e);
            match e {
                MarketDataError::NotFound(_) => {
                    AppError::NotFound(format!("No price data found for {}", ticker))
                }
                other => AppError::BadRequest(other.to_string()),
            }
        })?;

    info!("Chart for {}: {} points ({} / {})", ticker, points.len(), period, interval);
    Ok(shape_chart(points, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn point(y: i32, m: u32, d: u32, h: u32, close: f64) -> ExternalPricePoint {
        ExternalPricePoint {
            timestamp: Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap().fixed_offset(),
            close,
        }
    }

    fn tokyo_point(ts: i64, close: f64) -> ExternalPricePoint {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        ExternalPricePoint {
            timestamp: DateTime::from_timestamp(ts, 0).unwrap().with_timezone(&jst),
            close,
        }
    }

    #[test]
    fn test_intraday_detection() {
        assert!(is_intraday("1m"));
        assert!(is_intraday("15m"));
        assert!(is_intraday("1h"));
        assert!(!is_intraday("1d"));
        assert!(!is_intraday("1wk"));
        assert!(!is_intraday("1mo"));
        assert!(!is_intraday("3mo"));
    }

    #[test]
    fn test_daily_chart_uses_plain_dates() {
        let chart = shape_chart(
            vec![point(2024, 1, 2, 14, 100.0), point(2024, 1, 3, 14, 101.5)],
            "1d",
        );
        assert_eq!(chart.dates, vec!["2024-01-02", "2024-01-03"]);
        assert_eq!(chart.prices, vec![100.0, 101.5]);
    }

    #[test]
    fn test_intraday_chart_keeps_time() {
        let chart = shape_chart(vec![point(2024, 1, 2, 14, 100.0)], "5m");
        assert_eq!(chart.dates, vec!["2024-01-02T14:30:00+00:00"]);
    }

    #[test]
    fn test_daily_chart_uses_exchange_calendar_day() {
        // 7203.T bars open at 00:00 JST, which is still the previous day in UTC
        let chart = shape_chart(
            vec![tokyo_point(1_700_060_400, 2750.5), tokyo_point(1_700_146_800, 2761.0)],
            "1d",
        );
        assert_eq!(chart.dates, vec!["2023-11-16", "2023-11-17"]);
    }

    #[test]
    fn test_intraday_chart_keeps_exchange_offset() {
        let chart = shape_chart(vec![tokyo_point(1_700_094_600, 2755.0)], "15m");
        assert_eq!(chart.dates, vec!["2023-11-16T09:30:00+09:00"]);
    }
}
