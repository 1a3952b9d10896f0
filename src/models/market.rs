use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQueryParams {
    /// Provider range, e.g. "1mo", "6mo", "1y" (default: 6mo)
    pub period: Option<String>,
    /// Provider bar size, e.g. "1d", "1wk", "15m" (default: 1d)
    pub interval: Option<String>,
}

/// Parallel arrays, one entry per bar, oldest first.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartResponse {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
}
