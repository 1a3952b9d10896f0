use serde::Serialize;

/// A headline as returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlookResponse {
    pub analysis: String,
}
