use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{ChartQueryParams, ChartResponse, NewsItem, OutlookResponse};
use crate::services::{chart_service, news_service, outlook_service, ticker};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stock-chart/:ticker", get(get_stock_chart))
        .route("/stock-news/:ticker", get(get_stock_news))
        .route("/stock-ai/:ticker", get(get_stock_outlook))
}

/// GET /stock-chart/:ticker?period=&interval=
///
/// 404 when the provider has no bars for the range, 400 on any other provider failure.
pub async fn get_stock_chart(
    Path(ticker): Path<String>,
    Query(params): Query<ChartQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<ChartResponse>, AppError> {
    info!(
        "GET /stock-chart/{} - period={:?} interval={:?}",
        ticker, params.period, params.interval
    );
    let chart = chart_service::get_chart(
        state.market_data.as_ref(),
        &ticker,
        params.period.as_deref(),
        params.interval.as_deref(),
    )
    .await?;
    Ok(Json(chart))
}

/// GET /stock-news/:ticker
///
/// Always succeeds for a well-formed ticker; provider problems yield `[]`.
pub async fn get_stock_news(
    Path(ticker): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsItem>>, AppError> {
    let ticker = ticker::normalize(&ticker)?;
    info!("GET /stock-news/{}", ticker);
    Ok(Json(news_service::stock_news(state.news(), &ticker).await))
}

pub async fn get_stock_outlook(
    Path(ticker): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OutlookResponse>, AppError> {
    let ticker = ticker::normalize(&ticker)?;
    info!("GET /stock-ai/{}", ticker);
    let analysis = outlook_service::outlook(state.news(), state.llm(), &ticker).await;
    Ok(Json(OutlookResponse { analysis }))
}
