use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::routes::{auth, portfolios, root, stocks, watchlists};
use crate::state::AppState;

pub fn create_app(state: AppState, cors_allowed_origins: &[String]) -> Router {
    Router::<AppState>::new()
        .merge(root::router())
        .merge(auth::router())
        .merge(watchlists::router())
        .merge(portfolios::router())
        .merge(stocks::router())
        .layer(cors_layer(cors_allowed_origins))
        .with_state(state)
}

/// Empty list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
