pub mod auth_service;
pub mod chart_service;
pub mod news_service;
pub mod outlook_service;
pub mod portfolio_service;
pub mod session;
pub mod ticker;
pub mod watchlist_service;
