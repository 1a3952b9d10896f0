mod common;
mod market;
mod news;
mod portfolio;
mod user;
mod watchlist;

pub use common::{MessageResponse, UserQuery};
pub use market::{ChartQueryParams, ChartResponse};
pub use news::{NewsItem, OutlookResponse};
pub use portfolio::{AddPortfolioItemRequest, PortfolioChangeResponse, PortfolioEntry, PortfolioHolding, PortfolioResponse};
pub use user::{LoginRequest, LoginResponse, SignupRequest, User};
pub use watchlist::{
    AddWatchlistItemRequest, NewWatchlistEntry, WatchlistChangeResponse, WatchlistEntry,
    WatchlistInfoItem, WatchlistInfoResponse, WatchlistResponse,
};
