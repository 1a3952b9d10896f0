pub mod portfolio_queries;
pub mod user_queries;
pub mod watchlist_queries;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{NewWatchlistEntry, PortfolioEntry, User, WatchlistEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// A uniqueness constraint rejected the write; carries the offending key.
    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("user {0} does not exist")]
    MissingUser(i64),
}

/// Persistence capability used by the API layer.
///
/// Every write is a single atomic statement. Uniqueness of `users.email` and of
/// `(user_id, ticker)` is enforced by the store itself and reported as
/// [`StoreError::Duplicate`], so a lost check-then-insert race still surfaces
/// as a conflict.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<WatchlistEntry>, StoreError>;

    async fn find_watchlist_entry(
        &self,
        user_id: i64,
        ticker: &str,
    ) -> Result<Option<WatchlistEntry>, StoreError>;

    async fn insert_watchlist_entry(
        &self,
        user_id: i64,
        entry: &NewWatchlistEntry,
    ) -> Result<WatchlistEntry, StoreError>;

    /// Returns `false` when no row matched.
    async fn delete_watchlist_entry(&self, user_id: i64, ticker: &str) -> Result<bool, StoreError>;

    async fn list_portfolio(&self, user_id: i64) -> Result<Vec<PortfolioEntry>, StoreError>;

    async fn insert_portfolio_entry(
        &self,
        user_id: i64,
        ticker: &str,
        shares: f64,
    ) -> Result<PortfolioEntry, StoreError>;

    async fn delete_portfolio_entry(&self, user_id: i64, ticker: &str) -> Result<bool, StoreError>;
}

/// Postgres-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate constraint violations into domain errors.
fn classify(err: sqlx::Error, key: &str, user_id: Option<i64>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate(key.to_string());
        }
        if db_err.is_foreign_key_violation() {
            if let Some(user_id) = user_id {
                return StoreError::MissingUser(user_id);
            }
        }
    }
    StoreError::Db(err)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        user_queries::create(&self.pool, email, password_hash)
            .await
            .map_err(|e| classify(e, email, None))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(user_queries::fetch_by_email(&self.pool, email).await?)
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<WatchlistEntry>, StoreError> {
        Ok(watchlist_queries::fetch_for_user(&self.pool, user_id).await?)
    }

    async fn find_watchlist_entry(
        &self,
        user_id: i64,
        ticker: &str,
    ) -> Result<Option<WatchlistEntry>, StoreError> {
        Ok(watchlist_queries::fetch_one(&self.pool, user_id, ticker).await?)
    }

    async fn insert_watchlist_entry(
        &self,
        user_id: i64,
        entry: &NewWatchlistEntry,
    ) -> Result<WatchlistEntry, StoreError> {
        watchlist_queries::insert(&self.pool, user_id, entry)
            .await
            .map_err(|e| classify(e, &entry.ticker, Some(user_id)))
    }

    async fn delete_watchlist_entry(&self, user_id: i64, ticker: &str) -> Result<bool, StoreError> {
        let deleted = watchlist_queries::delete(&self.pool, user_id, ticker).await?;
        Ok(deleted > 0)
    }

    async fn list_portfolio(&self, user_id: i64) -> Result<Vec<PortfolioEntry>, StoreError> {
        Ok(portfolio_queries::fetch_for_user(&self.pool, user_id).await?)
    }

    async fn insert_portfolio_entry(
        &self,
        user_id: i64,
        ticker: &str,
        shares: f64,
    ) -> Result<PortfolioEntry, StoreError> {
        portfolio_queries::insert(&self.pool, user_id, ticker, shares)
            .await
            .map_err(|e| classify(e, ticker, Some(user_id)))
    }

    async fn delete_portfolio_entry(&self, user_id: i64, ticker: &str) -> Result<bool, StoreError> {
        let deleted = portfolio_queries::delete(&self.pool, user_id, ticker).await?;
        Ok(deleted > 0)
    }
}
