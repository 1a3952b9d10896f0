use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::db::{Store, StoreError};
use crate::models::{NewWatchlistEntry, PortfolioEntry, User, WatchlistEntry};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    watchlist: Vec<WatchlistEntry>,
    portfolio: Vec<PortfolioEntry>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self, user_id: i64) -> Result<(), StoreError> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(StoreError::MissingUser(user_id))
        }
    }
}

/// [`Store`] with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.tables.lock().users.iter().find(|u| u.email == email).cloned()
    }

    pub fn watchlist_len(&self, user_id: i64) -> usize {
        self.tables.lock().watchlist.iter().filter(|e| e.user_id == user_id).count()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.lock();
        if tables.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate(email.to_string()));
        }

        let user = User {
            id: tables.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.user(email))
    }

    async fn list_watchlist(&self, user_id: i64) -> Result<Vec<WatchlistEntry>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables.watchlist.iter().filter(|e| e.user_id == user_id).cloned().collect())
    }

    async fn find_watchlist_entry(
        &self,
        user_id: i64,
        ticker: &str,
    ) -> Result<Option<WatchlistEntry>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .watchlist
            .iter()
            .find(|e| e.user_id == user_id && e.ticker == ticker)
            .cloned())
    }

    async fn insert_watchlist_entry(
        &self,
        user_id: i64,
        entry: &NewWatchlistEntry,
    ) -> Result<WatchlistEntry, StoreError> {
        let mut tables = self.tables.lock();
        tables.require_user(user_id)?;
        if tables.watchlist.iter().any(|e| e.user_id == user_id && e.ticker == entry.ticker) {
            return Err(StoreError::Duplicate(entry.ticker.clone()));
        }

        let row = WatchlistEntry {
            id: tables.next_id(),
            user_id,
            ticker: entry.ticker.clone(),
            quantity: entry.quantity,
            purchase_price: entry.purchase_price,
            created_at: Utc::now(),
        };
        tables.watchlist.push(row.clone());
        Ok(row)
    }

    async fn delete_watchlist_entry(&self, user_id: i64, ticker: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock();
        let before = tables.watchlist.len();
        tables.watchlist.retain(|e| !(e.user_id == user_id && e.ticker == ticker));
        Ok(tables.watchlist.len() < before)
    }

    async fn list_portfolio(&self, user_id: i64) -> Result<Vec<PortfolioEntry>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables.portfolio.iter().filter(|e| e.user_id == user_id).cloned().collect())
    }

    async fn insert_portfolio_entry(
        &self,
        user_id: i64,
        ticker: &str,
        shares: f64,
    ) -> Result<PortfolioEntry, StoreError> {
        let mut tables = self.tables.lock();
        tables.require_user(user_id)?;
        if tables.portfolio.iter().any(|e| e.user_id == user_id && e.ticker == ticker) {
            return Err(StoreError::Duplicate(ticker.to_string()));
        }

        let row = PortfolioEntry {
            id: tables.next_id(),
            user_id,
            ticker: ticker.to_string(),
            shares,
            created_at: Utc::now(),
        };
        tables.portfolio.push(row.clone());
        Ok(row)
    }

    async fn delete_portfolio_entry(&self, user_id: i64, ticker: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock();
        let before = tables.portfolio.len();
        tables.portfolio.retain(|e| !(e.user_id == user_id && e.ticker == ticker));
        Ok(tables.portfolio.len() < before)
    }
}
