use sqlx::PgPool;

use crate::models::{NewWatchlistEntry, WatchlistEntry};

// ==============================================================================
// Watchlist Entry Operations
// ==============================================================================

pub async fn fetch_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<WatchlistEntry>, sqlx::Error> {
    sqlx::query_as::<_, WatchlistEntry>(
        r#"
        SELECT id, user_id, ticker, quantity, purchase_price, created_at
        FROM watchlist
        WHERE user_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(
    pool: &PgPool,
    user_id: i64,
    ticker: &str,
) -> Result<Option<WatchlistEntry>, sqlx::Error> {
    sqlx::query_as::<_, WatchlistEntry>(
        r#"
        SELECT id, user_id, ticker, quantity, purchase_price, created_at
        FROM watchlist
        WHERE user_id = $1 AND ticker = $2
        "#,
    )
    .bind(user_id)
    .bind(ticker)
    .fetch_optional(pool)
    .await
}

pub async fn insert(
    pool: &PgPool,
    user_id: i64,
    entry: &NewWatchlistEntry,
) -> Result<WatchlistEntry, sqlx::Error> {
    sqlx::query_as::<_, WatchlistEntry>(
        r#"
        INSERT INTO watchlist (user_id, ticker, quantity, purchase_price)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, ticker, quantity, purchase_price, created_at
        "#,
    )
    .bind(user_id)
    .bind(&entry.ticker)
    .bind(entry.quantity)
    .bind(entry.purchase_price)
    .fetch_one(pool)
    .await
}

pub async fn delete(
    pool: &PgPool,
    user_id: i64,
    ticker: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND ticker = $2")
        .bind(user_id)
        .bind(ticker)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
