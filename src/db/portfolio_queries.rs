use sqlx::PgPool;

use crate::models::PortfolioEntry;

pub async fn fetch_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<PortfolioEntry>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioEntry>(
        "SELECT id, user_id, ticker, shares, created_at
         FROM portfolio
         WHERE user_id = $1
         ORDER BY id ASC"
    )
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn insert(
    pool: &PgPool,
    user_id: i64,
    ticker: &str,
    shares: f64,
) -> Result<PortfolioEntry, sqlx::Error> {
    sqlx::query_as::<_, PortfolioEntry>(
        "INSERT INTO portfolio (user_id, ticker, shares)
         VALUES ($1, $2, $3)
         RETURNING id, user_id, ticker, shares, created_at"
    )
        .bind(user_id)
        .bind(ticker)
        .bind(shares)
        .fetch_one(pool)
        .await
}

pub async fn delete(pool: &PgPool, user_id: i64, ticker: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolio WHERE user_id = $1 AND ticker = $2")
        .bind(user_id)
        .bind(ticker)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
