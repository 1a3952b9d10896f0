use sqlx::PgPool;

use crate::models::User;

pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash)
         VALUES ($1, $2)
         RETURNING id, email, password_hash, created_at"
    )
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
}

pub async fn fetch_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at
         FROM users
         WHERE email = $1"
    )
        .bind(email)
        .fetch_optional(pool)
        .await
}
