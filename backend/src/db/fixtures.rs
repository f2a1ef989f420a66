//! Seed helpers for the Postgres-backed tests.
//!
//! Those tests are `#[ignore]`d and run with `cargo test -- --ignored` against
//! a server reachable through `DATABASE_URL`; each gets a fresh database with
//! the embedded migrations applied.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use crate::models::ConnectionStatus;

/// Inserts a user with a profile that matches every other seeded profile.
pub async fn seed_user(pool: &PgPool, display_name: &str, profile_complete: bool) -> i32 {
    let user_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (display_name, profile_complete) VALUES ($1, $2) RETURNING id",
    )
    .bind(display_name)
    .bind(profile_complete)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        INSERT INTO profiles (
            user_id, analog_interests, digital_interests, collaboration,
            favorite_food, favorite_music, latitude, longitude, weight_location
        )
        VALUES ($1, '["pottery", "chess"]', '["rust", "video games"]', 'start a band',
                'ramen', 'jazz', 52.52, 13.405, 1)
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await
    .unwrap();

    user_id
}

/// Writes a pair row directly, the way pre-lock writers did.
pub async fn insert_legacy_row(
    pool: &PgPool,
    requester_id: i32,
    addressee_id: i32,
    status: ConnectionStatus,
    updated_at: DateTime<Utc>,
) -> i32 {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO connections (requester_id, addressee_id, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id
        "#,
    )
    .bind(requester_id)
    .bind(addressee_id)
    .bind(status)
    .bind(updated_at)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn pair_row_count(pool: &PgPool, user_a: i32, user_b: i32) -> i64 {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM connections
        WHERE (requester_id = $1 AND addressee_id = $2)
           OR (requester_id = $2 AND addressee_id = $1)
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .fetch_one(pool)
    .await
    .unwrap()
}
