use sqlx::PgPool;
use std::collections::HashSet;

/// Records that `viewer_id` does not want to see `dismissed_id` again.
/// Returns `false` when the dismissal already existed.
pub async fn insert_dismissal(pool: &PgPool, viewer_id: i32, dismissed_id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO dismissals (viewer_id, dismissed_id)
        VALUES ($1, $2)
        ON CONFLICT (viewer_id, dismissed_id) DO NOTHING
        "#,
    )
    .bind(viewer_id)
    .bind(dismissed_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_dismissed_ids(pool: &PgPool, viewer_id: i32) -> Result<HashSet<i32>, sqlx::Error> {
    let ids = sqlx::query_scalar::<_, i32>(
        "SELECT dismissed_id FROM dismissals WHERE viewer_id = $1",
    )
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    Ok(ids.into_iter().collect())
}
