use crate::models::{ProfileRow, ProfileSnapshot, User};
use sqlx::PgPool;

const PROFILE_COLUMNS: &str = r#"
    u.id AS user_id, u.display_name,
    p.analog_interests, p.digital_interests, p.collaboration,
    p.favorite_food, p.favorite_music, p.latitude, p.longitude, p.search_radius_km,
    p.weight_analog, p.weight_digital, p.weight_collaboration,
    p.weight_food, p.weight_music, p.weight_location
"#;

// User operations
pub async fn get_user_by_id(pool: &PgPool, user_id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, display_name, profile_complete, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

// Profile operations

/// Profile of a user whose profile is marked complete.
pub async fn get_complete_profile(pool: &PgPool, user_id: i32) -> Result<Option<ProfileSnapshot>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM users u
        JOIN profiles p ON p.user_id = u.id
        WHERE u.id = $1 AND u.profile_complete
        "#
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ProfileRow::into_snapshot))
}

/// Everyone the viewer could be recommended: complete profile, not the viewer,
/// no connection row with the viewer in any status or direction, and not
/// dismissed by the viewer. Ordered by id so ranking ties are reproducible.
pub async fn get_candidate_pool(pool: &PgPool, viewer_id: i32) -> Result<Vec<ProfileSnapshot>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM users u
        JOIN profiles p ON p.user_id = u.id
        WHERE u.profile_complete
        AND u.id <> $1
        AND NOT EXISTS (
            SELECT 1 FROM connections c
            WHERE (c.requester_id = $1 AND c.addressee_id = u.id)
               OR (c.requester_id = u.id AND c.addressee_id = $1)
        )
        AND NOT EXISTS (
            SELECT 1 FROM dismissals d
            WHERE d.viewer_id = $1 AND d.dismissed_id = u.id
        )
        ORDER BY u.id ASC
        "#
    ))
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ProfileRow::into_snapshot).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::db::dismissals::insert_dismissal;
    use crate::db::fixtures::{insert_legacy_row, seed_user};
    use crate::models::ConnectionStatus;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs Postgres at DATABASE_URL"]
    async fn test_candidate_pool_exclusions(pool: PgPool) {
        let viewer = seed_user(&pool, "viewer", true).await;
        let open = seed_user(&pool, "open", true).await;
        let incomplete = seed_user(&pool, "incomplete", false).await;
        let connected = seed_user(&pool, "connected", true).await;
        let dismissed = seed_user(&pool, "dismissed", true).await;
        let dismisser = seed_user(&pool, "dismisser", true).await;

        insert_legacy_row(&pool, connected, viewer, ConnectionStatus::Dismissed, Utc::now()).await;
        assert!(insert_dismissal(&pool, viewer, dismissed).await.unwrap());
        assert!(!insert_dismissal(&pool, viewer, dismissed).await.unwrap());
        // dismissals only hide the dismissed user from the one who dismissed
        assert!(insert_dismissal(&pool, dismisser, viewer).await.unwrap());

        let ids: Vec<i32> = get_candidate_pool(&pool, viewer)
            .await
            .unwrap()
            .iter()
            .map(|p| p.user_id)
            .collect();
        assert_eq!(ids, vec![open, dismisser]);
        assert!(!ids.contains(&incomplete));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs Postgres at DATABASE_URL"]
    async fn test_complete_profile_lookup(pool: PgPool) {
        let complete = seed_user(&pool, "ada", true).await;
        let incomplete = seed_user(&pool, "bo", false).await;

        let snapshot = get_complete_profile(&pool, complete).await.unwrap().unwrap();
        assert_eq!(snapshot.display_name, "ada");
        assert_eq!(snapshot.analog_interests, vec!["pottery", "chess"]);
        assert_eq!(snapshot.weights.location, 1);
        assert!(snapshot.location.is_some());

        assert!(get_complete_profile(&pool, incomplete).await.unwrap().is_none());
        assert!(get_user_by_id(&pool, incomplete).await.unwrap().is_some());
        assert!(get_user_by_id(&pool, 9999).await.unwrap().is_none());
    }
}
