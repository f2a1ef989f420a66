use crate::errors::{ConnectionError, ConnectionResult};
use crate::models::{Connection, ConnectionStatus, ConnectionSummary, DuplicatePair, ordered_pair};
use crate::services::state_machine::{Applied, Transition};
use sqlx::{PgPool, Postgres, Transaction};

// Latest row for an unordered pair. Duplicate historical rows are tolerated;
// the newest (updated_at, id) is authoritative.
const LATEST_PAIR_SQL: &str = r#"
    SELECT id, requester_id, addressee_id, status, created_at, updated_at
    FROM connections
    WHERE (requester_id = $1 AND addressee_id = $2)
       OR (requester_id = $2 AND addressee_id = $1)
    ORDER BY updated_at DESC, id DESC
    LIMIT 1
"#;

// Latest row per pair involving $1, as a CTE named `latest`.
const LATEST_PER_PAIR_CTE: &str = r#"
    WITH latest AS (
        SELECT DISTINCT ON (LEAST(requester_id, addressee_id), GREATEST(requester_id, addressee_id))
            id, requester_id, addressee_id, status, updated_at
        FROM connections
        WHERE requester_id = $1 OR addressee_id = $1
        ORDER BY LEAST(requester_id, addressee_id), GREATEST(requester_id, addressee_id),
                 updated_at DESC, id DESC
    )
"#;

pub async fn get_latest_pair(pool: &PgPool, user_a: i32, user_b: i32) -> Result<Option<Connection>, sqlx::Error> {
    let (smaller_id, larger_id) = ordered_pair(user_a, user_b);

    sqlx::query_as::<_, Connection>(LATEST_PAIR_SQL)
        .bind(smaller_id)
        .bind(larger_id)
        .fetch_optional(pool)
        .await
}

/// Serializes every writer of this pair until the transaction ends. The
/// advisory lock also covers the case where no row exists yet, which a row
/// lock alone cannot.
async fn lock_pair(tx: &mut Transaction<'_, Postgres>, smaller_id: i32, larger_id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(smaller_id)
        .bind(larger_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn get_latest_pair_for_update(
    tx: &mut Transaction<'_, Postgres>,
    smaller_id: i32,
    larger_id: i32,
) -> Result<Option<Connection>, sqlx::Error> {
    sqlx::query_as::<_, Connection>(&format!("{LATEST_PAIR_SQL} FOR UPDATE"))
        .bind(smaller_id)
        .bind(larger_id)
        .fetch_optional(&mut **tx)
        .await
}

async fn insert_pending_connection(
    tx: &mut Transaction<'_, Postgres>,
    requester_id: i32,
    addressee_id: i32,
) -> Result<Connection, sqlx::Error> {
    sqlx::query_as::<_, Connection>(
        r#"
        INSERT INTO connections (requester_id, addressee_id, status)
        VALUES ($1, $2, 'pending')
        RETURNING id, requester_id, addressee_id, status, created_at, updated_at
        "#,
    )
    .bind(requester_id)
    .bind(addressee_id)
    .fetch_one(&mut **tx)
    .await
}

async fn update_connection_status(
    tx: &mut Transaction<'_, Postgres>,
    connection_id: i32,
    status: ConnectionStatus,
) -> Result<Connection, sqlx::Error> {
    sqlx::query_as::<_, Connection>(
        r#"
        UPDATE connections
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, requester_id, addressee_id, status, created_at, updated_at
        "#,
    )
    .bind(connection_id)
    .bind(status)
    .fetch_one(&mut **tx)
    .await
}

/// Runs one pair mutation as a single transaction: lock the pair, read the
/// latest row under `FOR UPDATE`, let `decide` pick the transition, write,
/// commit. A rejected decision or any failure rolls everything back.
pub async fn apply_transition<F>(
    pool: &PgPool,
    actor_id: i32,
    target_id: i32,
    decide: F,
) -> ConnectionResult<Applied>
where
    F: FnOnce(Option<&Connection>) -> ConnectionResult<Transition>,
{
    let (smaller_id, larger_id) = ordered_pair(actor_id, target_id);
    let mut tx = pool.begin().await?;

    lock_pair(&mut tx, smaller_id, larger_id).await?;
    let current = get_latest_pair_for_update(&mut tx, smaller_id, larger_id).await?;

    let transition = match decide(current.as_ref()) {
        Ok(transition) => transition,
        Err(e) => {
            tx.rollback().await?;
            return Err(e);
        }
    };

    let applied = match (transition, current) {
        (Transition::Unchanged, Some(connection)) => Applied { connection, changed: false },
        (Transition::Unchanged, None) => {
            tx.rollback().await?;
            return Err(ConnectionError::NotFound);
        }
        (Transition::Create { requester_id, addressee_id }, _) => Applied {
            connection: insert_pending_connection(&mut tx, requester_id, addressee_id).await?,
            changed: true,
        },
        (Transition::SetStatus { id, status }, _) => Applied {
            connection: update_connection_status(&mut tx, id, status).await?,
            changed: true,
        },
    };

    tx.commit().await?;
    Ok(applied)
}

/// Accepted connections of a user, most recent first.
pub async fn get_accepted_connections(pool: &PgPool, user_id: i32) -> Result<Vec<ConnectionSummary>, sqlx::Error> {
    sqlx::query_as::<_, ConnectionSummary>(&format!(
        r#"
        {LATEST_PER_PAIR_CTE}
        SELECT l.id AS connection_id, u.id AS user_id, u.display_name, l.updated_at AS since
        FROM latest l
        JOIN users u ON u.id = CASE WHEN l.requester_id = $1 THEN l.addressee_id ELSE l.requester_id END
        WHERE l.status = 'accepted'
        ORDER BY l.updated_at DESC, l.id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Pending requests addressed to a user, most recent first.
pub async fn get_incoming_pending(pool: &PgPool, user_id: i32) -> Result<Vec<ConnectionSummary>, sqlx::Error> {
    sqlx::query_as::<_, ConnectionSummary>(&format!(
        r#"
        {LATEST_PER_PAIR_CTE}
        SELECT l.id AS connection_id, u.id AS user_id, u.display_name, l.updated_at AS since
        FROM latest l
        JOIN users u ON u.id = l.requester_id
        WHERE l.status = 'pending' AND l.addressee_id = $1
        ORDER BY l.updated_at DESC, l.id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Pairs that carry more than one row, with the row that currently wins.
pub async fn find_duplicate_pairs(pool: &PgPool, limit: i64) -> Result<Vec<DuplicatePair>, sqlx::Error> {
    sqlx::query_as::<_, DuplicatePair>(
        r#"
        WITH ranked AS (
            SELECT
                LEAST(requester_id, addressee_id) AS low_id,
                GREATEST(requester_id, addressee_id) AS high_id,
                id, status,
                COUNT(*) OVER (PARTITION BY LEAST(requester_id, addressee_id), GREATEST(requester_id, addressee_id)) AS row_count,
                ROW_NUMBER() OVER (
                    PARTITION BY LEAST(requester_id, addressee_id), GREATEST(requester_id, addressee_id)
                    ORDER BY updated_at DESC, id DESC
                ) AS rn
            FROM connections
        )
        SELECT low_id, high_id, row_count, id AS winning_id, status AS winning_status
        FROM ranked
        WHERE rn = 1 AND row_count > 1
        ORDER BY row_count DESC, low_id, high_id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
