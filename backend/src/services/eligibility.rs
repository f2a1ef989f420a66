use crate::db::ConnectionStore;
use crate::errors::ConnectionResult;
use crate::services::scoring::{RecommendationEngine, ScoredCandidate};

/// Current recommendation list of `viewer_id`: ranked candidates minus the
/// viewer's dismissals. Always computed from fresh reads.
pub async fn recommendations_for<S: ConnectionStore>(
    store: &S,
    engine: &RecommendationEngine,
    viewer_id: i32,
) -> ConnectionResult<Vec<ScoredCandidate>> {
    let Some(viewer) = store.complete_profile(viewer_id).await? else {
        tracing::debug!("User {} has no complete profile, no recommendations", viewer_id);
        return Ok(Vec::new());
    };

    let pool = store.candidate_pool(viewer_id).await?;
    let mut ranked = engine.rank(&viewer, &pool);

    let dismissed = store.dismissed_ids(viewer_id).await?;
    ranked.retain(|candidate| !dismissed.contains(&candidate.user_id));
    Ok(ranked)
}

/// Whether `target_id` is in the viewer's current recommendation list. This is
/// the only check made before a brand-new connection row is created.
pub async fn is_recommendable<S: ConnectionStore>(
    store: &S,
    engine: &RecommendationEngine,
    viewer_id: i32,
    target_id: i32,
) -> ConnectionResult<bool> {
    let recommendations = recommendations_for(store, engine, viewer_id).await?;
    Ok(recommendations.iter().any(|candidate| candidate.user_id == target_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::ConnectionStatus;
    use crate::services::scoring::tests::profile;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for id in 1..=4 {
            store.add_user(id, Some(profile(id))).await;
        }
        store
    }

    #[tokio::test]
    async fn test_matching_candidates_are_recommendable() {
        let store = seeded().await;
        let engine = RecommendationEngine::default();

        let list = recommendations_for(&store, &engine, 1).await.unwrap();
        assert_eq!(list.iter().map(|c| c.user_id).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(is_recommendable(&store, &engine, 1, 3).await.unwrap());
        assert!(!is_recommendable(&store, &engine, 1, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_dismissal_only_affects_the_viewer() {
        let store = seeded().await;
        let engine = RecommendationEngine::default();

        store.insert_dismissal(1, 2).await.unwrap();
        assert!(!is_recommendable(&store, &engine, 1, 2).await.unwrap());
        assert!(is_recommendable(&store, &engine, 2, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_any_existing_row_excludes() {
        let store = seeded().await;
        let engine = RecommendationEngine::default();

        store.insert_raw(3, 1, ConnectionStatus::Dismissed).await;
        assert!(!is_recommendable(&store, &engine, 1, 3).await.unwrap());
        assert!(!is_recommendable(&store, &engine, 3, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_incomplete_viewer_gets_nothing() {
        let store = seeded().await;
        store.add_user(9, None).await;
        let engine = RecommendationEngine::default();

        assert!(recommendations_for(&store, &engine, 9).await.unwrap().is_empty());
        assert!(!is_recommendable(&store, &engine, 1, 9).await.unwrap());
    }
}
