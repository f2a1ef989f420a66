use serde::Serialize;
use std::sync::Arc;
use crate::constants::*;
use crate::models::ProfileSnapshot;
use crate::services::catalogue::KeywordCatalogue;
use crate::services::similarity::{
    collaboration_points, haversine_km, interest_points, location_points, taste_points,
};

/// Per-dimension raw contributions, kept for the `recommend` tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub analog: f64,
    pub digital: f64,
    pub collaboration: f64,
    pub food: f64,
    pub music: f64,
    pub location: f64,
    pub distance_km: Option<f64>,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> f64 {
        self.analog + self.digital + self.collaboration + self.food + self.music + self.location
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub user_id: i32,
    pub display_name: String,
    pub score: i64,
    pub match_percent: u8,
    #[serde(skip)]
    pub exact_percent: f64,
    #[serde(skip)]
    pub breakdown: ScoreBreakdown,
}

/// Weighted compatibility scoring. Cheap to clone, safe to share.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalogue: Arc<KeywordCatalogue>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(KeywordCatalogue::default())
    }
}

impl RecommendationEngine {
    pub fn new(catalogue: KeywordCatalogue) -> Self {
        Self { catalogue: Arc::new(catalogue) }
    }

    pub fn catalogue(&self) -> &KeywordCatalogue {
        &self.catalogue
    }

    /// Scores one candidate against the requester's weights.
    ///
    /// Returns `None` when the candidate lies strictly outside the requester's
    /// radius and location matters to them (weight > 0). A zero location
    /// weight switches location off completely: no filtering, no scoring.
    pub fn score(&self, requester: &ProfileSnapshot, candidate: &ProfileSnapshot) -> Option<ScoredCandidate> {
        let weights = requester.weights;
        let catalogue = &self.catalogue;
        let mut breakdown = ScoreBreakdown::default();

        if weights.location > 0 {
            if let (Some(from), Some(to)) = (requester.location, candidate.location) {
                let radius = requester.effective_radius_km();
                let distance = haversine_km(from, to);
                if distance > radius {
                    return None;
                }
                breakdown.distance_km = Some(distance);
                breakdown.location = location_points(distance, radius, weights.location);
            }
        }

        breakdown.analog = f64::from(weights.analog)
            * interest_points(&requester.analog_interests, &candidate.analog_interests, &catalogue.interest_groups);
        breakdown.digital = f64::from(weights.digital)
            * interest_points(&requester.digital_interests, &candidate.digital_interests, &catalogue.interest_groups);
        breakdown.collaboration = f64::from(weights.collaboration)
            * collaboration_points(&requester.collaboration, &candidate.collaboration, catalogue);
        breakdown.food = f64::from(weights.food)
            * taste_points(&requester.favorite_food, &candidate.favorite_food, &catalogue.cuisine_buckets);
        breakdown.music = f64::from(weights.music)
            * taste_points(&requester.favorite_music, &candidate.favorite_music, &catalogue.genre_buckets);

        let raw = breakdown.raw_total();
        let denominator = f64::from(weights.total().max(1));
        let percent = (raw / denominator).clamp(0.0, 100.0);

        Some(ScoredCandidate {
            user_id: candidate.user_id,
            display_name: candidate.display_name.clone(),
            score: raw.round() as i64,
            match_percent: percent.round() as u8,
            exact_percent: percent,
            breakdown,
        })
    }

    /// Top candidates above the admission threshold, best first. Ties keep
    /// the order of `pool`.
    pub fn rank(&self, requester: &ProfileSnapshot, pool: &[ProfileSnapshot]) -> Vec<ScoredCandidate> {
        let mut ranked: Vec<ScoredCandidate> = pool
            .iter()
            .filter_map(|candidate| self.score(requester, candidate))
            .filter(|scored| scored.exact_percent >= ADMISSION_THRESHOLD_PERCENT)
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(RECOMMENDATION_LIMIT);

        tracing::debug!(
            "Ranked {} of {} candidates for user {}",
            ranked.len(),
            pool.len(),
            requester.user_id
        );
        ranked
    }
}
