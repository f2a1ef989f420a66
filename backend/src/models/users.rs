use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use crate::constants::{DEFAULT_SEARCH_RADIUS_KM, MAX_WEIGHT};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub display_name: String,
    pub profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Importance (0-10) the owner of a profile gives each matching dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportanceWeights {
    pub analog: u8,
    pub digital: u8,
    pub collaboration: u8,
    pub food: u8,
    pub music: u8,
    pub location: u8,
}

impl ImportanceWeights {
    pub fn total(&self) -> u32 {
        [self.analog, self.digital, self.collaboration, self.food, self.music, self.location]
            .iter()
            .map(|w| u32::from(*w))
            .sum()
    }
}

/// Everything the scoring engine needs to know about one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub user_id: i32,
    pub display_name: String,
    pub analog_interests: Vec<String>,
    pub digital_interests: Vec<String>,
    pub collaboration: String,
    pub favorite_food: String,
    pub favorite_music: String,
    pub location: Option<GeoPoint>,
    pub search_radius_km: f64,
    pub weights: ImportanceWeights,
}

impl ProfileSnapshot {
    /// Radius actually used for filtering.
    pub fn effective_radius_km(&self) -> f64 {
        if self.search_radius_km.is_finite() && self.search_radius_km > 0.0 {
            self.search_radius_km
        } else {
            DEFAULT_SEARCH_RADIUS_KM
        }
    }
}

/// Raw `users JOIN profiles` row, as stored.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: i32,
    pub display_name: String,
    pub analog_interests: String,
    pub digital_interests: String,
    pub collaboration: String,
    pub favorite_food: String,
    pub favorite_music: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub search_radius_km: f64,
    pub weight_analog: i16,
    pub weight_digital: i16,
    pub weight_collaboration: i16,
    pub weight_food: i16,
    pub weight_music: i16,
    pub weight_location: i16,
}

impl ProfileRow {
    /// Converts a stored row into a snapshot. Corrupt interest lists become
    /// empty lists so one bad profile never fails a whole ranking.
    pub fn into_snapshot(self) -> ProfileSnapshot {
        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        };

        ProfileSnapshot {
            user_id: self.user_id,
            analog_interests: parse_interest_list(self.user_id, "analog_interests", &self.analog_interests),
            digital_interests: parse_interest_list(self.user_id, "digital_interests", &self.digital_interests),
            display_name: self.display_name,
            collaboration: self.collaboration,
            favorite_food: self.favorite_food,
            favorite_music: self.favorite_music,
            location,
            search_radius_km: self.search_radius_km,
            weights: ImportanceWeights {
                analog: clamp_weight(self.weight_analog),
                digital: clamp_weight(self.weight_digital),
                collaboration: clamp_weight(self.weight_collaboration),
                food: clamp_weight(self.weight_food),
                music: clamp_weight(self.weight_music),
                location: clamp_weight(self.weight_location),
            },
        }
    }
}

pub fn parse_interest_list(user_id: i32, field: &str, raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("Unparsable {} for user {}: {}", field, user_id, e);
            Vec::new()
        }
    }
}

fn clamp_weight(raw: i16) -> u8 {
    raw.clamp(0, i16::from(MAX_WEIGHT)) as u8
}
