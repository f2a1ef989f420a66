//! Pure similarity primitives used by the scoring engine.
//!
//! Every function here is deterministic and free of I/O. Interest, taste and
//! collaboration functions return points in `0..=100`; the caller applies
//! the importance weight. `location_points` is the exception: it returns a raw
//! contribution because its proximity bonus is not weight-scaled.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use crate::constants::*;
use crate::models::GeoPoint;
use crate::services::catalogue::{ComplementaryPair, KeywordCatalogue, KeywordGroup};

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9&+#]+").expect("static regex"));

/// Great-circle distance in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    // abs keeps the result bit-identical when the arguments are swapped
    let d_lat = (b.lat - a.lat).abs().to_radians();
    let d_lon = (b.lon - a.lon).abs().to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Trimmed, lowercased term used for exact comparisons.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Lowercases, collapses punctuation to single spaces and pads both ends with
/// a space so `" keyword"` containment means "keyword at a word start".
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = NON_WORD.replace_all(&lowered, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(" {} ", trimmed)
    }
}

/// `normalized` must come from [`normalize_text`].
pub fn contains_keyword(normalized: &str, keyword: &str) -> bool {
    let keyword = normalize_text(keyword);
    if keyword.is_empty() || normalized.is_empty() {
        return false;
    }
    // drop the trailing pad so prefixes match ("teach" in "teaching")
    normalized.contains(keyword.trim_end())
}

fn contains_any(normalized: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| contains_keyword(normalized, k))
}

/// Indices of the groups a term falls into.
pub fn group_memberships(term: &str, groups: &[KeywordGroup]) -> HashSet<usize> {
    let normalized = normalize_text(term);
    groups
        .iter()
        .enumerate()
        .filter(|(_, group)| contains_any(&normalized, &group.keywords))
        .map(|(idx, _)| idx)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestOverlap {
    pub exact: usize,
    pub thematic: usize,
    pub requester_terms: usize,
    pub candidate_terms: usize,
}

impl InterestOverlap {
    /// Exact matches over the longer of the two lists.
    pub fn density(&self) -> f64 {
        let longest = self.requester_terms.max(self.candidate_terms);
        if longest == 0 {
            0.0
        } else {
            self.exact as f64 / longest as f64
        }
    }
}

fn dedup_terms(terms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .map(|t| normalize_term(t))
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

pub fn interest_overlap(requester: &[String], candidate: &[String], groups: &[KeywordGroup]) -> InterestOverlap {
    let requester = dedup_terms(requester);
    let candidate = dedup_terms(candidate);
    let candidate_set: HashSet<&str> = candidate.iter().map(String::as_str).collect();
    let candidate_groups: HashSet<usize> = candidate
        .iter()
        .flat_map(|term| group_memberships(term, groups))
        .collect();

    let mut exact = 0;
    let mut thematic = 0;
    for term in &requester {
        if candidate_set.contains(term.as_str()) {
            exact += 1;
        } else if group_memberships(term, groups).iter().any(|g| candidate_groups.contains(g)) {
            thematic += 1;
        }
    }

    InterestOverlap {
        exact,
        thematic,
        requester_terms: requester.len(),
        candidate_terms: candidate.len(),
    }
}

pub fn interest_points(requester: &[String], candidate: &[String], groups: &[KeywordGroup]) -> f64 {
    let overlap = interest_overlap(requester, candidate, groups);
    if overlap.requester_terms == 0 || overlap.candidate_terms == 0 {
        return 0.0;
    }

    let earned = overlap.exact as f64 * EXACT_TERM_POINTS + overlap.thematic as f64 * THEMATIC_TERM_POINTS;
    let possible = overlap.requester_terms as f64 * EXACT_TERM_POINTS;
    let mut points = earned / possible * INTEREST_BASE_POINTS;
    if overlap.density() > INTEREST_DENSITY_THRESHOLD {
        points += INTEREST_DENSITY_BONUS;
    }
    points.min(MAX_DIMENSION_POINTS)
}

fn complementary(a: &str, b: &str, pair: &ComplementaryPair) -> bool {
    (contains_any(a, &pair.left) && contains_any(b, &pair.right))
        || (contains_any(a, &pair.right) && contains_any(b, &pair.left))
}

/// Shared strong keyword > complementary roles > shared broad categories.
pub fn collaboration_points(requester: &str, candidate: &str, catalogue: &KeywordCatalogue) -> f64 {
    let a = normalize_text(requester);
    let b = normalize_text(candidate);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut points = 0.0;
    if catalogue
        .collab_strong
        .iter()
        .any(|k| contains_keyword(&a, k) && contains_keyword(&b, k))
    {
        points += COLLAB_STRONG_POINTS;
    }
    if catalogue.collab_complementary.iter().any(|pair| complementary(&a, &b, pair)) {
        points += COLLAB_COMPLEMENTARY_POINTS;
    }
    let shared_categories = catalogue
        .collab_categories
        .iter()
        .filter(|cat| contains_any(&a, &cat.keywords) && contains_any(&b, &cat.keywords))
        .count();
    points += shared_categories as f64 * COLLAB_CATEGORY_POINTS;

    points.min(MAX_DIMENSION_POINTS)
}

/// Food or music: exact match, else shared bucket, else nothing.
pub fn taste_points(requester: &str, candidate: &str, buckets: &[KeywordGroup]) -> f64 {
    let a = normalize_term(requester);
    let b = normalize_term(candidate);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return TASTE_EXACT_POINTS;
    }

    let a = normalize_text(&a);
    let b = normalize_text(&b);
    let shared = buckets
        .iter()
        .any(|bucket| contains_any(&a, &bucket.keywords) && contains_any(&b, &bucket.keywords));
    if shared { TASTE_BUCKET_POINTS } else { 0.0 }
}

/// Raw location contribution: linear decay scaled by weight, plus a flat
/// proximity bonus that is granted even when `weight` is zero.
pub fn location_points(distance_km: f64, radius_km: f64, weight: u8) -> f64 {
    let decay = if radius_km > 0.0 && distance_km <= radius_km {
        1.0 - distance_km / radius_km
    } else {
        0.0
    };
    let mut raw = f64::from(weight) * decay * MAX_DIMENSION_POINTS;

    if distance_km <= VERY_CLOSE_DISTANCE_KM {
        raw += VERY_CLOSE_BONUS;
    } else if distance_km <= CLOSE_DISTANCE_KM {
        raw += CLOSE_BONUS;
    }
    raw
}
