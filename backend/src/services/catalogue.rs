use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::constants::*;

/// A named set of keywords. A text or term belongs to the group when it
/// contains one of the keywords at a word start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplementaryPair {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

/// Keyword tables used by the scoring engine. Loaded from a JSON file when
/// `KEYWORD_CATALOGUE_PATH` is set, otherwise built from the constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCatalogue {
    pub interest_groups: Vec<KeywordGroup>,
    pub collab_strong: Vec<String>,
    pub collab_complementary: Vec<ComplementaryPair>,
    pub collab_categories: Vec<KeywordGroup>,
    pub cuisine_buckets: Vec<KeywordGroup>,
    pub genre_buckets: Vec<KeywordGroup>,
}

impl Default for KeywordCatalogue {
    fn default() -> Self {
        Self {
            interest_groups: groups(INTEREST_GROUPS),
            collab_strong: COLLAB_STRONG_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            collab_complementary: COLLAB_COMPLEMENTARY_PAIRS
                .iter()
                .map(|(left, right)| ComplementaryPair {
                    left: left.iter().map(|k| k.to_string()).collect(),
                    right: right.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
            collab_categories: groups(COLLAB_CATEGORIES),
            cuisine_buckets: groups(CUISINE_BUCKETS),
            genre_buckets: groups(GENRE_BUCKETS),
        }
    }
}

impl KeywordCatalogue {
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut catalogue: Self = serde_json::from_str(raw).context("invalid keyword catalogue")?;
        catalogue.normalize();
        Ok(catalogue)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read keyword catalogue {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Default tables unless a path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let catalogue = Self::from_file(path)?;
                tracing::info!("Loaded keyword catalogue from {}", path);
                Ok(catalogue)
            }
            None => Ok(Self::default()),
        }
    }

    // Matching is done on lowercased text, so keep the tables lowercased too.
    fn normalize(&mut self) {
        let lower = |v: &mut Vec<String>| v.iter_mut().for_each(|k| *k = k.trim().to_lowercase());
        for group in self
            .interest_groups
            .iter_mut()
            .chain(self.collab_categories.iter_mut())
            .chain(self.cuisine_buckets.iter_mut())
            .chain(self.genre_buckets.iter_mut())
        {
            lower(&mut group.keywords);
        }
        lower(&mut self.collab_strong);
        for pair in &mut self.collab_complementary {
            lower(&mut pair.left);
            lower(&mut pair.right);
        }
    }
}

fn groups(table: &[(&str, &[&str])]) -> Vec<KeywordGroup> {
    table.iter().map(|(name, keywords)| KeywordGroup::new(name, keywords)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue_has_all_interest_groups() {
        let catalogue = KeywordCatalogue::default();
        let names: Vec<&str> = catalogue.interest_groups.iter().map(|g| g.name.as_str()).collect();
        for expected in ["music", "visual", "tech", "crafts", "games", "outdoor", "food", "fitness"] {
            assert!(names.contains(&expected), "missing group {}", expected);
        }
    }

    #[test]
    fn test_catalogue_from_json_is_lowercased() {
        let raw = r#"{
            "interest_groups": [{"name": "boats", "keywords": ["Sailing", " Rowing"]}],
            "collab_strong": ["Regatta"],
            "collab_complementary": [{"left": ["Skipper"], "right": ["Crew"]}],
            "collab_categories": [],
            "cuisine_buckets": [],
            "genre_buckets": []
        }"#;
        let catalogue = KeywordCatalogue::from_json(raw).unwrap();
        assert_eq!(catalogue.interest_groups[0].keywords, vec!["sailing", "rowing"]);
        assert_eq!(catalogue.collab_strong, vec!["regatta"]);
        assert_eq!(catalogue.collab_complementary[0].right, vec!["crew"]);
    }

    #[test]
    fn test_malformed_catalogue_is_rejected() {
        assert!(KeywordCatalogue::from_json("{\"interest_groups\": 3}").is_err());
    }
}
