pub mod catalogue;
pub mod connections;
pub mod eligibility;
pub mod scoring;
pub mod similarity;
pub mod state_machine;

pub use catalogue::KeywordCatalogue;
pub use connections::{ActionResponse, ConnectionService};
pub use scoring::{RecommendationEngine, ScoredCandidate};
