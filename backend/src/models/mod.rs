pub mod connections;
pub mod users;

pub use connections::{Connection, ConnectionStatus, ConnectionSummary, DuplicatePair, ordered_pair};
pub use users::{User, GeoPoint, ImportanceWeights, ProfileRow, ProfileSnapshot};
