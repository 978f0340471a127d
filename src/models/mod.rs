// Model exports
pub mod directory;
pub mod domain;
pub mod requests;
pub mod responses;

pub use directory::ProfileDirectory;
pub use domain::{AttributeRecord, Algorithm, BudgetValue, MatchResult, RuleWeights, UserId, parse_hobbies, normalize_hobbies};
pub use requests::MatchesQuery;
pub use responses::{MatchesResponse, HealthResponse, ErrorResponse};
