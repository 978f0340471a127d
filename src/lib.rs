//! Roommate Matcher - Compatibility scoring and ranking for roommate matching
//!
//! This library ranks candidate roommates for a user. It turns a pair of
//! profiles into a fixed-order feature vector, scores it with either a
//! transparent rule-based scorer or a trained regression model, and
//! returns the top N candidates.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{extract, rank, FeatureVector, LearnedScorer, Matcher, Scorer};
pub use error::{LoadError, MatchError, ProfileLoadError};
pub use models::{AttributeRecord, Algorithm, BudgetValue, MatchResult, MatchesResponse, ProfileDirectory, RuleWeights, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let v = extract(&AttributeRecord::new(1), &AttributeRecord::new(2));
        assert_eq!(v.as_array().len(), crate::core::FEATURE_COUNT);
    }
}
