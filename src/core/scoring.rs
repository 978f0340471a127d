use crate::core::features::{extract, FeatureVector};
use crate::models::{AttributeRecord, RuleWeights};

/// Calculate the rule-based compatibility score (0-100) for a pair of users
///
/// Scoring formula:
/// score = (
///     cleanliness_similarity * 0.20 +
///     smoking_match * 0.15 +
///     drinking_match * 0.15 +
///     sleeping_compatibility * 0.10 +
///     hobby_jaccard * 0.15 +
///     budget_similarity * 0.15 +
///     location_match * 0.10
/// )
///
/// The weighted sum is clamped to `[0, 1]`, scaled by 100 and rounded to
/// two decimals. Deterministic and side-effect free.
pub fn rule_based_score(u1: &AttributeRecord, u2: &AttributeRecord, weights: &RuleWeights) -> f64 {
    weighted_score(&extract(u1, u2), weights)
}

/// Combine the rule-relevant features of a vector into a 0-100 score
///
/// Hobby overlap, average cleanliness and budget ratio are ignored here;
/// they only feed learned models.
pub fn weighted_score(features: &FeatureVector, weights: &RuleWeights) -> f64 {
    let total = features.cleanliness_similarity() * weights.cleanliness
        + features.smoking_match() * weights.smoking
        + features.drinking_match() * weights.drinking
        + features.sleeping_compatibility() * weights.sleeping
        + features.hobby_jaccard() * weights.hobbies
        + features.budget_similarity() * weights.budget
        + features.location_match() * weights.location;

    round2(100.0 * total.clamp(0.0, 1.0))
}

/// Round to two decimals
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
