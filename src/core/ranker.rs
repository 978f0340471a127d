use crate::core::learned::LearnedScorer;
use crate::core::scoring::{round2, rule_based_score};
use crate::error::MatchError;
use crate::models::{Algorithm, AttributeRecord, MatchResult, ProfileDirectory, RuleWeights, UserId};
use std::sync::Arc;

/// Pair scorer chosen at construction time
#[derive(Debug, Clone)]
pub enum Scorer {
    RuleBased(RuleWeights),
    Learned(Arc<LearnedScorer>),
}

impl Scorer {
    /// Score a pair of users (0-100)
    pub fn score(&self, u1: &AttributeRecord, u2: &AttributeRecord) -> f64 {
        match self {
            Scorer::RuleBased(weights) => rule_based_score(u1, u2, weights),
            Scorer::Learned(model) => model.score(u1, u2),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Scorer::RuleBased(_) => Algorithm::Rule,
            Scorer::Learned(_) => Algorithm::Ai,
        }
    }
}

/// Rank every other profile against `target_id` and keep the best `n`
///
/// Full scan over the directory, no pruning. Results are sorted by score
/// (descending, rounded to two decimals); equal scores keep directory
/// order because the sort is stable. Fewer than `n` candidates returns
/// all of them.
///
/// # Errors
/// * `MatchError::Configuration` - the learned scorer was given an empty directory
/// * `MatchError::NotFound` - `target_id` is not in the directory
pub fn rank(
    target_id: UserId,
    profiles: &ProfileDirectory,
    scorer: &Scorer,
    n: usize,
) -> Result<Vec<MatchResult>, MatchError> {
    if profiles.is_empty() && matches!(scorer, Scorer::Learned(_)) {
        return Err(MatchError::Configuration(
            "profiles not set for learned scorer".to_string(),
        ));
    }

    let target = profiles
        .get(target_id)
        .ok_or(MatchError::NotFound(target_id))?;

    let mut results: Vec<MatchResult> = profiles
        .iter()
        .filter(|candidate| candidate.user_id != target_id)
        .map(|candidate| MatchResult {
            user_id: candidate.user_id,
            score: round2(scorer.score(target, candidate)),
        })
        .collect();

    // sort_by is stable: ties keep directory order
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    results.truncate(n);

    Ok(results)
}
