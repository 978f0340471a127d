use crate::core::learned::LearnedScorer;
use crate::core::ranker::{rank, Scorer};
use crate::error::MatchError;
use crate::models::{Algorithm, MatchesResponse, ProfileDirectory, RuleWeights, UserId};
use std::sync::Arc;

/// Main matching orchestrator
///
/// Owns the immutable profile directory, the rule-based scorer and an
/// optional learned scorer. Requests for `ai` fall back to the rule-based
/// scorer when no learned model is loaded, and the response reports the
/// algorithm that actually ran.
#[derive(Debug, Clone)]
pub struct Matcher {
    profiles: Arc<ProfileDirectory>,
    rule: Scorer,
    learned: Option<Scorer>,
}

impl Matcher {
    pub fn new(profiles: Arc<ProfileDirectory>, weights: RuleWeights) -> Self {
        Self {
            profiles,
            rule: Scorer::RuleBased(weights),
            learned: None,
        }
    }

    pub fn with_default_weights(profiles: Arc<ProfileDirectory>) -> Self {
        Self::new(profiles, RuleWeights::default())
    }

    /// Attach a loaded learned scorer
    pub fn with_learned(mut self, learned: Arc<LearnedScorer>) -> Self {
        self.learned = Some(Scorer::Learned(learned));
        self
    }

    /// Pick the scorer for a requested algorithm, applying the fallback policy
    pub fn resolve(&self, requested: Algorithm) -> &Scorer {
        match (requested, &self.learned) {
            (Algorithm::Ai, Some(learned)) => learned,
            (Algorithm::Ai, None) => {
                tracing::debug!("Learned model not loaded, falling back to rule-based scoring");
                &self.rule
            }
            (Algorithm::Rule, _) => &self.rule,
        }
    }

    /// Find the top `n` matches for `target_id`
    ///
    /// # Arguments
    /// * `target_id` - User to find roommates for
    /// * `n` - Maximum number of matches to return
    /// * `requested` - Algorithm asked for by the caller
    pub fn get_matches(
        &self,
        target_id: UserId,
        n: usize,
        requested: Algorithm,
    ) -> Result<MatchesResponse, MatchError> {
        let scorer = self.resolve(requested);
        let matches = rank(target_id, &self.profiles, scorer, n)?;

        Ok(MatchesResponse {
            algo: scorer.algorithm(),
            matches,
        })
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn learned_model_loaded(&self) -> bool {
        self.learned.is_some()
    }
}
