use crate::core::features::{extract, FeatureVector, FEATURE_NAMES};
use crate::core::model::RegressionModel;
use crate::models::AttributeRecord;
use serde::{Deserialize, Serialize};

/// Informational metadata shipped next to a trained artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Free-form training statistics
    #[serde(default)]
    pub training: Option<serde_json::Value>,
}

impl ModelMetadata {
    /// Whether the recorded feature names match the extractor's order
    ///
    /// Returns `None` when the metadata carries no feature names.
    pub fn matches_feature_order(&self) -> Option<bool> {
        self.feature_names
            .as_ref()
            .map(|names| names.iter().map(String::as_str).eq(FEATURE_NAMES.iter().copied()))
    }
}

/// Scores user pairs with an externally trained regression model
///
/// Holds only the loaded model and its metadata. Safe to share across
/// concurrent ranking calls behind an `Arc`.
pub struct LearnedScorer {
    model: Box<dyn RegressionModel>,
    metadata: ModelMetadata,
}

impl LearnedScorer {
    pub fn new(model: Box<dyn RegressionModel>, metadata: ModelMetadata) -> Self {
        if metadata.matches_feature_order() == Some(false) {
            tracing::warn!(
                "Model metadata feature names {:?} differ from extractor order {:?}",
                metadata.feature_names,
                FEATURE_NAMES
            );
        }
        Self { model, metadata }
    }

    /// Score a pair (0-100) from the raw model prediction
    pub fn score(&self, u1: &AttributeRecord, u2: &AttributeRecord) -> f64 {
        self.score_features(&extract(u1, u2))
    }

    /// Clip the model prediction for an already extracted vector to `[0, 100]`
    ///
    /// Non-finite predictions score 0.0.
    pub fn score_features(&self, features: &FeatureVector) -> f64 {
        let raw = self.model.predict(features);
        if !raw.is_finite() {
            return 0.0;
        }
        raw.clamp(0.0, 100.0)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl std::fmt::Debug for LearnedScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnedScorer")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_hobbies, BudgetValue};

    /// Returns a fixed prediction regardless of input
    struct ConstantModel(f64);

    impl RegressionModel for ConstantModel {
        fn predict(&self, _features: &FeatureVector) -> f64 {
            self.0
        }
    }

    /// Returns 100 * location_match
    struct LocationModel;

    impl RegressionModel for LocationModel {
        fn predict(&self, features: &FeatureVector) -> f64 {
            100.0 * features.location_match()
        }
    }

    fn create_profile(id: i64, location: &str) -> AttributeRecord {
        AttributeRecord {
            user_id: id,
            cleanliness: Some(3.0),
            smoking: Some("no".to_string()),
            drinking: Some("no".to_string()),
            sleeping: Some("early".to_string()),
            hobbies: parse_hobbies("music"),
            budget: Some(BudgetValue::Amount(10000.0)),
            location: Some(location.to_string()),
        }
    }

    #[test]
    fn test_prediction_is_clipped() {
        let a = create_profile(1, "downtown");
        let b = create_profile(2, "downtown");

        let high = LearnedScorer::new(Box::new(ConstantModel(140.0)), ModelMetadata::default());
        assert_eq!(high.score(&a, &b), 100.0);

        let low = LearnedScorer::new(Box::new(ConstantModel(-3.0)), ModelMetadata::default());
        assert_eq!(low.score(&a, &b), 0.0);

        let nan = LearnedScorer::new(Box::new(ConstantModel(f64::NAN)), ModelMetadata::default());
        assert_eq!(nan.score(&a, &b), 0.0);

        let mid = LearnedScorer::new(Box::new(ConstantModel(61.237)), ModelMetadata::default());
        assert_eq!(mid.score(&a, &b), 61.237);
    }

    #[test]
    fn test_model_sees_trained_order() {
        let scorer = LearnedScorer::new(Box::new(LocationModel), ModelMetadata::default());
        let a = create_profile(1, "downtown");
        assert_eq!(scorer.score(&a, &create_profile(2, "Downtown")), 100.0);
        assert_eq!(scorer.score(&a, &create_profile(3, "suburbs")), 0.0);
    }

    #[test]
    fn test_metadata_feature_order() {
        let mut meta = ModelMetadata::default();
        assert_eq!(meta.matches_feature_order(), None);

        meta.feature_names = Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect());
        assert_eq!(meta.matches_feature_order(), Some(true));

        meta.feature_names.as_mut().unwrap().swap(0, 1);
        assert_eq!(meta.matches_feature_order(), Some(false));
    }
}
