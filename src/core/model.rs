//! Regression artifacts consumed by the learned scorer.
//!
//! An artifact is a JSON document tagged with `kind`. Two shapes are
//! understood: a linear model and an ensemble of regression trees (the
//! form gradient-boosted models export to). Both take one
//! [`FeatureVector`] and return one raw prediction.

use crate::core::features::{FeatureVector, FEATURE_COUNT};
use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// A trained regression model predicting one value per feature vector
///
/// Implementations must be read-only after construction so a single
/// instance can serve concurrent ranking calls.
pub trait RegressionModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Deserialized model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Parse and validate an artifact from JSON text
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the artifact can be evaluated against a pair feature vector
    pub fn validate(&self) -> Result<(), LoadError> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::TreeEnsemble(model) => model.validate(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

impl RegressionModel for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> f64 {
        match self {
            ModelArtifact::Linear(model) => model.predict(features),
            ModelArtifact::TreeEnsemble(model) => model.predict(features),
        }
    }
}

/// `intercept + Σ coefficients[i] * x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    fn validate(&self) -> Result<(), LoadError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(LoadError::Invalid(format!(
                "linear model has {} coefficients, expected {}",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }
        Ok(())
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_array())
            .fold(self.intercept, |acc, (w, x)| acc + w * x)
    }
}

/// `base_score + learning_rate * Σ tree(x)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

fn default_learning_rate() -> f64 { 1.0 }

impl TreeEnsemble {
    fn validate(&self) -> Result<(), LoadError> {
        if self.trees.is_empty() {
            return Err(LoadError::Invalid("tree ensemble has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|reason| {
                LoadError::Invalid(format!("tree {}: {}", i, reason))
            })?;
        }
        Ok(())
    }
}

impl RegressionModel for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.evaluate(features)).sum();
        self.base_score + self.learning_rate * sum
    }
}

/// Flat array of nodes, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

impl RegressionTree {
    /// Children must point strictly forward, so evaluation always terminates
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, left, right, .. } = *node {
                if feature >= FEATURE_COUNT {
                    return Err(format!("node {} splits on feature {} (max {})", idx, feature, FEATURE_COUNT - 1));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", idx, child));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, features: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { leaf }) => return *leaf,
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    idx = if features[*feature] <= *threshold { *left } else { *right };
                }
                // unreachable for validated trees
                None => return 0.0,
            }
        }
    }
}
