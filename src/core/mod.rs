// Core algorithm exports
pub mod features;
pub mod learned;
pub mod matcher;
pub mod model;
pub mod ranker;
pub mod scoring;

pub use features::{extract, sleeping_compat, budget_similarity, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use learned::{LearnedScorer, ModelMetadata};
pub use matcher::Matcher;
pub use model::{ModelArtifact, RegressionModel};
pub use ranker::{rank, Scorer};
pub use scoring::{rule_based_score, weighted_score};
