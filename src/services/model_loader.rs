use crate::core::learned::{LearnedScorer, ModelMetadata};
use crate::core::model::ModelArtifact;
use crate::error::LoadError;
use std::path::Path;

/// Load a learned scorer from an artifact and optional metadata file
///
/// A metadata path that does not exist is ignored. An artifact that is
/// missing, unreadable or invalid, or metadata that exists but cannot be
/// parsed, is a `LoadError`. Callers decide whether to fall back.
pub fn load_learned_scorer<P, M>(model_path: P, meta_path: Option<M>) -> Result<LearnedScorer, LoadError>
where
    P: AsRef<Path>,
    M: AsRef<Path>,
{
    let artifact = load_artifact(model_path.as_ref())?;

    let metadata = match meta_path {
        Some(path) if path.as_ref().exists() => load_metadata(path.as_ref())?,
        Some(path) => {
            tracing::debug!("No model metadata at {}", path.as_ref().display());
            ModelMetadata::default()
        }
        None => ModelMetadata::default(),
    };

    tracing::info!(
        "Loaded {} model from {}",
        artifact.kind(),
        model_path.as_ref().display()
    );

    Ok(LearnedScorer::new(Box::new(artifact), metadata))
}

/// Read and validate a model artifact
pub fn load_artifact(path: &Path) -> Result<ModelArtifact, LoadError> {
    let raw = std::fs::read_to_string(path)?;
    ModelArtifact::from_json(&raw)
}

/// Read model metadata
pub fn load_metadata(path: &Path) -> Result<ModelMetadata, LoadError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
