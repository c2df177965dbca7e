use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};

use crate::io_struct::FeatureRecord;
use crate::pipeline::TreePipeline;

/// Anything that maps a batch of rows to one label per row.
pub trait Predictor: Send + Sync + fmt::Debug {
    fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<String>, PredictError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("feature schema mismatch: model expects {expected:?}, request has {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("unknown category {value:?} for feature '{feature}'")]
    UnknownCategory { feature: String, value: String },

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model artifact not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode model artifact: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// The process-wide model, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub enum ModelHandle {
    Loaded(Arc<dyn Predictor>),
    Unavailable(String),
}

impl ModelHandle {
    /// Attempts the one and only artifact load. Never fails: a broken
    /// artifact yields an `Unavailable` handle so the server can still start
    /// and report its degraded state.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match TreePipeline::from_path(path) {
            Ok(pipeline) => {
                info!(
                    "Model loaded successfully from {} ({} trees, {} classes)",
                    path.display(),
                    pipeline.tree_count(),
                    pipeline.classes().len()
                );
                ModelHandle::Loaded(Arc::new(pipeline))
            }
            Err(e) => {
                error!("Error loading model: {}", e);
                ModelHandle::Unavailable(e.to_string())
            }
        }
    }

    pub fn from_predictor(predictor: impl Predictor + 'static) -> Self {
        ModelHandle::Loaded(Arc::new(predictor))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelHandle::Unavailable(reason.into())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelHandle::Loaded(_))
    }

    pub fn predictor(&self) -> Option<&dyn Predictor> {
        match self {
            ModelHandle::Loaded(predictor) => Some(predictor.as_ref()),
            ModelHandle::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            ModelHandle::Loaded(_) => None,
            ModelHandle::Unavailable(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_artifact_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let handle = ModelHandle::load(dir.path().join("missing.json"));
        assert!(!handle.is_loaded());
        assert!(handle.predictor().is_none());
        assert!(handle.unavailable_reason().unwrap().contains("not found"));
    }

    #[test]
    fn test_load_garbage_artifact_is_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95 not json at all").unwrap();
        let handle = ModelHandle::load(file.path());
        assert!(!handle.is_loaded());
        assert!(handle.unavailable_reason().unwrap().contains("decode"));
    }

    #[test]
    fn test_load_bundled_artifact() {
        let handle = ModelHandle::load(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/models/fertilizer_pipeline.json"
        ));
        assert!(handle.is_loaded());
        assert!(handle.unavailable_reason().is_none());
    }

    #[test]
    fn test_unavailable_constructor() {
        let handle = ModelHandle::unavailable("disabled");
        assert_eq!(handle.unavailable_reason(), Some("disabled"));
    }
}
