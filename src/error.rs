use std::path::PathBuf;

use thiserror::Error;

/// Contract violations raised by the network core.
///
/// Every variant is detected before any numeric work begins, so a returned
/// error never leaves a half-updated network behind.
#[derive(Debug, Error)]
pub enum FnnError {
    #[error("shape mismatch in {op}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid training input: {0}")]
    InvalidTrainingInput(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failures of the I/O collaborators: dataset files, model files, images.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data: {0}")]
    Format(String),

    #[error("cannot parse model file: {0}")]
    Parse(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Network(#[from] FnnError),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io { path: path.into(), source }
    }
}
