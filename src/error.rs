use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Two matrices do not satisfy the dimensional relationship an operation requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{op}: incompatible shapes {lhs:?} and {rhs:?}")]
pub struct ShapeError {
    pub op: &'static str,
    pub lhs: (usize, usize),
    pub rhs: (usize, usize),
}

impl ShapeError {
    pub fn new(op: &'static str, lhs: (usize, usize), rhs: (usize, usize)) -> Self {
        Self { op, lhs, rhs }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Backward or update was requested before the state it consumes was recorded.
    #[error("{layer} has no recorded state, run forward (and backward) first")]
    NotForwarded { layer: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
