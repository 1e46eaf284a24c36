//! Error types for rackhost-core.

use thiserror::Error;

/// Error type for rackhost-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid parameter range: min={min}, max={max}")]
    InvalidRange { min: f32, max: f32 },

    #[error("Parameter index {index} out of bounds (count {count})")]
    ParameterOutOfBounds { index: u32, count: u32 },

    #[error("Engine rejected client '{0}'")]
    ClientRejected(String),

    #[error(transparent)]
    RtList(#[from] RtListError),
}

/// Errors from realtime list operations.
///
/// Returned from the control thread paths only; audio-thread callers
/// treat a failed acquisition as "drop the element".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtListError {
    #[error("Realtime pool exhausted")]
    PoolExhausted,

    #[error("Lists belong to different pools ({left:?} vs {right:?})")]
    PoolMismatch {
        left: crate::rt::PoolId,
        right: crate::rt::PoolId,
    },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
