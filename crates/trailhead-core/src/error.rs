//! Error taxonomy shared by every crate.

use thiserror::Error;

/// Errors raised by the simulation core.
///
/// Per-frame numeric edge cases are guarded in place and never show up here.
#[derive(Debug, Error)]
pub enum SimError {
    /// Physics was used before initialization completed.
    #[error("physics engine used before initialization completed")]
    NotInitialized,

    /// Physics initialization was rejected. Fatal for the session.
    #[error("physics initialization failed: {0}")]
    InitFailed(String),

    /// A body operation named a handle the physics world does not know
    /// (or one that cannot take that operation).
    #[error("invalid body handle: {0}")]
    InvalidHandle(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
