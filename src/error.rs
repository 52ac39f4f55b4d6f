use thiserror::Error;

/// Errors surfaced by the codec. None are retried internally; the caller
/// decides what, if anything, to do about them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoxelError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("invalid bit length: {0}")]
    InvalidLength(String),

    #[error("corrupt pattern: {0}")]
    CorruptPattern(String),

    #[error("unknown ECC scheme: {0}")]
    UnknownEcc(String),
}

pub type Result<T, E = VoxelError> = std::result::Result<T, E>;
