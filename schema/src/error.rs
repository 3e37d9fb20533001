use thiserror::Error;

/// Failures raised while writing an encoding into a caller-provided buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("Buffer too small: need {needed} more bytes, {available} available")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("Sequence length {0} does not fit the 32-bit wire count")]
    LengthOverflow(usize),

    #[error("Alignment must be a non-zero power of two, got {0}")]
    InvalidAlignment(usize),
}

pub type Result<T> = std::result::Result<T, WireError>;

#[cold]
pub const fn buffer_too_small(needed: usize, available: usize) -> WireError {
    WireError::BufferTooSmall { needed, available }
}
