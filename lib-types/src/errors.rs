//! Codec Errors

use thiserror::Error;

/// Error while decoding a wire payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Payload truncated: needed {needed} more bytes")]
    Truncated { needed: usize },

    #[error("Varint exceeds 64 bits")]
    VarintOverflow,

    #[error("Length {len} exceeds limit {max}")]
    LengthLimit { len: u64, max: usize },

    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
