//! Error types for the chunk codec.

use thiserror::Error;

/// Errors that can occur while encoding or decoding chunks.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] locobj_common::Error),

    /// Encoding tag outside the known range.
    #[error("unknown chunk encoding: {0}")]
    UnknownEncoding(u8),

    /// A run-length code ran past the end of the input.
    #[error("invalid RLE run at offset {position}")]
    InvalidRle { position: usize },

    /// A back-reference pointed before the start of the output.
    #[error("invalid back-reference at offset {position}: distance {distance} exceeds {available} decoded bytes")]
    InvalidBackReference {
        position: usize,
        distance: usize,
        available: usize,
    },

    /// Encoded chunk does not fit the 32-bit length field.
    #[error("chunk too large: {0} bytes")]
    ChunkTooLarge(usize),
}

/// Result type for chunk codec operations.
pub type Result<T> = std::result::Result<T, Error>;
