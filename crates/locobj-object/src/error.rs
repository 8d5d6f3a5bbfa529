//! Error types for the object crate.

use thiserror::Error;

use crate::{ObjectHeader, ObjectType};

/// Errors that can occur while reading or interpreting objects.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] locobj_common::Error),

    /// Chunk codec error.
    #[error("{0}")]
    Sawyer(#[from] locobj_sawyer::Error),

    /// Header type tag outside 0-33.
    #[error("unknown object type tag: {0}")]
    UnknownObjectType(u8),

    /// Unrecognised type name.
    #[error("unknown object type: {0}")]
    UnknownObjectTypeName(String),

    /// Unrecognised language name.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// Payload shorter than the type's fixed body.
    #[error("{object_type} payload too short: needed {needed} bytes, got {actual}")]
    PayloadTooShort {
        object_type: ObjectType,
        needed: usize,
        actual: usize,
    },

    /// Type-specific validation rejected the payload.
    #[error("invalid {object_type}: {reason}")]
    Invalid {
        object_type: ObjectType,
        reason: &'static str,
    },

    /// String table index outside what the type declares.
    #[error("{object_type} has no string table {index}")]
    StringTableIndex { object_type: ObjectType, index: u8 },

    /// No image table ends exactly at the end of the payload.
    #[error("image table not found in {0} payload")]
    ImageTableNotFound(ObjectType),

    /// Image descriptor pointing past the pixel data.
    #[error("image {index} data offset {offset} exceeds pixel data length {len}")]
    ImageOutOfBounds { index: u32, offset: u32, len: u32 },

    /// Duplicate-previous image with nothing before it.
    #[error("image {0} duplicates a previous image but is first")]
    NoPreviousImage(u32),

    /// Bytes left over after the last section.
    #[error("{object_type} payload has {extra} trailing bytes")]
    TrailingBytes { object_type: ObjectType, extra: usize },

    /// The image id space is exhausted.
    #[error("image id space exhausted")]
    ImageSpaceExhausted,

    /// File header checksum does not match its payload.
    #[error("checksum mismatch for {0}")]
    ChecksumMismatch(ObjectHeader),
}

/// Result type for object operations.
pub type Result<T> = std::result::Result<T, Error>;
