//! Error types for the manager crate.

use std::path::PathBuf;

use locobj_object::{ObjectHeader, ObjectType};
use thiserror::Error;

/// Errors that can occur while indexing, loading or installing objects.
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

    /// Object parsing error.
    #[error("{0}")]
    Object(#[from] locobj_object::Error),

    /// Directory walk error.
    #[error("directory scan failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// No index entry for the header.
    #[error("object not installed: {0}")]
    NotInstalled(ObjectHeader),

    /// The file named by the index holds a different object.
    #[error("index entry for {expected} points at {path:?}, which contains {actual}")]
    HeaderMismatch {
        expected: ObjectHeader,
        actual: ObjectHeader,
        path: PathBuf,
    },

    /// Stored checksum does not match the payload.
    #[error("checksum mismatch for {0}")]
    ChecksumMismatch(ObjectHeader),

    /// Type-specific validation rejected the payload.
    #[error("{header} failed validation: {source}")]
    ValidationFailed {
        header: ObjectHeader,
        #[source]
        source: locobj_object::Error,
    },

    /// Every slot of the type is in use.
    #[error("no free {0} slot")]
    NoFreeSlot(ObjectType),

    /// The requested slot already holds an object.
    #[error("slot {object_type}#{id} is occupied")]
    SlotOccupied { object_type: ObjectType, id: u16 },

    /// Slot id beyond the type's capacity.
    #[error("slot {object_type}#{id} out of range")]
    SlotOutOfRange { object_type: ObjectType, id: u16 },

    /// The image id space is exhausted.
    #[error("image id space exhausted")]
    ImageSpaceExhausted,

    /// An object with the same identity is already installed.
    #[error("object already installed: {0}")]
    AlreadyInstalled(ObjectHeader),

    /// A header names no loaded object.
    #[error("object not loaded: {0}")]
    NotLoaded(ObjectHeader),

    /// Header type tag outside the known range.
    #[error("unknown object type tag: {0}")]
    UnknownObjectType(u8),

    /// Growing a buffer failed.
    #[error("out of memory growing {what} to {requested} bytes")]
    OutOfMemory { what: &'static str, requested: usize },

    /// Descriptor record could not be decoded.
    #[error("corrupt index entry at offset {0}")]
    CorruptIndex(usize),
}

/// Result type for manager operations.
pub type Result<T> = std::result::Result<T, Error>;
