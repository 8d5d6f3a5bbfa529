//! Common utilities for locobj.
//!
//! This crate provides the foundational pieces shared by every locobj crate:
//!
//! - [`BinaryReader`] - Bounds-checked cursor over a byte slice
//! - [`BinaryWriter`] - Little-endian append-only byte buffer
//! - [`checksum`] - The rotate/XOR accumulator guarding object payloads

mod error;
mod reader;
mod writer;

pub mod checksum;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
