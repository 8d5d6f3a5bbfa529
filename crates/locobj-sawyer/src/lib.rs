//! Chunk codec for Locomotion object files.
//!
//! An object file stores its payload as a single chunk: a one-byte encoding
//! tag, a little-endian length, then the encoded bytes. Four encodings exist:
//!
//! - [`Encoding::Uncompressed`] - bytes stored as-is
//! - [`Encoding::RunLengthSingle`] - literal runs and repeated-byte runs
//! - [`Encoding::RunLengthMulti`] - back-references layered over single RLE
//! - [`Encoding::Rotate`] - per-byte bit rotation (obfuscation only)
//!
//! # Example
//!
//! ```
//! use locobj_common::{BinaryReader, BinaryWriter};
//! use locobj_sawyer::{read_chunk, write_chunk, Encoding};
//!
//! let mut writer = BinaryWriter::new();
//! write_chunk(&mut writer, Encoding::RunLengthSingle, b"aaaaaaaab").unwrap();
//!
//! let bytes = writer.into_inner();
//! let mut reader = BinaryReader::new(&bytes);
//! assert_eq!(read_chunk(&mut reader).unwrap(), b"aaaaaaaab");
//! ```

mod chunk;
mod encoding;
mod error;
mod rle;
mod rotate;

pub use chunk::{read_chunk, write_chunk, ChunkHeader};
pub use encoding::Encoding;
pub use error::{Error, Result};
