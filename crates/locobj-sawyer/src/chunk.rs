//! Chunk framing: `encoding: u8`, `length: u32`, then `length` encoded bytes.

use locobj_common::{BinaryReader, BinaryWriter};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Encoding, Error, Result};

/// On-disk chunk header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ChunkHeader {
    /// Raw [`Encoding`] tag
    pub encoding: u8,
    /// Length of the encoded bytes that follow
    pub length: u32,
}

impl ChunkHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 5;
}

/// Read one chunk at the reader's position and return its decoded bytes.
pub fn read_chunk(reader: &mut BinaryReader<'_>) -> Result<Vec<u8>> {
    let header = reader.read_struct::<ChunkHeader>()?;
    let encoding = Encoding::try_from(header.encoding)?;
    let encoded = reader.read_bytes(header.length as usize)?;
    encoding.decode(encoded)
}

/// Encode `data` and append it as one chunk.
pub fn write_chunk(writer: &mut BinaryWriter, encoding: Encoding, data: &[u8]) -> Result<()> {
    let encoded = encoding.encode(data);
    let length = u32::try_from(encoded.len()).map_err(|_| Error::ChunkTooLarge(encoded.len()))?;
    writer.write_struct(&ChunkHeader {
        encoding: encoding as u8,
        length,
    });
    writer.write_bytes(&encoded);
    Ok(())
}
