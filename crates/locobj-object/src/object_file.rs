//! `.DAT` object files: a header followed by one encoded chunk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use locobj_common::{BinaryReader, BinaryWriter};
use locobj_sawyer::{read_chunk, write_chunk};
use zerocopy::FromBytes;

use crate::{Error, ObjectHeader, ObjectType, Result};

/// An object file decoded into header and payload.
#[derive(Debug, Clone)]
pub struct ObjectFile {
    pub header: ObjectHeader,
    pub payload: Vec<u8>,
}

impl ObjectFile {
    pub fn new(header: ObjectHeader, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    /// Read and decode a whole file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Read only the leading header.
    pub fn read_header(path: impl AsRef<Path>) -> Result<ObjectHeader> {
        let mut buf = [0u8; ObjectHeader::SIZE];
        File::open(path)?.read_exact(&mut buf)?;
        Ok(ObjectHeader::read_from_bytes(&buf).map_err(|_| locobj_common::Error::UnexpectedEof {
            needed: ObjectHeader::SIZE,
            available: buf.len(),
        })?)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(bytes);
        let header = reader.read_struct::<ObjectHeader>()?;
        let payload = read_chunk(&mut reader)?;
        Ok(Self { header, payload })
    }

    pub fn object_type(&self) -> Result<ObjectType> {
        self.header
            .object_type()
            .ok_or(Error::UnknownObjectType(self.header.type_tag()))
    }

    pub fn is_checksum_valid(&self) -> bool {
        self.header.is_checksum_valid(&self.payload)
    }

    /// Append header and chunk, encoded the way the type is stored.
    pub fn write_to(&self, writer: &mut BinaryWriter) -> Result<()> {
        let encoding = self.object_type()?.best_encoding();
        writer.write_struct(&self.header);
        write_chunk(writer, encoding, &self.payload)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::with_capacity(ObjectHeader::SIZE + 5 + self.payload.len());
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}
