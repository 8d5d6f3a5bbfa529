//! Index descriptors: one variable-length record per installed file.
//!
//! ```text
//! header          16 bytes
//! filename        NUL-terminated
//! decoded_size    u32, 0xFFFFFFFF while partial
//! name            NUL-terminated display name
//! num_images      u32
//! ratings         intelligence, aggressiveness, competitiveness: u8
//! sub_type        u8, always 0
//! padding         4 bytes
//! required        u8 count + headers
//! will_load       u8 count + headers
//! ```

use std::borrow::Cow;

use locobj_common::{BinaryReader, BinaryWriter};
use locobj_object::{DependentObjects, ObjectHeader};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// `decoded_size` of a record that has not been through a temporary load.
pub const PARTIAL_DECODED_SIZE: u32 = u32::MAX;

const STAT_PADDING: [u8; 4] = [0; 4];

/// Borrowed view of one descriptor inside the index buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectIndexEntry<'a> {
    pub header: ObjectHeader,
    pub filename: &'a [u8],
    pub decoded_size: u32,
    pub name: &'a [u8],
    pub num_images: u32,
    pub intelligence: u8,
    pub aggressiveness: u8,
    pub competitiveness: u8,
    pub required: &'a [ObjectHeader],
    pub will_load: &'a [ObjectHeader],
}

impl<'a> ObjectIndexEntry<'a> {
    /// Header and file name only.
    pub fn partial(header: ObjectHeader, filename: &'a [u8]) -> Self {
        Self {
            header,
            filename,
            decoded_size: PARTIAL_DECODED_SIZE,
            name: &[],
            num_images: 0,
            intelligence: 0,
            aggressiveness: 0,
            competitiveness: 0,
            required: &[],
            will_load: &[],
        }
    }

    pub fn is_partial(&self) -> bool {
        self.decoded_size == PARTIAL_DECODED_SIZE
    }

    pub fn filename_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.filename)
    }

    pub fn name_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name)
    }

    /// Decode one record and advance past it.
    pub fn read(reader: &mut BinaryReader<'a>) -> Result<Self> {
        let header = reader.read_struct::<ObjectHeader>()?;
        let filename = reader.read_cstr()?;
        let decoded_size = reader.read_u32()?;
        let name = reader.read_cstr()?;
        let num_images = reader.read_u32()?;
        let intelligence = reader.read_u8()?;
        let aggressiveness = reader.read_u8()?;
        let competitiveness = reader.read_u8()?;
        let _sub_type = reader.read_u8()?;
        reader.skip(STAT_PADDING.len())?;
        let required = read_headers(reader)?;
        let will_load = read_headers(reader)?;

        Ok(Self {
            header,
            filename,
            decoded_size,
            name,
            num_images,
            intelligence,
            aggressiveness,
            competitiveness,
            required,
            will_load,
        })
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer.write_struct(&self.header);
        writer.write_cstr(self.filename);
        writer.write_u32(self.decoded_size);
        writer.write_cstr(self.name);
        writer.write_u32(self.num_images);
        writer.write_u8(self.intelligence);
        writer.write_u8(self.aggressiveness);
        writer.write_u8(self.competitiveness);
        writer.write_u8(0);
        writer.write_bytes(&STAT_PADDING);
        write_headers(writer, self.required);
        write_headers(writer, self.will_load);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.write(&mut writer);
        writer.into_inner()
    }

    /// Dependency lists as owned vectors.
    pub fn dependencies(&self) -> DependentObjects {
        DependentObjects {
            required: self.required.to_vec(),
            will_load: self.will_load.to_vec(),
        }
    }
}

fn read_headers<'a>(reader: &mut BinaryReader<'a>) -> Result<&'a [ObjectHeader]> {
    let count = usize::from(reader.read_u8()?);
    let start = reader.position();
    let bytes = reader.read_bytes(count * ObjectHeader::SIZE)?;
    <[ObjectHeader]>::ref_from_bytes(bytes).map_err(|_| Error::CorruptIndex(start))
}

fn write_headers(writer: &mut BinaryWriter, headers: &[ObjectHeader]) {
    let count = headers.len().min(usize::from(u8::MAX));
    writer.write_u8(count as u8);
    for header in &headers[..count] {
        writer.write_struct(header);
    }
}

/// Iterator over `count` records starting at the reader's position.
pub struct Entries<'a> {
    reader: BinaryReader<'a>,
    remaining: usize,
}

impl<'a> Entries<'a> {
    pub fn new(buffer: &'a [u8], count: usize) -> Self {
        Self {
            reader: BinaryReader::new(buffer),
            remaining: count,
        }
    }

    /// Offset of the next record.
    pub fn position(&self) -> usize {
        self.reader.position()
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<ObjectIndexEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let result = ObjectIndexEntry::read(&mut self.reader);
        if result.is_err() {
            self.remaining = 0;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locobj_object::fixtures::object_header;
    use locobj_object::ObjectType;

    #[test]
    fn test_full_record() {
        let required = [object_header(ObjectType::Track, "TRACKST")];
        let will_load = [
            object_header(ObjectType::TrackSignal, "SIGSUS"),
            object_header(ObjectType::Bridge, "BRDGBRCK"),
        ];
        let entry = ObjectIndexEntry {
            header: object_header(ObjectType::Vehicle, "4MT"),
            filename: b"4MT.DAT",
            decoded_size: 2048,
            name: b"4MT Class",
            num_images: 96,
            intelligence: 0,
            aggressiveness: 0,
            competitiveness: 0,
            required: &required,
            will_load: &will_load,
        };
        let bytes = entry.to_bytes();
        assert_eq!(bytes.len(), 16 + 8 + 4 + 10 + 12 + 1 + 16 + 1 + 32);

        let mut reader = BinaryReader::new(&bytes);
        let read = ObjectIndexEntry::read(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(read, entry);
        assert_eq!(read.name_lossy(), "4MT Class");
        assert!(!read.is_partial());
    }

    #[test]
    fn test_partial_record() {
        let entry = ObjectIndexEntry::partial(object_header(ObjectType::Wall, "FENCE1"), b"FENCE1.DAT");
        let bytes = entry.to_bytes();
        assert_eq!(&bytes[27..31], &PARTIAL_DECODED_SIZE.to_le_bytes());
        let read = ObjectIndexEntry::read(&mut BinaryReader::new(&bytes)).unwrap();
        assert!(read.is_partial());
        assert!(read.name.is_empty());
        assert!(read.required.is_empty());
    }

    #[test]
    fn test_entries_stop_on_truncation() {
        let entry = ObjectIndexEntry::partial(object_header(ObjectType::Wall, "FENCE1"), b"FENCE1.DAT");
        let mut bytes = entry.to_bytes();
        bytes.extend(entry.to_bytes());
        bytes.truncate(bytes.len() - 3);

        let results: Vec<_> = Entries::new(&bytes, 5).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
