//! Image tables and the global image id space.
//!
//! Layout: `{ num_entries: u32, total_size: u32 }`, then `num_entries`
//! 16-byte [`G1Element`] descriptors, then `total_size` bytes of pixel data.
//! Each descriptor is registered under the next free global image id.

use locobj_common::BinaryReader;
use rustc_hash::FxHashMap;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// First id of the range reserved for temporary (preview) objects.
pub const IMAGE_BASE_DISC: u32 = 0x101A;

/// First id handed to repository objects after a reload.
pub const IMAGE_BASE_OBJECTS: u32 = 0x201A;

/// Size of the object image id space.
pub const MAX_OBJECT_IMAGES: u32 = 0x40000;

/// Ids at or above this are never handed out.
pub const IMAGE_LIMIT: u32 = IMAGE_BASE_DISC + MAX_OBJECT_IMAGES;

/// Image table header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ImageTableHeader {
    pub num_entries: u32,
    pub total_size: u32,
}

/// On-disk image descriptor.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct G1Element {
    /// Offset of the pixel data within the table's data block
    pub offset: u32,
    pub width: i16,
    pub height: i16,
    pub x_offset: i16,
    pub y_offset: i16,
    pub flags: u16,
    pub zoom_offset: u16,
}

impl G1Element {
    pub const SIZE: usize = 16;

    /// No pixels of its own: reuse the previous image, shifted by this
    /// descriptor's x/y offsets.
    pub const DUPLICATE_PREVIOUS: u16 = 1 << 6;
}

/// A registered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageElement {
    pub data_offset: u32,
    pub width: i16,
    pub height: i16,
    pub x_offset: i16,
    pub y_offset: i16,
    pub flags: u16,
    pub zoom_offset: u16,
}

impl From<G1Element> for ImageElement {
    fn from(g1: G1Element) -> Self {
        Self {
            data_offset: g1.offset,
            width: g1.width,
            height: g1.height,
            x_offset: g1.x_offset,
            y_offset: g1.y_offset,
            flags: g1.flags,
            zoom_offset: g1.zoom_offset,
        }
    }
}

/// Result of loading one image table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTable {
    /// Global id of the first image.
    pub image_offset: u32,
    /// Number of images registered.
    pub count: u32,
    /// Bytes occupied by the table.
    pub table_len: usize,
}

/// The global image id counter plus everything registered under it.
#[derive(Debug, Clone)]
pub struct ImageRegistry {
    next_id: u32,
    elements: FxHashMap<u32, ImageElement>,
}

impl Default for ImageRegistry {
    fn default() -> Self {
        Self::starting_at(IMAGE_BASE_OBJECTS)
    }
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose next id is `base`.
    pub fn starting_at(base: u32) -> Self {
        Self {
            next_id: base,
            elements: FxHashMap::default(),
        }
    }

    /// The id counter: one past the last registered image.
    #[inline]
    pub fn total(&self) -> u32 {
        self.next_id
    }

    /// Drop every image registered at or after `total` and rewind the
    /// counter to it.
    pub fn truncate(&mut self, total: u32) {
        self.elements.retain(|&id, _| id < total);
        self.next_id = total;
    }

    /// Forget every image and restart at [`IMAGE_BASE_OBJECTS`].
    pub fn reset(&mut self) {
        self.next_id = IMAGE_BASE_OBJECTS;
        self.elements.clear();
    }

    /// Whether another object may still register images.
    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.next_id < IMAGE_LIMIT
    }

    pub fn get(&self, id: u32) -> Option<&ImageElement> {
        self.elements.get(&id)
    }

    fn register(&mut self, element: ImageElement) -> Result<u32> {
        if !self.has_capacity() {
            return Err(Error::ImageSpaceExhausted);
        }
        let id = self.next_id;
        self.elements.insert(id, element);
        self.next_id += 1;
        Ok(id)
    }
}

/// Parse the table at the reader's position and register its images.
pub fn load_image_table(reader: &mut BinaryReader<'_>, images: &mut ImageRegistry) -> Result<ImageTable> {
    let start = reader.position();
    let header = reader.read_struct::<ImageTableHeader>()?;
    let num_entries = header.num_entries;
    let total_size = header.total_size;

    let descriptors = reader.read_bytes((num_entries as usize).saturating_mul(G1Element::SIZE))?;
    reader.skip(total_size as usize)?;

    let image_offset = images.total();
    let mut previous: Option<ImageElement> = None;
    for (index, raw) in (0u32..).zip(descriptors.chunks_exact(G1Element::SIZE)) {
        let g1 = G1Element::read_from_bytes(raw).map_err(|_| locobj_common::Error::UnexpectedEof {
            needed: G1Element::SIZE,
            available: raw.len(),
        })?;

        let element = if g1.flags & G1Element::DUPLICATE_PREVIOUS != 0 {
            let base = previous.ok_or(Error::NoPreviousImage(index))?;
            ImageElement {
                x_offset: base.x_offset.wrapping_add(g1.x_offset),
                y_offset: base.y_offset.wrapping_add(g1.y_offset),
                ..base
            }
        } else {
            let offset = g1.offset;
            if offset > total_size {
                return Err(Error::ImageOutOfBounds {
                    index,
                    offset,
                    len: total_size,
                });
            }
            ImageElement::from(g1)
        };

        images.register(element)?;
        previous = Some(element);
    }

    Ok(ImageTable {
        image_offset,
        count: num_entries,
        table_len: reader.position() - start,
    })
}

/// Locate an image table that ends exactly at the end of `data`, searching
/// forward from `from`.
pub fn find_image_table(data: &[u8], from: usize) -> Option<usize> {
    let last = data.len().checked_sub(std::mem::size_of::<ImageTableHeader>())?;
    (from..=last).find(|&start| {
        let mut reader = BinaryReader::new_at(data, start);
        let Ok(header) = reader.read_struct::<ImageTableHeader>() else {
            return false;
        };
        let expected = 8u64
            + u64::from(header.num_entries) * G1Element::SIZE as u64
            + u64::from(header.total_size);
        expected == (data.len() - start) as u64
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use locobj_common::BinaryWriter;

    fn element(offset: u32, x: i16, y: i16, flags: u16) -> G1Element {
        G1Element {
            offset,
            width: 4,
            height: 2,
            x_offset: x,
            y_offset: y,
            flags,
            zoom_offset: 0,
        }
    }

    fn table(elements: &[G1Element], pixels: &[u8]) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        writer.write_struct(&ImageTableHeader {
            num_entries: elements.len() as u32,
            total_size: pixels.len() as u32,
        });
        for e in elements {
            writer.write_struct(e);
        }
        writer.write_bytes(pixels);
        writer.into_inner()
    }

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<G1Element>(), G1Element::SIZE);
        assert_eq!(std::mem::size_of::<ImageTableHeader>(), 8);
    }

    #[test]
    fn test_registers_sequential_ids() {
        let bytes = table(&[element(0, 1, 1, 0), element(8, 2, 2, 0)], &[0u8; 16]);
        let mut images = ImageRegistry::new();
        let mut reader = BinaryReader::new(&bytes);
        let result = load_image_table(&mut reader, &mut images).unwrap();

        assert_eq!(result.image_offset, IMAGE_BASE_OBJECTS);
        assert_eq!(result.count, 2);
        assert_eq!(result.table_len, 8 + 2 * 16 + 16);
        assert_eq!(images.total(), IMAGE_BASE_OBJECTS + 2);
        assert_eq!(images.get(IMAGE_BASE_OBJECTS + 1).unwrap().data_offset, 8);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_duplicate_previous_adds_offsets() {
        let bytes = table(
            &[
                element(0, 10, -3, 0),
                element(0, 5, 7, G1Element::DUPLICATE_PREVIOUS),
            ],
            &[0u8; 8],
        );
        let mut images = ImageRegistry::new();
        let mut reader = BinaryReader::new(&bytes);
        let result = load_image_table(&mut reader, &mut images).unwrap();

        let copy = images.get(result.image_offset + 1).unwrap();
        assert_eq!((copy.x_offset, copy.y_offset), (15, 4));
        assert_eq!(copy.width, 4);
    }

    #[test]
    fn test_duplicate_without_previous() {
        let bytes = table(&[element(0, 0, 0, G1Element::DUPLICATE_PREVIOUS)], &[]);
        let mut images = ImageRegistry::new();
        let mut reader = BinaryReader::new(&bytes);
        assert!(matches!(
            load_image_table(&mut reader, &mut images),
            Err(Error::NoPreviousImage(0))
        ));
    }

    #[test]
    fn test_truncated_pixels() {
        let mut bytes = table(&[element(0, 0, 0, 0)], &[0u8; 8]);
        bytes.truncate(bytes.len() - 1);
        let mut images = ImageRegistry::new();
        let mut reader = BinaryReader::new(&bytes);
        assert!(load_image_table(&mut reader, &mut images).is_err());
        assert_eq!(images.total(), IMAGE_BASE_OBJECTS);
    }

    #[test]
    fn test_truncate_rewinds() {
        let bytes = table(&[element(0, 0, 0, 0), element(0, 0, 0, 0)], &[]);
        let mut images = ImageRegistry::new();
        load_image_table(&mut BinaryReader::new(&bytes), &mut images).unwrap();
        images.truncate(IMAGE_BASE_OBJECTS + 1);
        assert_eq!(images.total(), IMAGE_BASE_OBJECTS + 1);
        assert!(images.get(IMAGE_BASE_OBJECTS).is_some());
        assert!(images.get(IMAGE_BASE_OBJECTS + 1).is_none());
    }

    #[test]
    fn test_exhausted_space() {
        let bytes = table(&[element(0, 0, 0, 0)], &[]);
        let mut images = ImageRegistry::starting_at(IMAGE_LIMIT);
        assert!(!images.has_capacity());
        let mut reader = BinaryReader::new(&bytes);
        assert!(matches!(
            load_image_table(&mut reader, &mut images),
            Err(Error::ImageSpaceExhausted)
        ));
    }

    #[test]
    fn test_find_image_table_at_tail() {
        let mut data = vec![0xAB; 5];
        let start = data.len();
        data.extend(table(&[element(0, 0, 0, 0)], &[1, 2, 3]));
        assert_eq!(find_image_table(&data, 0), Some(start));
        assert_eq!(find_image_table(&data[..data.len() - 1], 0), None);

        let empty = table(&[], &[]);
        assert_eq!(find_image_table(&empty, 0), Some(0));
    }
}
