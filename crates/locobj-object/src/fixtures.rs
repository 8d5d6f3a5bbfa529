//! Builders for synthetic object payloads and files, for tests.

use locobj_common::BinaryWriter;

use crate::content::{competitor, track, vehicle};
use crate::image_table::{G1Element, ImageTableHeader};
use crate::{LanguageId, ObjectFile, ObjectHeader, ObjectType, SourceGame};

/// A one-entry UK English string table.
pub fn string_table(text: &str) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    writer.write_u8(LanguageId::EnglishUk as u8);
    writer.write_cstr(text.as_bytes());
    writer.write_u8(LanguageId::END);
    writer.into_inner()
}

/// An image table of `count` 2x2 images with 4 pixel bytes each.
pub fn image_table(count: u32) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    writer.write_struct(&ImageTableHeader {
        num_entries: count,
        total_size: count * 4,
    });
    for i in 0..count {
        writer.write_struct(&G1Element {
            offset: i * 4,
            width: 2,
            height: 2,
            x_offset: -1,
            y_offset: -1,
            flags: 0,
            zoom_offset: 0,
        });
    }
    writer.write_bytes(&vec![0x11; count as usize * 4]);
    writer.into_inner()
}

/// A custom header with a zero checksum.
pub fn object_header(object_type: ObjectType, name: &str) -> ObjectHeader {
    ObjectHeader::new(object_type, SourceGame::Custom, name, 0)
}

/// Appends payload sections after a fixed body.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    writer: BinaryWriter,
}

impl PayloadBuilder {
    pub fn new(fixed: Vec<u8>) -> Self {
        let mut writer = BinaryWriter::with_capacity(fixed.len() + 256);
        writer.write_bytes(&fixed);
        Self { writer }
    }

    pub fn string_table(mut self, text: &str) -> Self {
        self.writer.write_bytes(&string_table(text));
        self
    }

    pub fn header(mut self, header: &ObjectHeader) -> Self {
        self.writer.write_struct(header);
        self
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.writer.write_bytes(bytes);
        self
    }

    pub fn image_table(mut self, count: u32) -> Self {
        self.writer.write_bytes(&image_table(count));
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Zeroed fixed body, the given string tables (missing ones empty) and an
/// image table when the type has one.
pub fn framed_payload(object_type: ObjectType, strings: &[&str], images: u32) -> Vec<u8> {
    let mut builder = PayloadBuilder::new(vec![0u8; object_type.fixed_len()]);
    for i in 0..usize::from(object_type.string_table_count()) {
        builder = builder.string_table(strings.get(i).copied().unwrap_or(""));
    }
    if object_type.has_image_table() {
        builder = builder.image_table(images);
    }
    builder.build()
}

/// An aircraft: no track, no dependencies, two empty cargo sections.
pub fn vehicle_payload(name: &str, images: u32) -> Vec<u8> {
    let mut body = vec![0u8; ObjectType::Vehicle.fixed_len()];
    body[vehicle::MODE] = vehicle::TransportMode::Air as u8;
    body[vehicle::COST_FACTOR] = 1;
    PayloadBuilder::new(body)
        .string_table(name)
        .bytes(&[0, 0])
        .image_table(images)
        .build()
}

/// An air vehicle listing `compatible` as a vehicle it can couple with.
pub fn vehicle_payload_compatible(name: &str, images: u32, compatible: &ObjectHeader) -> Vec<u8> {
    let mut body = vec![0u8; ObjectType::Vehicle.fixed_len()];
    body[vehicle::MODE] = vehicle::TransportMode::Air as u8;
    body[vehicle::COST_FACTOR] = 1;
    body[vehicle::NUM_COMPAT] = 1;
    PayloadBuilder::new(body)
        .string_table(name)
        .bytes(&[0, 0])
        .header(compatible)
        .image_table(images)
        .build()
}

/// A track body that passes validation, with no sub-object counts.
pub fn track_body() -> Vec<u8> {
    let mut body = vec![0u8; ObjectType::Track.fixed_len()];
    body[track::BUILD_COST_FACTOR] = 10;
    body[track::TUNNEL_COST_FACTOR] = 2;
    body[track::COST_INDEX] = 1;
    body
}

/// A track needing only a tunnel.
pub fn track_payload(name: &str, tunnel: &ObjectHeader) -> Vec<u8> {
    PayloadBuilder::new(track_body())
        .string_table(name)
        .header(tunnel)
        .image_table(1)
        .build()
}

/// A competitor with the given `(intelligence, aggressiveness,
/// competitiveness)`.
pub fn competitor_payload(name: &str, ratings: (u8, u8, u8)) -> Vec<u8> {
    let mut body = vec![0u8; ObjectType::Competitor.fixed_len()];
    body[competitor::EMOTIONS] = 1;
    body[competitor::INTELLIGENCE] = ratings.0;
    body[competitor::AGGRESSIVENESS] = ratings.1;
    body[competitor::COMPETITIVENESS] = ratings.2;
    PayloadBuilder::new(body)
        .string_table(name)
        .string_table("")
        .image_table(1)
        .build()
}

/// A complete file with a correct checksum for `payload`.
pub fn object_file(object_type: ObjectType, name: &str, payload: Vec<u8>) -> ObjectFile {
    let header = object_header(object_type, name).with_checksum(&payload);
    ObjectFile::new(header, payload)
}
