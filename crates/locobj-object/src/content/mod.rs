//! Registry entries.
//!
//! Most types only need the common framing and share [`FramedContent`].
//! Vehicles, tracks and competitors have bespoke validation and dependency
//! discovery.

pub(crate) mod competitor;
mod framed;
pub(crate) mod track;
pub(crate) mod vehicle;

pub use competitor::{CompetitorContent, CompetitorDetails};
pub use framed::FramedContent;
pub use track::{TrackContent, TrackDetails};
pub use vehicle::{CargoSection, TransportMode, VehicleContent, VehicleDetails};

pub(crate) use framed::load_string_tables;

/// Category a cargo's body carries at this offset; vehicles match on it.
pub(crate) const CARGO_CATEGORY: usize = 0x10;

// Fixed-body field access. Callers have checked the body length.

pub(crate) fn u8_at(payload: &[u8], offset: usize) -> u8 {
    payload.get(offset).copied().unwrap_or_default()
}

pub(crate) fn u16_at(payload: &[u8], offset: usize) -> u16 {
    payload
        .get(offset..offset + 2)
        .map_or(0, |b| u16::from_le_bytes([b[0], b[1]]))
}

pub(crate) fn i16_at(payload: &[u8], offset: usize) -> i16 {
    u16_at(payload, offset) as i16
}

pub(crate) fn u32_at(payload: &[u8], offset: usize) -> u32 {
    payload
        .get(offset..offset + 4)
        .map_or(0, |b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
