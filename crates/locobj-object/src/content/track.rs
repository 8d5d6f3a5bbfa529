//! Rail track types.

use locobj_common::BinaryReader;

use super::{i16_at, load_string_tables, u8_at};
use crate::registry::{check_fixed_len, ContentDetails, ContentState, ContentType, LoadContext, LoadedObjectHandle};
use crate::{Error, ObjectType, Result};

pub(crate) const NUM_COMPATIBLE: usize = 0x07;
pub(crate) const NUM_MODS: usize = 0x08;
pub(crate) const NUM_SIGNALS: usize = 0x09;
pub(crate) const BUILD_COST_FACTOR: usize = 0x14;
pub(crate) const SELL_COST_FACTOR: usize = 0x16;
pub(crate) const TUNNEL_COST_FACTOR: usize = 0x18;
pub(crate) const COST_INDEX: usize = 0x1A;
pub(crate) const CURVE_SPEED: usize = 0x1C;
pub(crate) const NUM_BRIDGES: usize = 0x24;
pub(crate) const NUM_STATIONS: usize = 0x2C;

const MAX_COST_INDEX: u8 = 32;
const MAX_BRIDGES: u8 = 7;
const MAX_MODS: u8 = 4;
const MAX_STATIONS: u8 = 7;

/// Objects a loaded track resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackDetails {
    pub compatible: Vec<LoadedObjectHandle>,
    pub mods: Vec<LoadedObjectHandle>,
    pub signals: Vec<LoadedObjectHandle>,
    pub tunnel: Option<LoadedObjectHandle>,
    pub bridges: Vec<LoadedObjectHandle>,
    pub stations: Vec<LoadedObjectHandle>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackContent;

fn invalid(reason: &'static str) -> Error {
    Error::Invalid {
        object_type: ObjectType::Track,
        reason,
    }
}

impl ContentType for TrackContent {
    fn object_type(&self) -> ObjectType {
        ObjectType::Track
    }

    fn validate(&self, payload: &[u8]) -> Result<()> {
        check_fixed_len(ObjectType::Track, payload)?;

        if u8_at(payload, COST_INDEX) > MAX_COST_INDEX {
            return Err(invalid("cost index out of range"));
        }
        let build = i16_at(payload, BUILD_COST_FACTOR);
        if build <= 0 {
            return Err(invalid("build cost factor must be positive"));
        }
        if i16_at(payload, TUNNEL_COST_FACTOR) <= 0 {
            return Err(invalid("tunnel cost factor must be positive"));
        }
        // Selling must never refund more than building costs.
        if -i32::from(i16_at(payload, SELL_COST_FACTOR)) > i32::from(build) {
            return Err(invalid("sell refund exceeds build cost"));
        }
        if u8_at(payload, NUM_BRIDGES) > MAX_BRIDGES {
            return Err(invalid("too many bridges"));
        }
        if u8_at(payload, NUM_MODS) > MAX_MODS {
            return Err(invalid("too many track extras"));
        }
        if u8_at(payload, NUM_STATIONS) > MAX_STATIONS {
            return Err(invalid("too many stations"));
        }
        Ok(())
    }

    fn load(&self, payload: &[u8], ctx: &mut LoadContext<'_>) -> Result<ContentState> {
        check_fixed_len(ObjectType::Track, payload)?;
        let mut reader = BinaryReader::new_at(payload, ObjectType::Track.fixed_len());
        load_string_tables(ObjectType::Track, &mut reader, ctx)?;

        let mut details = TrackDetails::default();
        for _ in 0..u8_at(payload, NUM_COMPATIBLE) {
            if let Some(handle) = ctx.find(&mut reader)? {
                details.compatible.push(handle);
            }
        }
        for _ in 0..u8_at(payload, NUM_MODS) {
            if let Some(handle) = ctx.require(&mut reader)? {
                details.mods.push(handle);
            }
        }
        for _ in 0..u8_at(payload, NUM_SIGNALS) {
            if let Some(handle) = ctx.will_load(&mut reader)? {
                details.signals.push(handle);
            }
        }
        details.tunnel = ctx.require(&mut reader)?;
        for _ in 0..u8_at(payload, NUM_BRIDGES) {
            if let Some(handle) = ctx.will_load(&mut reader)? {
                details.bridges.push(handle);
            }
        }
        for _ in 0..u8_at(payload, NUM_STATIONS) {
            if let Some(handle) = ctx.will_load(&mut reader)? {
                details.stations.push(handle);
            }
        }

        let images = ctx.load_image_table(&mut reader)?;
        Ok(ContentState {
            images: Some(images),
            details: ContentDetails::Track(details),
            ..Default::default()
        })
    }
}
