//! Read-only views over loaded objects.

use std::borrow::Cow;

use crate::content::{i16_at, u16_at, u8_at, TransportMode, VehicleDetails};
use crate::content::{competitor, track, vehicle, CompetitorDetails, TrackDetails};
use crate::registry::{ContentDetails, ContentState, LoadedObjectHandle};
use crate::string_table::StringRegistry;
use crate::{ObjectHeader, ObjectType};

/// Any loaded object: header, resident payload and derived state.
#[derive(Debug, Clone, Copy)]
pub struct FramedObject<'a> {
    pub handle: LoadedObjectHandle,
    pub header: &'a ObjectHeader,
    pub payload: &'a [u8],
    pub state: Option<&'a ContentState>,
    strings: &'a StringRegistry,
}

impl<'a> FramedObject<'a> {
    pub fn new(
        handle: LoadedObjectHandle,
        header: &'a ObjectHeader,
        payload: &'a [u8],
        state: Option<&'a ContentState>,
        strings: &'a StringRegistry,
    ) -> Self {
        Self {
            handle,
            header,
            payload,
            state,
            strings,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.handle.object_type
    }

    /// Whether the body has been parsed, as opposed to only stored.
    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    /// Text of string table `index`.
    pub fn string(&self, index: usize) -> Option<Cow<'a, str>> {
        let id = *self.state?.strings.get(index)?;
        self.strings.get_lossy(id)
    }

    /// Display name (string table 0).
    pub fn name(&self) -> Option<Cow<'a, str>> {
        self.string(0)
    }

    /// Global id of the first image.
    pub fn image_offset(&self) -> Option<u32> {
        self.state?.images.map(|t| t.image_offset)
    }

    pub fn num_images(&self) -> u32 {
        self.state.map_or(0, ContentState::num_images)
    }

    fn details(&self) -> Option<&'a ContentDetails> {
        self.state.map(|s| &s.details)
    }
}

/// Typed view over one content type, for `get::<T>(id)` style access.
pub trait TypedObject<'a>: Sized {
    const OBJECT_TYPE: ObjectType;

    fn from_framed(object: FramedObject<'a>) -> Option<Self>;
}

/// A loaded vehicle.
#[derive(Debug, Clone, Copy)]
pub struct VehicleObject<'a> {
    pub object: FramedObject<'a>,
}

impl<'a> TypedObject<'a> for VehicleObject<'a> {
    const OBJECT_TYPE: ObjectType = ObjectType::Vehicle;

    fn from_framed(object: FramedObject<'a>) -> Option<Self> {
        (object.object_type() == Self::OBJECT_TYPE).then_some(Self { object })
    }
}

impl<'a> VehicleObject<'a> {
    pub fn mode(&self) -> Option<TransportMode> {
        TransportMode::from_u8(u8_at(self.object.payload, vehicle::MODE))
    }

    pub fn vehicle_type(&self) -> u8 {
        u8_at(self.object.payload, vehicle::VEHICLE_TYPE)
    }

    pub fn cost_factor(&self) -> i16 {
        i16_at(self.object.payload, vehicle::COST_FACTOR)
    }

    pub fn run_cost_factor(&self) -> i16 {
        i16_at(self.object.payload, vehicle::RUN_COST_FACTOR)
    }

    pub fn power(&self) -> u16 {
        u16_at(self.object.payload, vehicle::POWER)
    }

    pub fn speed(&self) -> u16 {
        u16_at(self.object.payload, vehicle::SPEED)
    }

    pub fn rack_speed(&self) -> u16 {
        u16_at(self.object.payload, vehicle::RACK_SPEED)
    }

    pub fn weight(&self) -> u16 {
        u16_at(self.object.payload, vehicle::WEIGHT)
    }

    /// Years the vehicle becomes available and obsolete.
    pub fn designed(&self) -> u16 {
        u16_at(self.object.payload, vehicle::DESIGNED)
    }

    pub fn obsolete(&self) -> u16 {
        u16_at(self.object.payload, vehicle::OBSOLETE)
    }

    pub fn is_any_track(&self) -> bool {
        u16_at(self.object.payload, vehicle::FLAGS) & vehicle::FLAG_ANY_TRACK != 0
    }

    pub fn has_rack_rail(&self) -> bool {
        u16_at(self.object.payload, vehicle::FLAGS) & vehicle::FLAG_RACK_RAIL != 0
    }

    /// Resolved dependencies, once loaded.
    pub fn details(&self) -> Option<&'a VehicleDetails> {
        match self.object.details()? {
            ContentDetails::Vehicle(details) => Some(details),
            _ => None,
        }
    }
}

/// A loaded track type.
#[derive(Debug, Clone, Copy)]
pub struct TrackObject<'a> {
    pub object: FramedObject<'a>,
}

impl<'a> TypedObject<'a> for TrackObject<'a> {
    const OBJECT_TYPE: ObjectType = ObjectType::Track;

    fn from_framed(object: FramedObject<'a>) -> Option<Self> {
        (object.object_type() == Self::OBJECT_TYPE).then_some(Self { object })
    }
}

impl<'a> TrackObject<'a> {
    pub fn build_cost_factor(&self) -> i16 {
        i16_at(self.object.payload, track::BUILD_COST_FACTOR)
    }

    pub fn sell_cost_factor(&self) -> i16 {
        i16_at(self.object.payload, track::SELL_COST_FACTOR)
    }

    pub fn tunnel_cost_factor(&self) -> i16 {
        i16_at(self.object.payload, track::TUNNEL_COST_FACTOR)
    }

    pub fn curve_speed(&self) -> u16 {
        u16_at(self.object.payload, track::CURVE_SPEED)
    }

    pub fn details(&self) -> Option<&'a TrackDetails> {
        match self.object.details()? {
            ContentDetails::Track(details) => Some(details),
            _ => None,
        }
    }
}

/// A loaded competitor.
#[derive(Debug, Clone, Copy)]
pub struct CompetitorObject<'a> {
    pub object: FramedObject<'a>,
}

impl<'a> TypedObject<'a> for CompetitorObject<'a> {
    const OBJECT_TYPE: ObjectType = ObjectType::Competitor;

    fn from_framed(object: FramedObject<'a>) -> Option<Self> {
        (object.object_type() == Self::OBJECT_TYPE).then_some(Self { object })
    }
}

impl CompetitorObject<'_> {
    pub fn ratings(&self) -> CompetitorDetails {
        let payload = self.object.payload;
        CompetitorDetails {
            intelligence: u8_at(payload, competitor::INTELLIGENCE),
            aggressiveness: u8_at(payload, competitor::AGGRESSIVENESS),
            competitiveness: u8_at(payload, competitor::COMPETITIVENESS),
        }
    }
}
