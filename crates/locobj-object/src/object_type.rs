//! Content type tags and the fixed per-type tables keyed by them.

use std::fmt;
use std::str::FromStr;

use locobj_sawyer::Encoding;

use crate::{Error, Result};

/// Number of content types.
pub const OBJECT_TYPE_COUNT: usize = 34;

/// The kind of content an object provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum ObjectType {
    InterfaceSkin = 0,
    Sound = 1,
    Currency = 2,
    Steam = 3,
    Rock = 4,
    Water = 5,
    Land = 6,
    TownNames = 7,
    Cargo = 8,
    Wall = 9,
    TrackSignal = 10,
    LevelCrossing = 11,
    StreetLight = 12,
    Tunnel = 13,
    Bridge = 14,
    TrackStation = 15,
    TrackExtra = 16,
    Track = 17,
    RoadStation = 18,
    RoadExtra = 19,
    Road = 20,
    Airport = 21,
    Dock = 22,
    Vehicle = 23,
    Tree = 24,
    Snow = 25,
    Climate = 26,
    HillShapes = 27,
    Building = 28,
    Scaffolding = 29,
    Industry = 30,
    Region = 31,
    Competitor = 32,
    ScenarioText = 33,
}

/// Slots per type in the object repository.
const MAX_OBJECTS: [u16; OBJECT_TYPE_COUNT] = [
    1, 128, 1, 32, 8, 1, 32, 1, 32, 32, 16, 4, 1, 16, 8, 16, 8, 8, 16, 4, 8, 8, 8, 224, 64, 1, 1, 1,
    128, 1, 16, 1, 32, 1,
];

/// Length of the fixed-layout body that opens every payload.
const FIXED_LEN: [usize; OBJECT_TYPE_COUNT] = [
    0x18, 0x0C, 0x0C, 0x28, 0x06, 0x0E, 0x1E, 0x1A, 0x1F, 0x0A, 0x1E, 0x12, 0x0C, 0x06, 0x2C, 0xAE,
    0x12, 0x36, 0x6E, 0x12, 0x30, 0xBA, 0x28, 0x15E, 0x4C, 0x06, 0x0A, 0x0E, 0xBE, 0x12, 0xF4, 0x12,
    0x38, 0x06,
];

/// Localised string tables following the fixed body.
const STRING_TABLES: [u8; OBJECT_TYPE_COUNT] = [
    1, 1, 3, 1, 1, 1, 1, 1, 4, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 8, 1, 2,
    2,
];

const NAMES: [&str; OBJECT_TYPE_COUNT] = [
    "interface_skin",
    "sound",
    "currency",
    "steam",
    "rock",
    "water",
    "land",
    "town_names",
    "cargo",
    "wall",
    "track_signal",
    "level_crossing",
    "street_light",
    "tunnel",
    "bridge",
    "track_station",
    "track_extra",
    "track",
    "road_station",
    "road_extra",
    "road",
    "airport",
    "dock",
    "vehicle",
    "tree",
    "snow",
    "climate",
    "hill_shapes",
    "building",
    "scaffolding",
    "industry",
    "region",
    "competitor",
    "scenario_text",
];

/// Total repository slots across all types.
pub const MAX_OBJECTS_TOTAL: usize = {
    let mut total = 0;
    let mut i = 0;
    while i < OBJECT_TYPE_COUNT {
        total += MAX_OBJECTS[i] as usize;
        i += 1;
    }
    total
};

impl ObjectType {
    /// Every type, in tag order.
    pub const ALL: [ObjectType; OBJECT_TYPE_COUNT] = [
        Self::InterfaceSkin,
        Self::Sound,
        Self::Currency,
        Self::Steam,
        Self::Rock,
        Self::Water,
        Self::Land,
        Self::TownNames,
        Self::Cargo,
        Self::Wall,
        Self::TrackSignal,
        Self::LevelCrossing,
        Self::StreetLight,
        Self::Tunnel,
        Self::Bridge,
        Self::TrackStation,
        Self::TrackExtra,
        Self::Track,
        Self::RoadStation,
        Self::RoadExtra,
        Self::Road,
        Self::Airport,
        Self::Dock,
        Self::Vehicle,
        Self::Tree,
        Self::Snow,
        Self::Climate,
        Self::HillShapes,
        Self::Building,
        Self::Scaffolding,
        Self::Industry,
        Self::Region,
        Self::Competitor,
        Self::ScenarioText,
    ];

    /// Map a raw tag to a type.
    #[inline]
    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Position of this type in per-type tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    /// Repository capacity for this type.
    #[inline]
    pub const fn max_objects(self) -> u16 {
        MAX_OBJECTS[self as usize]
    }

    /// Length of the fixed-layout body at the start of the payload.
    #[inline]
    pub const fn fixed_len(self) -> usize {
        FIXED_LEN[self as usize]
    }

    /// Number of string tables that follow the fixed body.
    #[inline]
    pub const fn string_table_count(self) -> u8 {
        STRING_TABLES[self as usize]
    }

    /// Whether the payload ends with an image table.
    pub const fn has_image_table(self) -> bool {
        !matches!(
            self,
            Self::Sound | Self::TownNames | Self::Climate | Self::ScenarioText
        )
    }

    /// Chunk encoding used when writing objects of this type.
    pub const fn best_encoding(self) -> Encoding {
        match self {
            Self::Competitor => Encoding::Uncompressed,
            Self::Currency => Encoding::RunLengthMulti,
            Self::TownNames | Self::ScenarioText => Encoding::Rotate,
            _ => Encoding::RunLengthSingle,
        }
    }

    /// Sum of the capacities of every type before this one.
    pub fn first_slot_index(self) -> usize {
        MAX_OBJECTS[..self as usize]
            .iter()
            .map(|&n| usize::from(n))
            .sum()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.name() == wanted)
            .ok_or_else(|| Error::UnknownObjectTypeName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_positions() {
        for (i, ty) in ObjectType::ALL.iter().enumerate() {
            assert_eq!(ty.index(), i);
            assert_eq!(ObjectType::from_u8(i as u8), Some(*ty));
        }
        assert_eq!(ObjectType::from_u8(34), None);
    }

    #[test]
    fn test_capacities() {
        assert_eq!(ObjectType::Vehicle.max_objects(), 224);
        assert_eq!(ObjectType::Currency.max_objects(), 1);
        assert_eq!(MAX_OBJECTS_TOTAL, 859);
        assert_eq!(ObjectType::InterfaceSkin.first_slot_index(), 0);
        assert_eq!(ObjectType::Sound.first_slot_index(), 1);
        assert_eq!(
            ObjectType::ScenarioText.first_slot_index(),
            MAX_OBJECTS_TOTAL - 1
        );
    }

    #[test]
    fn test_fixed_lengths() {
        assert_eq!(ObjectType::Vehicle.fixed_len(), 0x15E);
        assert_eq!(ObjectType::Track.fixed_len(), 0x36);
        assert_eq!(ObjectType::Competitor.fixed_len(), 0x38);
    }

    #[test]
    fn test_best_encoding() {
        assert_eq!(ObjectType::Competitor.best_encoding(), Encoding::Uncompressed);
        assert_eq!(ObjectType::Currency.best_encoding(), Encoding::RunLengthMulti);
        assert_eq!(ObjectType::TownNames.best_encoding(), Encoding::Rotate);
        assert_eq!(ObjectType::Vehicle.best_encoding(), Encoding::RunLengthSingle);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("vehicle".parse::<ObjectType>().unwrap(), ObjectType::Vehicle);
        assert_eq!("Track-Signal".parse::<ObjectType>().unwrap(), ObjectType::TrackSignal);
        assert!("spaceship".parse::<ObjectType>().is_err());
    }
}
