//! Vehicles: trains, trams, road vehicles, aircraft and ships.

use locobj_common::BinaryReader;

use super::{i16_at, load_string_tables, u16_at, u8_at};
use crate::registry::{check_fixed_len, ContentDetails, ContentState, ContentType, LoadContext, LoadedObjectHandle};
use crate::{Error, ObjectType, Result};

pub(crate) const MODE: usize = 0x02;
pub(crate) const VEHICLE_TYPE: usize = 0x03;
pub(crate) const NUM_MODS: usize = 0x06;
pub(crate) const COST_INDEX: usize = 0x07;
pub(crate) const COST_FACTOR: usize = 0x08;
pub(crate) const RUN_COST_INDEX: usize = 0x0B;
pub(crate) const RUN_COST_FACTOR: usize = 0x0C;
pub(crate) const NUM_COMPAT: usize = 0x0F;
pub(crate) const BODY_SPRITES: usize = 0x3C;
pub(crate) const BOGIE_SPRITES: usize = 0xB4;
pub(crate) const POWER: usize = 0xD8;
pub(crate) const SPEED: usize = 0xDA;
pub(crate) const RACK_SPEED: usize = 0xDC;
pub(crate) const WEIGHT: usize = 0xDE;
pub(crate) const FLAGS: usize = 0xE0;
pub(crate) const NUM_SIMULTANEOUS_CARGO_TYPES: usize = 0x10C;
pub(crate) const ANIMATION: usize = 0x10D;
pub(crate) const DESIGNED: usize = 0x114;
pub(crate) const OBSOLETE: usize = 0x116;
pub(crate) const DRIVING_SOUND_TYPE: usize = 0x119;
pub(crate) const NUM_START_SOUNDS: usize = 0x15A;

const BODY_SPRITE_COUNT: usize = 4;
const BODY_SPRITE_SIZE: usize = 0x1E;
const BOGIE_SPRITE_COUNT: usize = 2;
const BOGIE_SPRITE_SIZE: usize = 0x12;
const ANIMATION_COUNT: usize = 2;
const ANIMATION_SIZE: usize = 3;
const CARGO_SECTIONS: usize = 2;
const CARGO_SECTION_END: u16 = 0xFFFF;
const MAX_CARGO_TYPES: usize = 32;

pub(crate) const FLAG_RACK_RAIL: u16 = 1 << 6;
pub(crate) const FLAG_ANY_TRACK: u16 = 1 << 9;
const SPRITE_HAS_SPRITES: u8 = 1 << 0;
const START_SOUNDS_MASK: u8 = 0x7F;

const MAX_COST_INDEX: u8 = 32;
const MAX_MODS: u8 = 4;
const MAX_SIMULTANEOUS_CARGO_TYPES: u8 = 2;
const MAX_COMPAT: u8 = 8;

/// How a vehicle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TransportMode {
    Rail = 0,
    Road = 1,
    Air = 2,
    Water = 3,
}

impl TransportMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Rail),
            1 => Some(Self::Road),
            2 => Some(Self::Air),
            3 => Some(Self::Water),
            _ => None,
        }
    }
}

/// One cargo capacity section: the capacity and the cargo match records
/// that fill it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CargoSection {
    /// Zero when no resident cargo matched.
    pub max_cargo: u8,
    /// `(match_flags, sprite_offset)` pairs.
    pub matches: Vec<(u16, u8)>,
    /// Bit `n` set when cargo slot `n` matched.
    pub cargo_types: u32,
}

/// Objects a loaded vehicle resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleDetails {
    pub track: Option<LoadedObjectHandle>,
    pub track_extras: Vec<LoadedObjectHandle>,
    /// Sections that accepted cargo come first; the rest are empty.
    pub cargo: Vec<CargoSection>,
    pub cargo_sprite_offsets: [u8; MAX_CARGO_TYPES],
    pub num_simultaneous_cargo_types: u8,
    pub animations: Vec<Option<LoadedObjectHandle>>,
    pub compatible: Vec<LoadedObjectHandle>,
    pub rack_rail: Option<LoadedObjectHandle>,
    pub driving_sound: Option<LoadedObjectHandle>,
    pub start_sounds: Vec<Option<LoadedObjectHandle>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleContent;

fn body_sprites_valid(payload: &[u8]) -> bool {
    (0..BODY_SPRITE_COUNT).all(|i| {
        let base = BODY_SPRITES + i * BODY_SPRITE_SIZE;
        if u8_at(payload, base + 7) & SPRITE_HAS_SPRITES == 0 {
            return true;
        }
        matches!(u8_at(payload, base), 8 | 16 | 32 | 64 | 128)
            && matches!(u8_at(payload, base + 1), 4 | 8 | 16 | 32)
            && matches!(u8_at(payload, base + 2), 1 | 2 | 4)
            && matches!(u8_at(payload, base + 3), 1..=5)
            && matches!(u8_at(payload, base + 5), 1 | 3)
    })
}

fn bogie_sprites_valid(payload: &[u8]) -> bool {
    (0..BOGIE_SPRITE_COUNT).all(|i| {
        let base = BOGIE_SPRITES + i * BOGIE_SPRITE_SIZE;
        u8_at(payload, base + 1) & SPRITE_HAS_SPRITES == 0 || matches!(u8_at(payload, base), 1 | 2 | 4)
    })
}

fn invalid(reason: &'static str) -> Error {
    Error::Invalid {
        object_type: ObjectType::Vehicle,
        reason,
    }
}

impl ContentType for VehicleContent {
    fn object_type(&self) -> ObjectType {
        ObjectType::Vehicle
    }

    fn validate(&self, payload: &[u8]) -> Result<()> {
        check_fixed_len(ObjectType::Vehicle, payload)?;

        if u8_at(payload, COST_INDEX) > MAX_COST_INDEX || u8_at(payload, RUN_COST_INDEX) > MAX_COST_INDEX {
            return Err(invalid("cost index out of range"));
        }
        if i16_at(payload, COST_FACTOR) <= 0 {
            return Err(invalid("cost factor must be positive"));
        }
        if i16_at(payload, RUN_COST_FACTOR) < 0 {
            return Err(invalid("running cost factor is negative"));
        }

        let flags = u16_at(payload, FLAGS);
        let num_mods = u8_at(payload, NUM_MODS);
        if flags & FLAG_ANY_TRACK != 0 && (num_mods != 0 || flags & FLAG_RACK_RAIL != 0) {
            return Err(invalid("any-track vehicle with track requirements"));
        }
        if num_mods > MAX_MODS {
            return Err(invalid("too many track extras"));
        }
        if u8_at(payload, NUM_SIMULTANEOUS_CARGO_TYPES) > MAX_SIMULTANEOUS_CARGO_TYPES {
            return Err(invalid("too many simultaneous cargo types"));
        }
        if u8_at(payload, NUM_COMPAT) > MAX_COMPAT {
            return Err(invalid("too many compatible vehicles"));
        }
        if u16_at(payload, RACK_SPEED) > u16_at(payload, SPEED) {
            return Err(invalid("rack speed exceeds speed"));
        }
        if !body_sprites_valid(payload) {
            return Err(invalid("bad body sprite frame counts"));
        }
        if !bogie_sprites_valid(payload) {
            return Err(invalid("bad bogie roll states"));
        }
        Ok(())
    }

    fn load(&self, payload: &[u8], ctx: &mut LoadContext<'_>) -> Result<ContentState> {
        check_fixed_len(ObjectType::Vehicle, payload)?;
        let mut reader = BinaryReader::new_at(payload, ObjectType::Vehicle.fixed_len());
        load_string_tables(ObjectType::Vehicle, &mut reader, ctx)?;

        let flags = u16_at(payload, FLAGS);
        let mode = TransportMode::from_u8(u8_at(payload, MODE));
        let mut details = VehicleDetails::default();

        if flags & FLAG_ANY_TRACK == 0 && matches!(mode, Some(TransportMode::Rail | TransportMode::Road)) {
            details.track = ctx.require(&mut reader)?;
        }

        for _ in 0..u8_at(payload, NUM_MODS) {
            if let Some(handle) = ctx.require(&mut reader)? {
                details.track_extras.push(handle);
            }
        }

        load_cargo_sections(&mut reader, ctx, &mut details)?;

        for i in 0..ANIMATION_COUNT {
            let animation_type = u8_at(payload, ANIMATION + i * ANIMATION_SIZE + 2);
            if animation_type != 0 {
                details.animations.push(ctx.require(&mut reader)?);
            }
        }

        for _ in 0..u8_at(payload, NUM_COMPAT) {
            if let Some(handle) = ctx.find_fuzzy(&mut reader)? {
                details.compatible.push(handle);
            }
        }

        if flags & FLAG_RACK_RAIL != 0 {
            details.rack_rail = ctx.require(&mut reader)?;
        }

        if u8_at(payload, DRIVING_SOUND_TYPE) != 0 {
            details.driving_sound = ctx.require(&mut reader)?;
        }

        for _ in 0..(u8_at(payload, NUM_START_SOUNDS) & START_SOUNDS_MASK) {
            details.start_sounds.push(ctx.require(&mut reader)?);
        }

        let images = ctx.load_image_table(&mut reader)?;
        if !reader.is_empty() {
            return Err(Error::TrailingBytes {
                object_type: ObjectType::Vehicle,
                extra: reader.remaining(),
            });
        }

        Ok(ContentState {
            images: Some(images),
            details: ContentDetails::Vehicle(details),
            ..Default::default()
        })
    }
}

fn read_cargo_section(reader: &mut BinaryReader<'_>) -> Result<CargoSection> {
    let mut section = CargoSection {
        max_cargo: reader.read_u8()?,
        ..Default::default()
    };
    if section.max_cargo == 0 {
        return Ok(section);
    }
    loop {
        let match_flags = reader.read_u16()?;
        if match_flags == CARGO_SECTION_END {
            break;
        }
        section.matches.push((match_flags, reader.read_u8()?));
    }
    Ok(section)
}

/// Read both cargo sections and resolve their match flags against the
/// resident cargo objects.
///
/// A section nothing matches loses its capacity and its place; the next
/// section moves up into it.
fn load_cargo_sections(reader: &mut BinaryReader<'_>, ctx: &LoadContext<'_>, details: &mut VehicleDetails) -> Result<()> {
    let mut sections = vec![CargoSection::default(); CARGO_SECTIONS];
    let mut filled = 0;
    for _ in 0..CARGO_SECTIONS {
        let mut section = read_cargo_section(reader)?;
        for &(match_flags, sprite_offset) in &section.matches {
            let mask = ctx.cargo_matching(match_flags);
            section.cargo_types |= mask;
            for (id, offset) in details.cargo_sprite_offsets.iter_mut().enumerate() {
                if mask & (1 << id) != 0 {
                    *offset = sprite_offset;
                }
            }
        }
        if section.cargo_types == 0 {
            section.max_cargo = 0;
        }
        let filled_section = section.cargo_types != 0;
        sections[filled] = section;
        if filled_section {
            filled += 1;
        }
    }
    details.num_simultaneous_cargo_types = filled as u8;
    details.cargo = sections;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CARGO_CATEGORY;
    use crate::fixtures::{object_header, vehicle_payload, PayloadBuilder};
    use crate::image_table::ImageRegistry;
    use crate::registry::{DependentObjects, LoadedObjectId, NoObjects, ObjectLookup};
    use crate::string_table::StringRegistry;
    use crate::{LanguageId, ObjectHeader};

    fn fixed() -> Vec<u8> {
        let mut body = vec![0u8; ObjectType::Vehicle.fixed_len()];
        body[MODE] = TransportMode::Air as u8;
        body[COST_FACTOR] = 1;
        body
    }

    fn preview(payload: &[u8], lookup: &dyn ObjectLookup) -> Result<(ContentState, DependentObjects)> {
        let mut images = ImageRegistry::new();
        let mut strings = StringRegistry::new();
        let mut deps = DependentObjects::default();
        let mut ctx = LoadContext::for_preview(
            ObjectType::Vehicle,
            LanguageId::EnglishUk,
            lookup,
            &mut images,
            &mut strings,
            &mut deps,
        );
        let state = VehicleContent.load(payload, &mut ctx)?;
        Ok((state, deps))
    }

    #[test]
    fn test_validate_minimal() {
        VehicleContent.validate(&fixed()).unwrap();
    }

    #[test]
    fn test_validate_cost_factor() {
        let mut body = fixed();
        body[COST_FACTOR] = 0;
        assert!(VehicleContent.validate(&body).is_err());

        let mut body = fixed();
        body[RUN_COST_FACTOR..RUN_COST_FACTOR + 2].copy_from_slice(&(-1i16).to_le_bytes());
        assert!(VehicleContent.validate(&body).is_err());

        let mut body = fixed();
        body[COST_INDEX] = 33;
        assert!(VehicleContent.validate(&body).is_err());
    }

    #[test]
    fn test_validate_any_track() {
        let mut body = fixed();
        body[FLAGS..FLAGS + 2].copy_from_slice(&FLAG_ANY_TRACK.to_le_bytes());
        VehicleContent.validate(&body).unwrap();
        body[NUM_MODS] = 1;
        assert!(VehicleContent.validate(&body).is_err());
    }

    #[test]
    fn test_validate_rack_speed() {
        let mut body = fixed();
        body[SPEED] = 10;
        body[RACK_SPEED] = 11;
        assert!(VehicleContent.validate(&body).is_err());
        body[RACK_SPEED] = 10;
        VehicleContent.validate(&body).unwrap();
    }

    #[test]
    fn test_validate_body_sprites() {
        let mut body = fixed();
        let sprite = BODY_SPRITES + BODY_SPRITE_SIZE;
        body[sprite + 7] = SPRITE_HAS_SPRITES;
        body[sprite] = 16;
        body[sprite + 1] = 8;
        body[sprite + 2] = 1;
        body[sprite + 3] = 1;
        body[sprite + 5] = 1;
        VehicleContent.validate(&body).unwrap();

        body[sprite] = 12;
        assert!(VehicleContent.validate(&body).is_err());
    }

    #[test]
    fn test_validate_bogie_sprites() {
        let mut body = fixed();
        body[BOGIE_SPRITES + 1] = SPRITE_HAS_SPRITES;
        body[BOGIE_SPRITES] = 3;
        assert!(VehicleContent.validate(&body).is_err());
        body[BOGIE_SPRITES] = 4;
        VehicleContent.validate(&body).unwrap();
    }

    #[test]
    fn test_load_air_vehicle() {
        let payload = vehicle_payload("Boeing 707", 4);
        VehicleContent.validate(&payload).unwrap();
        let (state, deps) = preview(&payload, &NoObjects).unwrap();
        assert_eq!(state.num_images(), 4);
        assert!(deps.is_empty());
        let ContentDetails::Vehicle(details) = state.details else {
            panic!("expected vehicle details");
        };
        assert_eq!(details.track, None);
        assert_eq!(details.cargo.len(), 2);
    }

    #[test]
    fn test_load_collects_dependencies() {
        let track = object_header(ObjectType::Track, "TRACKST ");
        let extra = object_header(ObjectType::TrackExtra, "TREXCAT1");
        let steam = object_header(ObjectType::Steam, "STEAM   ");
        let sound = object_header(ObjectType::Sound, "SNDWHIS1");
        let compat = object_header(ObjectType::Vehicle, "4MT     ");

        let mut body = vec![0u8; ObjectType::Vehicle.fixed_len()];
        body[MODE] = TransportMode::Rail as u8;
        body[COST_FACTOR] = 1;
        body[NUM_MODS] = 1;
        body[NUM_COMPAT] = 1;
        body[ANIMATION + 2] = 1;
        body[DRIVING_SOUND_TYPE] = 1;
        body[NUM_START_SOUNDS] = 0x80 | 1;

        let payload = PayloadBuilder::new(body)
            .string_table("Steam engine")
            .header(&track)
            .header(&extra)
            .bytes(&[5])
            .bytes(&0x0001u16.to_le_bytes())
            .bytes(&[0])
            .bytes(&0xFFFFu16.to_le_bytes())
            .bytes(&[0])
            .header(&steam)
            .header(&compat)
            .header(&sound)
            .header(&sound)
            .image_table(1)
            .build();

        VehicleContent.validate(&payload).unwrap();
        let (state, deps) = preview(&payload, &NoObjects).unwrap();
        assert_eq!(deps.required, vec![track, extra, steam, sound, sound]);
        assert!(deps.will_load.is_empty());

        let ContentDetails::Vehicle(details) = state.details else {
            panic!("expected vehicle details");
        };
        assert_eq!(details.cargo[0].max_cargo, 0);
        assert_eq!(details.cargo[0].cargo_types, 0);
        assert_eq!(details.cargo[0].matches, vec![(0x0001, 0)]);
        assert_eq!(details.num_simultaneous_cargo_types, 0);
        assert_eq!(details.start_sounds.len(), 1);
    }

    /// Cargo bodies resident in the given slots, keyed by category.
    struct Cargoes(Vec<(LoadedObjectId, Vec<u8>)>);

    impl Cargoes {
        fn new(categories: &[(LoadedObjectId, u16)]) -> Self {
            Self(
                categories
                    .iter()
                    .map(|&(id, category)| {
                        let mut body = vec![0u8; ObjectType::Cargo.fixed_len()];
                        body[CARGO_CATEGORY..CARGO_CATEGORY + 2].copy_from_slice(&category.to_le_bytes());
                        (id, body)
                    })
                    .collect(),
            )
        }
    }

    impl ObjectLookup for Cargoes {
        fn find_object_handle(&self, _header: &ObjectHeader) -> Option<LoadedObjectHandle> {
            None
        }
        fn find_object_handle_fuzzy(&self, _header: &ObjectHeader) -> Option<LoadedObjectHandle> {
            None
        }
        fn object_payload(&self, handle: LoadedObjectHandle) -> Option<&[u8]> {
            if handle.object_type != ObjectType::Cargo {
                return None;
            }
            self.0
                .iter()
                .find(|(id, _)| *id == handle.id)
                .map(|(_, body)| body.as_slice())
        }
    }

    /// Air vehicle with the given `(max_cargo, [(match_flags, sprite_offset)])`
    /// sections.
    fn cargo_vehicle(sections: &[(u8, &[(u16, u8)])]) -> Vec<u8> {
        let mut builder = PayloadBuilder::new(fixed()).string_table("Freighter");
        for &(max_cargo, matches) in sections {
            builder = builder.bytes(&[max_cargo]);
            if max_cargo == 0 {
                continue;
            }
            for &(flags, offset) in matches {
                builder = builder.bytes(&flags.to_le_bytes()).bytes(&[offset]);
            }
            builder = builder.bytes(&CARGO_SECTION_END.to_le_bytes());
        }
        builder.image_table(0).build()
    }

    fn vehicle_details(payload: &[u8], lookup: &dyn ObjectLookup) -> VehicleDetails {
        let (state, _) = preview(payload, lookup).unwrap();
        let ContentDetails::Vehicle(details) = state.details else {
            panic!("expected vehicle details");
        };
        details
    }

    #[test]
    fn test_cargo_matches_resident_cargo() {
        let lookup = Cargoes::new(&[(2, 1), (5, 4), (7, 1)]);
        let payload = cargo_vehicle(&[(5, &[(1, 3)]), (12, &[(4, 9)])]);
        let details = vehicle_details(&payload, &lookup);

        assert_eq!(details.num_simultaneous_cargo_types, 2);
        assert_eq!(details.cargo[0].max_cargo, 5);
        assert_eq!(details.cargo[0].cargo_types, (1 << 2) | (1 << 7));
        assert_eq!(details.cargo[1].max_cargo, 12);
        assert_eq!(details.cargo[1].cargo_types, 1 << 5);
        assert_eq!(details.cargo_sprite_offsets[2], 3);
        assert_eq!(details.cargo_sprite_offsets[7], 3);
        assert_eq!(details.cargo_sprite_offsets[5], 9);
        assert_eq!(details.cargo_sprite_offsets[0], 0);
    }

    #[test]
    fn test_unmatched_cargo_section_drops_capacity() {
        let lookup = Cargoes::new(&[(3, 4)]);
        let payload = cargo_vehicle(&[(5, &[(1, 3)]), (12, &[(4, 9)])]);
        let details = vehicle_details(&payload, &lookup);

        assert_eq!(details.num_simultaneous_cargo_types, 1);
        assert_eq!(details.cargo[0].max_cargo, 12);
        assert_eq!(details.cargo[0].cargo_types, 1 << 3);
        assert_eq!(details.cargo[1], CargoSection::default());
        assert_eq!(details.cargo_sprite_offsets[3], 9);

        let details = vehicle_details(&payload, &Cargoes::new(&[(3, 8)]));
        assert_eq!(details.num_simultaneous_cargo_types, 0);
        assert!(details.cargo.iter().all(|section| section.max_cargo == 0));
    }

    #[test]
    fn test_load_resolves_through_lookup() {
        struct One(ObjectHeader);
        impl ObjectLookup for One {
            fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
                (*header == self.0).then(|| LoadedObjectHandle::new(ObjectType::Track, 2))
            }
            fn find_object_handle_fuzzy(&self, _header: &ObjectHeader) -> Option<LoadedObjectHandle> {
                None
            }
        }

        let track = object_header(ObjectType::Track, "TRACKST ");
        let mut body = vec![0u8; ObjectType::Vehicle.fixed_len()];
        body[MODE] = TransportMode::Road as u8;
        body[COST_FACTOR] = 1;
        let payload = PayloadBuilder::new(body)
            .string_table("Bus")
            .header(&track)
            .bytes(&[0, 0])
            .image_table(0)
            .build();

        let (state, _) = preview(&payload, &One(track)).unwrap();
        let ContentDetails::Vehicle(details) = state.details else {
            panic!("expected vehicle details");
        };
        assert_eq!(details.track, Some(LoadedObjectHandle::new(ObjectType::Track, 2)));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut payload = vehicle_payload("Boeing 707", 1);
        payload.push(0);
        assert!(matches!(
            preview(&payload, &NoObjects),
            Err(Error::TrailingBytes { extra: 1, .. })
        ));
    }
}
