//! Content type capability set and the registry dispatching on type tags.

use std::fmt;

use locobj_common::BinaryReader;

use crate::content::{CompetitorContent, FramedContent, TrackContent, VehicleContent};
use crate::content::{u16_at, CompetitorDetails, TrackDetails, VehicleDetails, CARGO_CATEGORY};
use crate::image_table::{load_image_table, ImageRegistry, ImageTable};
use crate::string_table::{object_string_id, read_string_table, temporary_string_id};
use crate::string_table::{StringId, StringRegistry};
use crate::{Error, LanguageId, ObjectHeader, ObjectType, Result, OBJECT_TYPE_COUNT};

/// Slot index within one content type.
pub type LoadedObjectId = u16;

/// Addresses one repository slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadedObjectHandle {
    pub object_type: ObjectType,
    pub id: LoadedObjectId,
}

impl LoadedObjectHandle {
    pub const fn new(object_type: ObjectType, id: LoadedObjectId) -> Self {
        Self { object_type, id }
    }
}

impl fmt::Display for LoadedObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.object_type, self.id)
    }
}

/// Objects another object depends on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependentObjects {
    /// Must be resolvable for the object to be usable.
    pub required: Vec<ObjectHeader>,
    /// Pulled in alongside the object. Informational only.
    pub will_load: Vec<ObjectHeader>,
}

impl DependentObjects {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.will_load.is_empty()
    }
}

/// Resolves headers to loaded objects while a payload is parsed.
pub trait ObjectLookup {
    fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle>;

    /// Lookup ignoring checksum and source game.
    fn find_object_handle_fuzzy(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle>;

    /// Raw payload resident in `handle`'s slot, parsed or not.
    fn object_payload(&self, _handle: LoadedObjectHandle) -> Option<&[u8]> {
        None
    }
}

/// Lookup with nothing loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObjects;

impl ObjectLookup for NoObjects {
    fn find_object_handle(&self, _header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        None
    }

    fn find_object_handle_fuzzy(&self, _header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        None
    }
}

/// Everything a content type may touch while loading one payload.
pub struct LoadContext<'a> {
    handle: LoadedObjectHandle,
    language: LanguageId,
    temporary: bool,
    lookup: &'a dyn ObjectLookup,
    images: &'a mut ImageRegistry,
    strings: &'a mut StringRegistry,
    dependencies: Option<&'a mut DependentObjects>,
    bound: Vec<StringId>,
}

impl<'a> LoadContext<'a> {
    /// Context for loading into a repository slot.
    pub fn for_slot(
        handle: LoadedObjectHandle,
        language: LanguageId,
        lookup: &'a dyn ObjectLookup,
        images: &'a mut ImageRegistry,
        strings: &'a mut StringRegistry,
    ) -> Self {
        Self {
            handle,
            language,
            temporary: false,
            lookup,
            images,
            strings,
            dependencies: None,
            bound: Vec::new(),
        }
    }

    /// Context for a preview load that records dependencies.
    pub fn for_preview(
        object_type: ObjectType,
        language: LanguageId,
        lookup: &'a dyn ObjectLookup,
        images: &'a mut ImageRegistry,
        strings: &'a mut StringRegistry,
        dependencies: &'a mut DependentObjects,
    ) -> Self {
        Self {
            handle: LoadedObjectHandle::new(object_type, 0),
            language,
            temporary: true,
            lookup,
            images,
            strings,
            dependencies: Some(dependencies),
            bound: Vec::new(),
        }
    }

    pub fn handle(&self) -> LoadedObjectHandle {
        self.handle
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Read string table `index` and bind its text.
    pub fn load_string_table(&mut self, reader: &mut BinaryReader<'_>, index: u8) -> Result<StringId> {
        let table = read_string_table(reader, self.language)?;
        let id = if self.temporary {
            temporary_string_id(index)
        } else {
            object_string_id(self.handle, index)?
        };
        self.strings.bind(id, table.text);
        self.bound.push(id);
        Ok(id)
    }

    pub fn load_image_table(&mut self, reader: &mut BinaryReader<'_>) -> Result<ImageTable> {
        load_image_table(reader, self.images)
    }

    /// Read a header this object requires and resolve it.
    pub fn require(&mut self, reader: &mut BinaryReader<'_>) -> Result<Option<LoadedObjectHandle>> {
        let header = reader.read_struct::<ObjectHeader>()?;
        if let Some(deps) = self.dependencies.as_deref_mut() {
            deps.required.push(header);
        }
        Ok(self.lookup.find_object_handle(&header))
    }

    /// Read a header this object will load alongside itself and resolve it.
    pub fn will_load(&mut self, reader: &mut BinaryReader<'_>) -> Result<Option<LoadedObjectHandle>> {
        let header = reader.read_struct::<ObjectHeader>()?;
        if let Some(deps) = self.dependencies.as_deref_mut() {
            deps.will_load.push(header);
        }
        Ok(self.lookup.find_object_handle(&header))
    }

    /// Read a header and resolve it without recording a dependency.
    pub fn find(&mut self, reader: &mut BinaryReader<'_>) -> Result<Option<LoadedObjectHandle>> {
        let header = reader.read_struct::<ObjectHeader>()?;
        Ok(self.lookup.find_object_handle(&header))
    }

    pub fn find_fuzzy(&mut self, reader: &mut BinaryReader<'_>) -> Result<Option<LoadedObjectHandle>> {
        let header = reader.read_struct::<ObjectHeader>()?;
        Ok(self.lookup.find_object_handle_fuzzy(&header))
    }

    /// Mask of resident cargo slots whose category equals `category`.
    pub fn cargo_matching(&self, category: u16) -> u32 {
        (0..ObjectType::Cargo.max_objects())
            .filter(|&id| {
                self.lookup
                    .object_payload(LoadedObjectHandle::new(ObjectType::Cargo, id))
                    .is_some_and(|payload| u16_at(payload, CARGO_CATEGORY) == category)
            })
            .fold(0, |mask, id| mask | 1u32.checked_shl(u32::from(id)).unwrap_or(0))
    }

    /// String ids bound so far. Consumes the context.
    pub fn finish(self) -> Vec<StringId> {
        self.bound
    }
}

/// Derived state of a loaded object, rebuilt by every load pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentState {
    pub strings: Vec<StringId>,
    pub images: Option<ImageTable>,
    pub details: ContentDetails,
}

impl ContentState {
    /// `(intelligence, aggressiveness, competitiveness)` for competitors.
    pub fn ratings(&self) -> Option<(u8, u8, u8)> {
        match &self.details {
            ContentDetails::Competitor(c) => Some((c.intelligence, c.aggressiveness, c.competitiveness)),
            _ => None,
        }
    }

    pub fn num_images(&self) -> u32 {
        self.images.map_or(0, |t| t.count)
    }
}

/// Type-specific results of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContentDetails {
    #[default]
    None,
    Vehicle(VehicleDetails),
    Track(TrackDetails),
    Competitor(CompetitorDetails),
}

/// Operations every content type provides.
pub trait ContentType: Sync {
    fn object_type(&self) -> ObjectType;

    /// Sanity checks on the raw payload. Must pass before `load` runs.
    fn validate(&self, payload: &[u8]) -> Result<()>;

    /// Parse the body: string tables, type-specific sections, image table.
    fn load(&self, payload: &[u8], ctx: &mut LoadContext<'_>) -> Result<ContentState>;

    /// Drop everything `load` bound.
    fn unload(&self, state: &mut ContentState, strings: &mut StringRegistry) {
        for id in state.strings.drain(..) {
            strings.remove(id);
        }
        state.images = None;
        state.details = ContentDetails::None;
    }
}

/// Reject payloads shorter than the type's fixed body.
pub(crate) fn check_fixed_len(object_type: ObjectType, payload: &[u8]) -> Result<()> {
    let needed = object_type.fixed_len();
    if payload.len() < needed {
        return Err(Error::PayloadTooShort {
            object_type,
            needed,
            actual: payload.len(),
        });
    }
    Ok(())
}

static VEHICLE: VehicleContent = VehicleContent;
static TRACK: TrackContent = TrackContent;
static COMPETITOR: CompetitorContent = CompetitorContent;

macro_rules! framed {
    ($($ty:ident),* $(,)?) => {
        [$(FramedContent::new(ObjectType::$ty)),*]
    };
}

static FRAMED: [FramedContent; OBJECT_TYPE_COUNT] = framed![
    InterfaceSkin, Sound, Currency, Steam, Rock, Water, Land, TownNames, Cargo, Wall,
    TrackSignal, LevelCrossing, StreetLight, Tunnel, Bridge, TrackStation, TrackExtra, Track,
    RoadStation, RoadExtra, Road, Airport, Dock, Vehicle, Tree, Snow, Climate, HillShapes,
    Building, Scaffolding, Industry, Region, Competitor, ScenarioText,
];

/// The registry entry for `object_type`.
pub fn content_type(object_type: ObjectType) -> &'static dyn ContentType {
    match object_type {
        ObjectType::Vehicle => &VEHICLE,
        ObjectType::Track => &TRACK,
        ObjectType::Competitor => &COMPETITOR,
        other => &FRAMED[other.index()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_type() {
        for ty in ObjectType::ALL {
            assert_eq!(content_type(ty).object_type(), ty);
        }
    }

    #[test]
    fn test_short_payload_rejected() {
        for ty in ObjectType::ALL {
            let payload = vec![0u8; ty.fixed_len() - 1];
            assert!(matches!(
                content_type(ty).validate(&payload),
                Err(Error::PayloadTooShort { .. })
            ));
        }
    }

    #[test]
    fn test_unload_releases_strings() {
        let mut strings = StringRegistry::new();
        strings.bind(0x2100, b"Name");
        let mut state = ContentState {
            strings: vec![0x2100],
            ..Default::default()
        };
        content_type(ObjectType::Cargo).unload(&mut state, &mut strings);
        assert!(strings.is_empty());
        assert!(state.strings.is_empty());
    }

    #[test]
    fn test_handle_display() {
        let handle = LoadedObjectHandle::new(ObjectType::Vehicle, 3);
        assert_eq!(handle.to_string(), "vehicle#3");
    }
}
