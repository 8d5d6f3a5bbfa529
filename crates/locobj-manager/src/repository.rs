//! Loaded objects: a fixed array of slots per content type.

use locobj_common::BinaryWriter;
use locobj_object::{
    content_type, ContentState, FramedObject, ImageRegistry, LanguageId, LoadContext, LoadedObjectHandle,
    LoadedObjectId, ObjectFile, ObjectHeader, ObjectLookup, ObjectType, StringRegistry, TypedObject,
    MAX_OBJECTS_TOTAL,
};
use locobj_sawyer::write_chunk;
use tracing::{debug, warn};

use crate::{Error, Result};

/// A resident object.
#[derive(Debug, Clone)]
pub struct LoadedObject {
    pub header: ObjectHeader,
    pub payload: Vec<u8>,
    /// `None` until the body has been parsed.
    pub state: Option<ContentState>,
}

/// One repository slot.
#[derive(Debug, Clone, Default)]
pub enum Slot {
    /// Never used since startup.
    #[default]
    Empty,
    /// Held an object that has since been unloaded.
    Freed,
    Occupied(LoadedObject),
}

impl Slot {
    pub fn is_available(&self) -> bool {
        !matches!(self, Slot::Occupied(_))
    }

    pub fn object(&self) -> Option<&LoadedObject> {
        match self {
            Slot::Occupied(object) => Some(object),
            _ => None,
        }
    }

    fn object_mut(&mut self) -> Option<&mut LoadedObject> {
        match self {
            Slot::Occupied(object) => Some(object),
            _ => None,
        }
    }
}

/// Whether to parse the body when storing an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Full,
    /// Store the payload only; the next reload parses it.
    Partial,
}

#[derive(Debug, Clone)]
struct Slots {
    slots: Vec<Slot>,
}

impl Slots {
    fn index(&self, handle: LoadedObjectHandle) -> Option<usize> {
        (handle.id < handle.object_type.max_objects())
            .then(|| handle.object_type.first_slot_index() + usize::from(handle.id))
    }

    fn get(&self, handle: LoadedObjectHandle) -> Option<&Slot> {
        self.slots.get(self.index(handle)?)
    }

    fn handles(object_type: ObjectType) -> impl Iterator<Item = LoadedObjectHandle> {
        (0..object_type.max_objects()).map(move |id| LoadedObjectHandle::new(object_type, id))
    }

    fn find(&self, header: &ObjectHeader, matches: impl Fn(&ObjectHeader, &ObjectHeader) -> bool) -> Option<LoadedObjectHandle> {
        let object_type = header.object_type()?;
        Self::handles(object_type).find(|&handle| {
            self.get(handle)
                .and_then(Slot::object)
                .is_some_and(|object| matches(&object.header, header))
        })
    }
}

impl ObjectLookup for Slots {
    fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.find(header, |a, b| a == b)
    }

    fn find_object_handle_fuzzy(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.find(header, ObjectHeader::fuzzy_eq)
    }

    fn object_payload(&self, handle: LoadedObjectHandle) -> Option<&[u8]> {
        Some(self.get(handle)?.object()?.payload.as_slice())
    }
}

/// Every loaded object plus the image and string ids bound to them.
#[derive(Debug, Clone)]
pub struct ObjectRepository {
    slots: Slots,
    images: ImageRegistry,
    strings: StringRegistry,
    language: LanguageId,
}

impl Default for ObjectRepository {
    fn default() -> Self {
        Self::new(LanguageId::default())
    }
}

impl ObjectRepository {
    pub fn new(language: LanguageId) -> Self {
        Self {
            slots: Slots {
                slots: vec![Slot::Empty; MAX_OBJECTS_TOTAL],
            },
            images: ImageRegistry::new(),
            strings: StringRegistry::new(),
            language,
        }
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn set_language(&mut self, language: LanguageId) {
        self.language = language;
    }

    /// Slot capacity of a type.
    pub fn max_objects(object_type: ObjectType) -> u16 {
        object_type.max_objects()
    }

    pub fn slot(&self, handle: LoadedObjectHandle) -> Option<&Slot> {
        self.slots.get(handle)
    }

    pub fn strings(&self) -> &StringRegistry {
        &self.strings
    }

    pub fn images(&self) -> &ImageRegistry {
        &self.images
    }

    /// The image id counter.
    pub fn total_num_images(&self) -> u32 {
        self.images.total()
    }

    /// Handle of the slot at `position` in [`get_headers`](Self::get_headers)
    /// order.
    pub fn handle_at(position: usize) -> Option<LoadedObjectHandle> {
        let mut first = 0;
        for object_type in ObjectType::ALL {
            let count = usize::from(object_type.max_objects());
            if position < first + count {
                return Some(LoadedObjectHandle::new(object_type, (position - first) as LoadedObjectId));
            }
            first += count;
        }
        None
    }

    /// First slot of the type that is empty or freed.
    pub fn find_free_object_id(&self, object_type: ObjectType) -> Option<LoadedObjectId> {
        Slots::handles(object_type)
            .find(|&handle| self.slots.get(handle).is_some_and(Slot::is_available))
            .map(|handle| handle.id)
    }

    /// Occupied slots of one type.
    pub fn num_loaded(&self, object_type: ObjectType) -> usize {
        Slots::handles(object_type)
            .filter(|&handle| self.slots.get(handle).and_then(Slot::object).is_some())
            .count()
    }

    /// Every occupied slot in type, then slot, order.
    pub fn loaded_objects(&self) -> impl Iterator<Item = (LoadedObjectHandle, &LoadedObject)> + '_ {
        ObjectType::ALL
            .into_iter()
            .flat_map(Slots::handles)
            .filter_map(|handle| Some((handle, self.slots.get(handle)?.object()?)))
    }

    /// Store a verified file in slot `id`, parsing its body unless `mode`
    /// is partial. The slot must be available.
    pub fn load_object(&mut self, file: ObjectFile, id: LoadedObjectId, mode: LoadMode) -> Result<LoadedObjectHandle> {
        let object_type = file
            .header
            .object_type()
            .ok_or(Error::UnknownObjectType(file.header.type_tag()))?;
        let handle = LoadedObjectHandle::new(object_type, id);
        let index = self.slots.index(handle).ok_or(Error::SlotOutOfRange { object_type, id })?;

        if !self.images.has_capacity() {
            return Err(Error::ImageSpaceExhausted);
        }
        if !self.slots.slots[index].is_available() {
            return Err(Error::SlotOccupied { object_type, id });
        }

        let previous = std::mem::replace(
            &mut self.slots.slots[index],
            Slot::Occupied(LoadedObject {
                header: file.header,
                payload: file.payload,
                state: None,
            }),
        );

        if mode == LoadMode::Full {
            if let Err(err) = self.load_body(index, handle) {
                self.slots.slots[index] = previous;
                return Err(err);
            }
        }
        debug!(object = %handle, ?mode, "object loaded");
        Ok(handle)
    }

    /// Parse the resident payload of slot `index`.
    fn load_body(&mut self, index: usize, handle: LoadedObjectHandle) -> Result<()> {
        let Some(object) = self.slots.slots[index].object() else {
            return Ok(());
        };
        let images_before = self.images.total();
        let mut ctx = LoadContext::for_slot(handle, self.language, &self.slots, &mut self.images, &mut self.strings);
        let result = content_type(handle.object_type).load(&object.payload, &mut ctx);
        let bound = ctx.finish();

        match result {
            Ok(mut state) => {
                state.strings = bound;
                if let Some(object) = self.slots.slots[index].object_mut() {
                    object.state = Some(state);
                }
                Ok(())
            }
            Err(err) => {
                for id in bound {
                    self.strings.remove(id);
                }
                self.images.truncate(images_before);
                Err(match err {
                    locobj_object::Error::ImageSpaceExhausted => Error::ImageSpaceExhausted,
                    other => other.into(),
                })
            }
        }
    }

    /// Release the derived state of a slot, keeping its payload resident.
    pub fn unload_handle(&mut self, handle: LoadedObjectHandle) {
        let Some(index) = self.slots.index(handle) else {
            return;
        };
        if let Some(object) = self.slots.slots[index].object_mut() {
            if let Some(mut state) = object.state.take() {
                content_type(handle.object_type).unload(&mut state, &mut self.strings);
            }
        }
    }

    /// Unload the object matching `header` and free its slot.
    pub fn unload(&mut self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        let handle = self.find_object_handle(header)?;
        self.free(handle);
        debug!(object = %handle, "object unloaded");
        Some(handle)
    }

    fn free(&mut self, handle: LoadedObjectHandle) {
        self.unload_handle(handle);
        if let Some(index) = self.slots.index(handle) {
            self.slots.slots[index] = Slot::Freed;
        }
    }

    /// Unload every object and free every occupied slot.
    pub fn unload_all(&mut self) {
        let handles: Vec<_> = self.loaded_objects().map(|(handle, _)| handle).collect();
        for handle in handles {
            self.free(handle);
        }
    }

    /// Reset the image counter and re-parse every resident payload in type,
    /// then slot, order. Objects that no longer parse stay resident but
    /// unloaded.
    pub fn reload_all(&mut self) {
        self.images.reset();
        let handles: Vec<_> = self.loaded_objects().map(|(handle, _)| handle).collect();
        for handle in handles {
            self.unload_handle(handle);
            let Some(index) = self.slots.index(handle) else {
                continue;
            };
            if let Err(err) = self.load_body(index, handle) {
                warn!(object = %handle, error = %err, "object failed to reload");
            }
        }
    }

    /// Headers of every slot in type, then slot, order; empty headers for
    /// unused slots.
    pub fn get_headers(&self) -> Vec<ObjectHeader> {
        self.slots
            .slots
            .iter()
            .map(|slot| slot.object().map_or(ObjectHeader::EMPTY, |object| object.header))
            .collect()
    }

    pub fn get_header(&self, handle: LoadedObjectHandle) -> Option<ObjectHeader> {
        Some(self.slots.get(handle)?.object()?.header)
    }

    /// Resident payload length.
    pub fn get_byte_length(&self, handle: LoadedObjectHandle) -> Option<usize> {
        Some(self.slots.get(handle)?.object()?.payload.len())
    }

    pub fn get_any(&self, handle: LoadedObjectHandle) -> Option<FramedObject<'_>> {
        let object = self.slots.get(handle)?.object()?;
        Some(FramedObject::new(
            handle,
            &object.header,
            &object.payload,
            object.state.as_ref(),
            &self.strings,
        ))
    }

    /// Typed view of slot `id`.
    pub fn get<'a, T: TypedObject<'a>>(&'a self, id: LoadedObjectId) -> Option<T> {
        T::from_framed(self.get_any(LoadedObjectHandle::new(T::OBJECT_TYPE, id))?)
    }

    /// Append header and chunk for each of `headers`, from the resident
    /// payloads.
    pub fn write_packed_objects(&self, writer: &mut BinaryWriter, headers: &[ObjectHeader]) -> Result<()> {
        for header in headers {
            let handle = self.find_object_handle(header).ok_or(Error::NotLoaded(*header))?;
            let object = self
                .slots
                .get(handle)
                .and_then(Slot::object)
                .ok_or(Error::NotLoaded(*header))?;
            writer.write_struct(header);
            write_chunk(writer, handle.object_type.best_encoding(), &object.payload)?;
        }
        Ok(())
    }
}

impl ObjectLookup for ObjectRepository {
    fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.slots.find_object_handle(header)
    }

    fn find_object_handle_fuzzy(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.slots.find_object_handle_fuzzy(header)
    }

    fn object_payload(&self, handle: LoadedObjectHandle) -> Option<&[u8]> {
        self.slots.object_payload(handle)
    }
}
