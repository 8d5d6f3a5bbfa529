//! Preview loads: parse an object without committing it to a slot.

use std::borrow::Cow;
use std::path::Path;

use locobj_object::string_table::temporary_string_id;
use locobj_object::{
    content_type, ContentState, DependentObjects, FramedObject, ImageRegistry, LanguageId, LoadContext,
    LoadedObjectHandle, ObjectFile, ObjectHeader, ObjectLookup, StringRegistry, IMAGE_BASE_DISC,
};

use crate::index::ObjectIndex;
use crate::loader::{find_and_preload_object, verify_object};
use crate::{Error, Result};

/// A parsed, uncommitted object. Dropping it releases everything the
/// preview bound.
#[derive(Debug)]
pub struct TemporaryObject {
    file: ObjectFile,
    state: ContentState,
    strings: StringRegistry,
    dependencies: DependentObjects,
    num_images: u32,
}

impl TemporaryObject {
    pub fn header(&self) -> &ObjectHeader {
        &self.file.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.file.payload
    }

    pub fn decoded_size(&self) -> usize {
        self.file.payload.len()
    }

    /// Images the object contributes.
    pub fn num_images(&self) -> u32 {
        self.num_images
    }

    pub fn dependencies(&self) -> &DependentObjects {
        &self.dependencies
    }

    /// `(intelligence, aggressiveness, competitiveness)` for competitors.
    pub fn ratings(&self) -> Option<(u8, u8, u8)> {
        self.state.ratings()
    }

    pub fn state(&self) -> &ContentState {
        &self.state
    }

    /// Raw display name (string table 0).
    pub fn name_bytes(&self) -> &[u8] {
        self.strings.get(temporary_string_id(0)).unwrap_or_default()
    }

    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }

    /// View with the preview's own string bindings.
    pub fn as_framed(&self) -> Option<FramedObject<'_>> {
        let object_type = self.file.header.object_type()?;
        Some(FramedObject::new(
            LoadedObjectHandle::new(object_type, 0),
            &self.file.header,
            &self.file.payload,
            Some(&self.state),
            &self.strings,
        ))
    }

    pub fn into_file(self) -> ObjectFile {
        self.file
    }
}

/// Preview a decoded file.
///
/// Images are registered into a scratch range starting at
/// [`IMAGE_BASE_DISC`], so the repository's image counter is untouched.
pub fn preview_object_file(
    file: ObjectFile,
    language: LanguageId,
    lookup: &dyn ObjectLookup,
) -> Result<TemporaryObject> {
    verify_object(&file)?;
    let object_type = file
        .header
        .object_type()
        .ok_or(Error::UnknownObjectType(file.header.type_tag()))?;

    let mut images = ImageRegistry::starting_at(IMAGE_BASE_DISC);
    let mut strings = StringRegistry::new();
    let mut dependencies = DependentObjects::default();
    let mut ctx = LoadContext::for_preview(
        object_type,
        language,
        lookup,
        &mut images,
        &mut strings,
        &mut dependencies,
    );
    let result = content_type(object_type).load(&file.payload, &mut ctx);
    let bound = ctx.finish();
    let mut state = result?;
    state.strings = bound;

    Ok(TemporaryObject {
        num_images: images.total() - IMAGE_BASE_DISC,
        file,
        state,
        strings,
        dependencies,
    })
}

/// Find `header` through the index and preview it.
pub fn load_temporary_object(
    index: &ObjectIndex,
    objects_dir: &Path,
    header: &ObjectHeader,
    language: LanguageId,
    lookup: &dyn ObjectLookup,
) -> Result<TemporaryObject> {
    let file = find_and_preload_object(index, objects_dir, header)?;
    preview_object_file(file, language, lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use locobj_object::fixtures::{competitor_payload, object_file, vehicle_payload};
    use locobj_object::{NoObjects, ObjectType};

    #[test]
    fn test_preview_reports_metadata() {
        let file = object_file(ObjectType::Competitor, "COMP1", competitor_payload("Tycoon", (1, 5, 9)));
        let size = file.payload.len();
        let preview = preview_object_file(file, LanguageId::EnglishUk, &NoObjects).unwrap();
        assert_eq!(preview.name(), "Tycoon");
        assert_eq!(preview.ratings(), Some((1, 5, 9)));
        assert_eq!(preview.num_images(), 1);
        assert_eq!(preview.decoded_size(), size);
        assert_eq!(preview.as_framed().unwrap().name().as_deref(), Some("Tycoon"));
    }

    #[test]
    fn test_preview_rejects_bad_checksum() {
        let mut file = object_file(ObjectType::Vehicle, "BOEING", vehicle_payload("Boeing", 1));
        file.payload[0] ^= 1;
        assert!(matches!(
            preview_object_file(file, LanguageId::EnglishUk, &NoObjects),
            Err(Error::ChecksumMismatch(_))
        ));
    }

    #[test]
    fn test_preview_rejects_invalid() {
        let mut payload = vehicle_payload("Boeing", 1);
        payload[0x08] = 0;
        let file = object_file(ObjectType::Vehicle, "BOEING", payload);
        assert!(matches!(
            preview_object_file(file, LanguageId::EnglishUk, &NoObjects),
            Err(Error::ValidationFailed { .. })
        ));
    }
}
