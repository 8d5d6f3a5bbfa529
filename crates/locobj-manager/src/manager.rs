//! The object manager: index, repository and installer behind one handle.

use std::path::{Path, PathBuf};

use locobj_common::BinaryWriter;
use locobj_object::{
    FramedObject, LoadedObjectHandle, LoadedObjectId, ObjectFile, ObjectHeader, ObjectLookup, ObjectType,
    TypedObject,
};
use tracing::{info, warn};

use crate::config::ObjectManagerConfig;
use crate::descriptor::ObjectIndexEntry;
use crate::fingerprint::{folder_state, object_files, FolderState};
use crate::hooks::{HostHooks, NullHost};
use crate::index::{ObjectIndex, ObjectIndexId};
use crate::installer;
use crate::loader::find_and_preload_object;
use crate::repository::{LoadMode, ObjectRepository};
use crate::temporary::{self, TemporaryObject};
use crate::{Error, Result};

/// Outcome of [`ObjectManager::load_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadObjectsResult {
    pub success: bool,
    /// Every header that failed to load, in request order.
    pub problem_objects: Vec<ObjectHeader>,
}

/// Installed objects and the objects currently loaded from them.
pub struct ObjectManager {
    config: ObjectManagerConfig,
    index: ObjectIndex,
    repository: ObjectRepository,
    hooks: Box<dyn HostHooks>,
}

impl std::fmt::Debug for ObjectManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectManager")
            .field("config", &self.config)
            .field("installed", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl ObjectManager {
    /// A manager with an empty index. Call [`load_index`](Self::load_index)
    /// before resolving objects.
    pub fn new(config: ObjectManagerConfig) -> Self {
        Self::with_hooks(config, Box::new(NullHost))
    }

    pub fn with_hooks(config: ObjectManagerConfig, hooks: Box<dyn HostHooks>) -> Self {
        let repository = ObjectRepository::new(config.language);
        Self {
            config,
            index: ObjectIndex::new(),
            repository,
            hooks,
        }
    }

    pub fn config(&self) -> &ObjectManagerConfig {
        &self.config
    }

    pub fn index(&self) -> &ObjectIndex {
        &self.index
    }

    pub fn repository(&self) -> &ObjectRepository {
        &self.repository
    }

    fn objects_dir(&self) -> &Path {
        self.config.objects_dir()
    }

    /// Bring the index up to date with the objects directory.
    ///
    /// A cache written for the current directory fingerprint is used as is;
    /// otherwise every file is previewed again and the cache rewritten.
    /// Loaded objects are re-parsed either way.
    pub fn load_index(&mut self) -> Result<()> {
        let index_path = self.config.index_path();
        let mut files = object_files(self.objects_dir())?;
        // The cache itself may live among the objects.
        files.retain(|file| *file != index_path);
        let state = folder_state(&files)?;

        if let Some(index) = ObjectIndex::load_cached(&index_path, state) {
            info!(
                path = %index_path.display(),
                objects = index.len(),
                "object index loaded from cache"
            );
            self.index = index;
            self.repository.reload_all();
            return Ok(());
        }
        self.rebuild_index(&files, state, &index_path)
    }

    fn rebuild_index(&mut self, files: &[PathBuf], state: FolderState, index_path: &Path) -> Result<()> {
        self.repository.reload_all();
        self.hooks.progress_begin(self.config.progress_caption());

        let built = ObjectIndex::build(
            files,
            state,
            self.config.language,
            &self.repository,
            self.hooks.as_mut(),
        );
        let index = match built {
            Ok(index) => index,
            Err(err) => {
                if let Error::OutOfMemory { .. } = err {
                    self.hooks
                        .show_fatal_error("Game initialisation failure", "Unable to allocate enough memory");
                }
                self.hooks.progress_end();
                return Err(err);
            }
        };
        self.index = index;
        self.repository.reload_all();

        if let Err(err) = self.index.save(index_path) {
            warn!(path = %index_path.display(), error = %err, "unable to save the object index");
        }
        self.hooks.progress_end();
        Ok(())
    }

    pub fn get_num_installed_objects(&self) -> usize {
        self.index.len()
    }

    pub fn has_custom_objects_in_index(&self) -> bool {
        self.index.has_custom_objects()
    }

    pub fn get_available_objects(&self, object_type: ObjectType) -> Vec<(ObjectIndexId, ObjectIndexEntry<'_>)> {
        self.index.available_objects(object_type)
    }

    pub fn find_object_in_index(&self, header: &ObjectHeader) -> Option<ObjectIndexEntry<'_>> {
        self.index.find(header)
    }

    /// First selected object of `object_type`; see
    /// [`ObjectIndex::get_active_object`].
    pub fn get_active_object(
        &self,
        object_type: ObjectType,
        selection_flags: &[u8],
    ) -> Option<(ObjectIndexId, ObjectIndexEntry<'_>)> {
        self.index.get_active_object(object_type, selection_flags)
    }

    /// Load `header` into the first free slot of its type.
    pub fn load(&mut self, header: &ObjectHeader) -> Result<LoadedObjectHandle> {
        let object_type = header
            .object_type()
            .ok_or(Error::UnknownObjectType(header.type_tag()))?;
        let id = self
            .repository
            .find_free_object_id(object_type)
            .ok_or(Error::NoFreeSlot(object_type))?;
        self.load_with_id(header, id)
    }

    /// Re-read `header` from disk, verify it and load it into slot `id`.
    pub fn load_with_id(&mut self, header: &ObjectHeader, id: LoadedObjectId) -> Result<LoadedObjectHandle> {
        self.load_from_disk(header, id, LoadMode::Full)
    }

    fn load_from_disk(&mut self, header: &ObjectHeader, id: LoadedObjectId, mode: LoadMode) -> Result<LoadedObjectHandle> {
        let file = find_and_preload_object(&self.index, self.config.objects_dir(), header)?;
        self.repository.load_object(file, id, mode)
    }

    /// Replace every loaded object with `headers`, laid out in
    /// [`ObjectRepository::get_headers`] order. Empty headers leave their
    /// slot unused.
    ///
    /// Payloads are stored first and parsed together afterwards, so an object
    /// resolves references to any other object in the set regardless of
    /// slot order. Every failing header is reported. If any fails, nothing
    /// stays loaded.
    pub fn load_all(&mut self, headers: &[ObjectHeader]) -> LoadObjectsResult {
        self.repository.unload_all();

        let mut problem_objects = Vec::new();
        for (position, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let result = ObjectRepository::handle_at(position)
                .ok_or(Error::NotInstalled(*header))
                .and_then(|slot| self.load_from_disk(header, slot.id, LoadMode::Partial));
            if let Err(err) = result {
                warn!(object = %header, position, error = %err, "object failed to load");
                problem_objects.push(*header);
            }
        }

        if problem_objects.is_empty() {
            self.repository.reload_all();
        } else {
            self.repository.unload_all();
        }
        LoadObjectsResult {
            success: problem_objects.is_empty(),
            problem_objects,
        }
    }

    /// Unload the object matching `header`, if loaded.
    pub fn unload(&mut self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.repository.unload(header)
    }

    pub fn unload_all(&mut self) {
        self.repository.unload_all();
    }

    pub fn find_object_handle(&self, header: &ObjectHeader) -> Option<LoadedObjectHandle> {
        self.repository.find_object_handle(header)
    }

    pub fn get<'a, T: TypedObject<'a>>(&'a self, id: LoadedObjectId) -> Option<T> {
        self.repository.get(id)
    }

    pub fn get_any(&self, handle: LoadedObjectHandle) -> Option<FramedObject<'_>> {
        self.repository.get_any(handle)
    }

    pub fn get_headers(&self) -> Vec<ObjectHeader> {
        self.repository.get_headers()
    }

    pub fn get_total_num_images(&self) -> u32 {
        self.repository.total_num_images()
    }

    /// Preview an installed object without committing it to a slot.
    pub fn load_temporary_object(&self, header: &ObjectHeader) -> Result<TemporaryObject> {
        temporary::load_temporary_object(
            &self.index,
            self.config.objects_dir(),
            header,
            self.config.language,
            &self.repository,
        )
    }

    /// Preview a decoded file that need not be installed.
    pub fn preview_object_file(&self, file: ObjectFile) -> Result<TemporaryObject> {
        temporary::preview_object_file(file, self.config.language, &self.repository)
    }

    /// Install `file` and refresh the index. Loaded objects are unloaded.
    pub fn try_install_object(&mut self, file: ObjectFile) -> Result<PathBuf> {
        let path = installer::try_install_object(
            &mut self.repository,
            &self.index,
            self.config.objects_dir(),
            file,
            self.hooks.as_mut(),
        )?;
        self.load_index()?;
        Ok(path)
    }

    pub fn write_packed_objects(&self, writer: &mut BinaryWriter, headers: &[ObjectHeader]) -> Result<()> {
        self.repository.write_packed_objects(writer, headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use locobj_object::fixtures::{
        competitor_payload, framed_payload, object_file, object_header, vehicle_payload, vehicle_payload_compatible,
    };
    use locobj_object::{CompetitorObject, VehicleObject, IMAGE_BASE_OBJECTS};

    fn write(dir: &Path, name: &str, file: &ObjectFile) {
        file.save(dir.join(name)).unwrap();
    }

    fn manager(dir: &Path) -> ObjectManager {
        ObjectManager::new(ObjectManagerConfig::new(dir))
    }

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl HostHooks for Recorder {
        fn progress_begin(&mut self, caption: &str) {
            self.events.borrow_mut().push(format!("begin {caption}"));
        }

        fn progress_end(&mut self) {
            self.events.borrow_mut().push("end".to_owned());
        }
    }

    #[test]
    fn test_scan_load_unload() {
        let dir = tempfile::tempdir().unwrap();
        let vehicle = object_file(ObjectType::Vehicle, "BOEING", vehicle_payload("Boeing 707", 2));
        write(dir.path(), "BOEING.DAT", &vehicle);
        let mut truncated = object_file(ObjectType::Vehicle, "BROKEN", vehicle_payload("Broken", 2))
            .to_bytes()
            .unwrap();
        truncated.truncate(truncated.len() - 10);
        std::fs::write(dir.path().join("BROKEN.DAT"), truncated).unwrap();

        let mut manager = manager(dir.path());
        manager.load_index().unwrap();
        assert_eq!(manager.get_num_installed_objects(), 1);
        assert_eq!(manager.get_available_objects(ObjectType::Vehicle).len(), 1);
        assert!(manager.has_custom_objects_in_index());

        let entry = manager.find_object_in_index(&vehicle.header).unwrap();
        assert_eq!(entry.name_lossy(), "Boeing 707");
        assert_eq!(entry.num_images, 2);

        let handle = manager.load(&vehicle.header).unwrap();
        assert_eq!(handle, LoadedObjectHandle::new(ObjectType::Vehicle, 0));
        let loaded = manager.get::<VehicleObject>(0).unwrap();
        assert_eq!(loaded.object.name().as_deref(), Some("Boeing 707"));
        assert_eq!(manager.get_total_num_images(), IMAGE_BASE_OBJECTS + 2);

        assert_eq!(manager.unload(&vehicle.header), Some(handle));
        assert!(manager.get::<VehicleObject>(0).is_none());
    }

    #[test]
    fn test_index_cache_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let competitor = object_file(ObjectType::Competitor, "COMP1", competitor_payload("Tycoon", (1, 2, 3)));
        write(dir.path(), "COMP1.DAT", &competitor);

        let events = Rc::new(RefCell::new(Vec::new()));
        let hooks = Recorder { events: events.clone() };
        let mut manager = ObjectManager::with_hooks(ObjectManagerConfig::new(dir.path()), Box::new(hooks));
        manager.load_index().unwrap();
        let built = manager.index().as_bytes().to_vec();
        assert!(dir.path().join("objindex.dat").exists());
        assert_eq!(*events.borrow(), ["begin Checking object files...", "end"]);

        manager.load_index().unwrap();
        assert_eq!(manager.index().as_bytes(), built.as_slice());
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_load_all_reports_every_failure() {
        let dir = tempfile::tempdir().unwrap();
        let currency = object_file(
            ObjectType::Currency,
            "CURRPNDS",
            framed_payload(ObjectType::Currency, &["Pounds"], 1),
        );
        let competitor = object_file(ObjectType::Competitor, "COMP1", competitor_payload("Tycoon", (1, 2, 3)));
        write(dir.path(), "CURRPNDS.DAT", &currency);
        write(dir.path(), "COMP1.DAT", &competitor);

        let mut manager = manager(dir.path());
        manager.load_index().unwrap();

        let mut headers = vec![ObjectHeader::EMPTY; locobj_object::MAX_OBJECTS_TOTAL];
        headers[ObjectType::Currency.first_slot_index()] = currency.header;
        headers[ObjectType::Competitor.first_slot_index() + 3] = competitor.header;

        let result = manager.load_all(&headers);
        assert!(result.success);
        assert!(manager.get::<CompetitorObject>(3).is_some());
        assert_eq!(manager.get_headers(), headers);

        let missing_a = object_header(ObjectType::Vehicle, "MISSINGA");
        let missing_b = object_header(ObjectType::Tree, "MISSINGB");
        headers[ObjectType::Vehicle.first_slot_index()] = missing_a;
        headers[ObjectType::Tree.first_slot_index()] = missing_b;

        let result = manager.load_all(&headers);
        assert!(!result.success);
        assert_eq!(result.problem_objects, vec![missing_a, missing_b]);
        assert_eq!(manager.repository().loaded_objects().count(), 0);
    }

    #[test]
    fn test_load_all_resolves_later_slots() {
        let dir = tempfile::tempdir().unwrap();
        let second = object_file(ObjectType::Vehicle, "VEHB", vehicle_payload("Second", 2));
        let first = object_file(
            ObjectType::Vehicle,
            "VEHA",
            vehicle_payload_compatible("First", 3, &second.header),
        );
        write(dir.path(), "VEHA.DAT", &first);
        write(dir.path(), "VEHB.DAT", &second);

        let mut manager = manager(dir.path());
        manager.load_index().unwrap();

        let mut headers = vec![ObjectHeader::EMPTY; locobj_object::MAX_OBJECTS_TOTAL];
        headers[ObjectType::Vehicle.first_slot_index()] = first.header;
        headers[ObjectType::Vehicle.first_slot_index() + 1] = second.header;

        let result = manager.load_all(&headers);
        assert!(result.success);
        let loaded = manager.get::<VehicleObject>(0).unwrap();
        assert_eq!(
            loaded.details().unwrap().compatible,
            vec![LoadedObjectHandle::new(ObjectType::Vehicle, 1)]
        );
        assert!(manager.get::<VehicleObject>(1).is_some());
        assert_eq!(manager.get_total_num_images(), IMAGE_BASE_OBJECTS + 5);
    }

    #[test]
    fn test_temporary_load_leaves_images_alone() {
        let dir = tempfile::tempdir().unwrap();
        let vehicle = object_file(ObjectType::Vehicle, "BOEING", vehicle_payload("Boeing 707", 7));
        let competitor = object_file(ObjectType::Competitor, "COMP1", competitor_payload("Tycoon", (1, 2, 3)));
        write(dir.path(), "BOEING.DAT", &vehicle);
        write(dir.path(), "COMP1.DAT", &competitor);

        let mut manager = manager(dir.path());
        manager.load_index().unwrap();
        let before = manager.get_total_num_images();

        let preview = manager.load_temporary_object(&vehicle.header).unwrap();
        assert_eq!(preview.num_images(), 7);
        drop(preview);
        let preview = manager.load_temporary_object(&competitor.header).unwrap();
        assert_eq!(preview.num_images(), 1);
        assert_eq!(manager.get_total_num_images(), before);
        assert!(manager.find_object_handle(&vehicle.header).is_none());
    }

    #[test]
    fn test_install_refreshes_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path());
        manager.load_index().unwrap();
        assert_eq!(manager.get_num_installed_objects(), 0);

        let vehicle = object_file(ObjectType::Vehicle, "BOEING", vehicle_payload("Boeing 707", 1));
        let header = vehicle.header;
        let path = manager.try_install_object(vehicle).unwrap();

        assert_eq!(path, dir.path().join("BOEING.DAT"));
        assert_eq!(manager.get_num_installed_objects(), 1);
        assert!(manager.load(&header).is_ok());
    }

    #[test]
    fn test_load_without_free_slot() {
        let dir = tempfile::tempdir().unwrap();
        let pounds = object_file(ObjectType::Currency, "CURRPNDS", framed_payload(ObjectType::Currency, &["Pounds"], 1));
        let dollars = object_file(ObjectType::Currency, "CURRDOLR", framed_payload(ObjectType::Currency, &["Dollars"], 1));
        write(dir.path(), "CURRPNDS.DAT", &pounds);
        write(dir.path(), "CURRDOLR.DAT", &dollars);

        let mut manager = manager(dir.path());
        manager.load_index().unwrap();
        manager.load(&pounds.header).unwrap();
        assert!(matches!(manager.load(&dollars.header), Err(Error::NoFreeSlot(ObjectType::Currency))));
    }
}
