//! The installed object index and its on-disk cache.
//!
//! Descriptors live back to back in one byte buffer, sorted by display
//! name. The cache file is an [`IndexHeader`] followed by that buffer.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use locobj_common::{BinaryReader, BinaryWriter};
use locobj_object::{LanguageId, ObjectHeader, ObjectLookup, ObjectType};
use tracing::{debug, info, warn};

use crate::descriptor::{Entries, ObjectIndexEntry};
use crate::fingerprint::{FolderState, IndexHeader};
use crate::hooks::HostHooks;
use crate::temporary::load_temporary_object;
use crate::{Error, Result};

/// Initial descriptor buffer size during a rebuild.
pub const INITIAL_BUFFER_SIZE: usize = 0x4000;

/// The buffer doubles once free space drops below this.
pub const BUFFER_LOW_WATER: usize = 0x231E;

/// Position of a descriptor in index order.
pub type ObjectIndexId = usize;

/// Bit of a selection flag byte marking the object as selected.
pub const SELECTED_FLAG: u8 = 1 << 0;

/// Descriptors of every installed object.
#[derive(Debug, Clone, Default)]
pub struct ObjectIndex {
    state: FolderState,
    buffer: Vec<u8>,
    offsets: Vec<usize>,
    has_custom: bool,
}

impl ObjectIndex {
    /// An index with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a descriptor buffer holding `count` records.
    pub fn from_buffer(state: FolderState, buffer: Vec<u8>, count: usize) -> Result<Self> {
        let mut offsets = Vec::with_capacity(count);
        let mut entries = Entries::new(&buffer, count);
        loop {
            let offset = entries.position();
            match entries.next() {
                Some(entry) => {
                    entry?;
                    offsets.push(offset);
                }
                None => break,
            }
        }
        if offsets.len() != count || entries.position() != buffer.len() {
            return Err(Error::CorruptIndex(entries.position()));
        }
        let mut index = Self {
            state,
            buffer,
            offsets,
            has_custom: false,
        };
        let has_custom = index.entries().any(|e| e.header.is_custom());
        index.has_custom = has_custom;
        Ok(index)
    }

    /// Read the cache at `path` if it was written for `state`.
    pub fn load_cached(path: &Path, state: FolderState) -> Option<Self> {
        match Self::try_load(path, state) {
            Ok(index) => index,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unable to load the object index");
                None
            }
        }
    }

    fn try_load(path: &Path, state: FolderState) -> Result<Option<Self>> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "object index does not exist");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let header = IndexHeader::read_from(&mut file)?;
        if header.state != state {
            debug!(cached = ?header.state, current = ?state, "object index is stale");
            return Ok(None);
        }

        let mut buffer = Vec::with_capacity(header.file_size as usize);
        file.read_to_end(&mut buffer)?;
        if buffer.len() != header.file_size as usize {
            return Err(Error::CorruptIndex(buffer.len()));
        }
        Self::from_buffer(state, buffer, header.num_objects as usize).map(Some)
    }

    /// Write the cache file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let header = IndexHeader {
            state: self.state,
            file_size: self.buffer.len() as u32,
            num_objects: self.offsets.len() as u32,
        };
        let mut writer = BufWriter::new(File::create(path)?);
        header.write_to(&mut writer)?;
        writer.write_all(&self.buffer)?;
        writer.flush()?;
        Ok(())
    }

    /// Rebuild from `files`, previewing each one.
    ///
    /// Files that fail to read, parse or validate are left out. Only failure
    /// to grow the descriptor buffer aborts the build.
    pub fn build(
        files: &[PathBuf],
        state: FolderState,
        language: LanguageId,
        lookup: &dyn ObjectLookup,
        hooks: &mut dyn HostHooks,
    ) -> Result<Self> {
        let mut index = Self {
            state,
            buffer: Vec::new(),
            offsets: Vec::new(),
            has_custom: false,
        };
        index.grow(INITIAL_BUFFER_SIZE)?;

        let total = (state.num_objects & 0x00FF_FFFF) + 1;
        let mut progress = 0u8;
        for (i, path) in (1u32..).zip(files) {
            hooks.pump_events();
            let new_progress = ((i << 8) / total).min(255) as u8;
            if new_progress != progress {
                progress = new_progress;
                hooks.progress_set(progress);
            }

            if index.buffer.capacity() - index.buffer.len() < BUFFER_LOW_WATER {
                index.grow(index.buffer.capacity())?;
            }
            index.add_file(path, language, lookup)?;
        }

        let has_custom = index.entries().any(|e| e.header.is_custom());
        index.has_custom = has_custom;
        info!(
            objects = index.len(),
            bytes = index.buffer.len(),
            "object index rebuilt"
        );
        Ok(index)
    }

    fn grow(&mut self, additional: usize) -> Result<()> {
        self.buffer.try_reserve_exact(additional).map_err(|_| Error::OutOfMemory {
            what: "object index",
            requested: self.buffer.capacity().saturating_add(additional),
        })
    }

    /// Preview `path` and insert its descriptor. Unusable files are skipped;
    /// only a failed buffer allocation is an error.
    fn add_file(&mut self, path: &Path, language: LanguageId, lookup: &dyn ObjectLookup) -> Result<()> {
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "skipping file with non UTF-8 name");
            return Ok(());
        };
        let header = match locobj_object::ObjectFile::read_header(path) {
            Ok(header) => header,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "unable to read object header");
                return Ok(());
            }
        };

        // Resolve through a partial descriptor so the preview finds the file
        // the same way a later load will.
        let start = self.buffer.len();
        self.push_entry(&ObjectIndexEntry::partial(header, filename.as_bytes()))?;
        let preview = load_temporary_object(self, dir, &header, language, lookup);
        self.buffer.truncate(start);
        self.offsets.pop();

        let preview = match preview {
            Ok(preview) => preview,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "unable to load the object, not indexed");
                return Ok(());
            }
        };

        if let Some(existing) = self.find(&header) {
            warn!(
                existing = %existing.filename_lossy(),
                duplicate = filename,
                "duplicate object, not indexed"
            );
            return Ok(());
        }

        let name = preview.name_bytes().to_vec();
        let ratings = preview.ratings().unwrap_or_default();
        let dependencies = preview.dependencies();
        let entry = ObjectIndexEntry {
            header,
            filename: filename.as_bytes(),
            decoded_size: preview.decoded_size() as u32,
            name: &name,
            num_images: preview.num_images(),
            intelligence: ratings.0,
            aggressiveness: ratings.1,
            competitiveness: ratings.2,
            required: &dependencies.required,
            will_load: &dependencies.will_load,
        };
        self.insert_sorted(&entry)
    }

    fn push_entry(&mut self, entry: &ObjectIndexEntry<'_>) -> Result<()> {
        let bytes = entry.to_bytes();
        self.reserve(bytes.len())?;
        self.offsets.push(self.buffer.len());
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    /// Make room for `additional` more bytes without an infallible
    /// reallocation.
    fn reserve(&mut self, additional: usize) -> Result<()> {
        self.buffer.try_reserve(additional).map_err(|_| Error::OutOfMemory {
            what: "object index",
            requested: self.buffer.len().saturating_add(additional),
        })
    }

    /// Insert before the first entry whose name sorts after `entry`'s.
    fn insert_sorted(&mut self, entry: &ObjectIndexEntry<'_>) -> Result<()> {
        let position = self
            .entries()
            .position(|existing| entry.name < existing.name)
            .unwrap_or(self.offsets.len());
        let offset = self.offsets.get(position).copied().unwrap_or(self.buffer.len());

        let mut writer = BinaryWriter::new();
        entry.write(&mut writer);
        let bytes = writer.into_inner();
        self.reserve(bytes.len())?;

        self.buffer.splice(offset..offset, bytes.iter().copied());
        for later in &mut self.offsets[position..] {
            *later += bytes.len();
        }
        self.offsets.insert(position, offset);
        Ok(())
    }

    pub fn state(&self) -> FolderState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Raw descriptor buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether any indexed object is classified custom.
    pub fn has_custom_objects(&self) -> bool {
        self.has_custom
    }

    pub fn get(&self, id: ObjectIndexId) -> Option<ObjectIndexEntry<'_>> {
        let offset = *self.offsets.get(id)?;
        ObjectIndexEntry::read(&mut BinaryReader::new_at(&self.buffer, offset)).ok()
    }

    /// Descriptors in index order.
    pub fn entries(&self) -> impl Iterator<Item = ObjectIndexEntry<'_>> + '_ {
        (0..self.offsets.len()).filter_map(|id| self.get(id))
    }

    /// Descriptors of one type with their index positions.
    pub fn available_objects(&self, object_type: ObjectType) -> Vec<(ObjectIndexId, ObjectIndexEntry<'_>)> {
        self.entries()
            .enumerate()
            .filter(|(_, entry)| entry.header.type_tag() == object_type as u8)
            .collect()
    }

    /// First descriptor matching `header`.
    pub fn find(&self, header: &ObjectHeader) -> Option<ObjectIndexEntry<'_>> {
        self.find_with_id(header).map(|(_, entry)| entry)
    }

    pub fn find_with_id(&self, header: &ObjectHeader) -> Option<(ObjectIndexId, ObjectIndexEntry<'_>)> {
        self.entries().enumerate().find(|(_, entry)| entry.header == *header)
    }

    pub fn is_object_installed(&self, header: &ObjectHeader) -> bool {
        self.find(header).is_some()
    }

    /// First available object of `object_type` whose flag in
    /// `selection_flags` (indexed by [`ObjectIndexId`]) is selected.
    pub fn get_active_object(
        &self,
        object_type: ObjectType,
        selection_flags: &[u8],
    ) -> Option<(ObjectIndexId, ObjectIndexEntry<'_>)> {
        self.available_objects(object_type).into_iter().find(|(id, _)| {
            selection_flags
                .get(*id)
                .is_some_and(|flags| flags & SELECTED_FLAG != 0)
        })
    }
}

/// File backing `entry` inside `objects_dir`.
pub fn object_path(objects_dir: &Path, entry: &ObjectIndexEntry<'_>) -> PathBuf {
    objects_dir.join(&*entry.filename_lossy())
}
