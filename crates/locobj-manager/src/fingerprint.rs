//! Content directory fingerprint and the index file header.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use walkdir::WalkDir;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Result;

/// Always set in [`FolderState::num_objects`] so a fingerprint never
/// equals an all-zero header.
pub const FOLDER_STATE_MARKER: u32 = 1 << 24;

/// Cheap summary of the content directory. Equal states mean the cached
/// index is still usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FolderState {
    pub num_objects: u32,
    pub total_file_size: u32,
    pub date_hash: u32,
}

impl FolderState {
    /// Number of files counted, without the marker bit.
    pub fn file_count(&self) -> u32 {
        self.num_objects & 0x00FF_FFFF
    }

    fn add_file(&mut self, size: u64, modified_nanos: u64) {
        self.date_hash ^= ((modified_nanos >> 32) as u32) ^ (modified_nanos as u32);
        self.date_hash = self.date_hash.rotate_right(5);
        self.total_file_size = self.total_file_size.wrapping_add(size as u32);
        self.num_objects = self.num_objects.wrapping_add(1);
    }
}

/// Leading 20 bytes of the index file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct IndexHeader {
    pub state: FolderState,
    /// Length of the descriptor buffer that follows.
    pub file_size: u32,
    /// Number of descriptors.
    pub num_objects: u32,
}

impl IndexHeader {
    pub const SIZE: usize = 20;

    pub fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            state: FolderState {
                num_objects: reader.read_u32::<LittleEndian>()?,
                total_file_size: reader.read_u32::<LittleEndian>()?,
                date_hash: reader.read_u32::<LittleEndian>()?,
            },
            file_size: reader.read_u32::<LittleEndian>()?,
            num_objects: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u32::<LittleEndian>(self.state.num_objects)?;
        writer.write_u32::<LittleEndian>(self.state.total_file_size)?;
        writer.write_u32::<LittleEndian>(self.state.date_hash)?;
        writer.write_u32::<LittleEndian>(self.file_size)?;
        writer.write_u32::<LittleEndian>(self.num_objects)
    }
}

/// Whether `path` has a `.dat` extension, any case.
pub fn is_object_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dat"))
}

/// Regular `.DAT` files directly inside `dir`, sorted by file name.
pub fn object_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_object_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Fingerprint `files`, in order.
pub fn folder_state(files: &[PathBuf]) -> Result<FolderState> {
    let mut state = FolderState::default();
    for path in files {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_nanos() as u64);
        state.add_file(metadata.len(), modified);
    }
    state.num_objects |= FOLDER_STATE_MARKER;
    Ok(state)
}

/// Scan `dir` and fingerprint it.
pub fn current_folder_state(dir: &Path) -> Result<FolderState> {
    folder_state(&object_files(dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(std::mem::size_of::<IndexHeader>(), IndexHeader::SIZE);

        let header = IndexHeader {
            state: FolderState {
                num_objects: 2 | FOLDER_STATE_MARKER,
                total_file_size: 1234,
                date_hash: 0xDEADBEEF,
            },
            file_size: 99,
            num_objects: 2,
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        assert_eq!(bytes, header.as_bytes());
        assert_eq!(IndexHeader::read_from(&mut bytes.as_slice()).unwrap(), header);
    }

    #[test]
    fn test_scan_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.DAT"), b"1234").unwrap();
        std::fs::write(dir.path().join("b.dat"), b"12").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("SUB.DAT")).unwrap();

        let files = object_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, ["A.DAT", "b.dat"]);

        let state = folder_state(&files).unwrap();
        assert_eq!(state.file_count(), 2);
        assert_eq!(state.total_file_size, 6);
        assert_ne!(state.num_objects & FOLDER_STATE_MARKER, 0);
    }

    #[test]
    fn test_state_changes_with_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.DAT"), b"1234").unwrap();
        let before = current_folder_state(dir.path()).unwrap();
        assert_eq!(before, current_folder_state(dir.path()).unwrap());

        std::fs::write(dir.path().join("B.DAT"), b"5678").unwrap();
        assert_ne!(before, current_folder_state(dir.path()).unwrap());
    }

    #[test]
    fn test_empty_directory_has_marker() {
        let dir = tempfile::tempdir().unwrap();
        let state = current_folder_state(dir.path()).unwrap();
        assert_eq!(state.num_objects, FOLDER_STATE_MARKER);
    }
}
