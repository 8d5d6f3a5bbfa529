//! Copying a verified in-memory object into the objects directory.

use std::path::{Path, PathBuf};

use locobj_common::BinaryWriter;
use locobj_object::{ObjectFile, ObjectHeader};
use tracing::{debug, info};

use crate::hooks::HostHooks;
use crate::index::ObjectIndex;
use crate::loader::verify_object;
use crate::repository::{LoadMode, ObjectRepository};
use crate::{Error, Result};

/// Name used once permutation runs out of characters.
pub const FALLBACK_FILE_NAME: &str = "00000000";

/// Derive a file stem from an object name: cut at the first space,
/// uppercase, and replace anything unsafe in a path with `_`.
pub fn sanitise_object_filename(name: &str) -> String {
    let stem = name.split(' ').next().unwrap_or_default();
    let stem: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            c if c.is_ascii_graphic() => c.to_ascii_uppercase(),
            _ => '_',
        })
        .collect();
    if stem.is_empty() {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        stem
    }
}

/// Step `name` to its next candidate.
///
/// The last character advances through `0-9` then `A-Z`. Wrapping past `Z`
/// carries into the character before it. The first character never changes;
/// a carry into it yields [`FALLBACK_FILE_NAME`].
pub fn permutate_object_filename(name: &mut String) {
    let mut bytes = std::mem::take(name).into_bytes();
    let mut pos = bytes.len();
    loop {
        pos = match pos.checked_sub(1) {
            Some(p) if p > 0 => p,
            _ => {
                *name = FALLBACK_FILE_NAME.to_owned();
                return;
            }
        };
        // Digits run into capitals; anything else restarts at '0' and carries.
        let c = &mut bytes[pos];
        *c = match *c {
            b'9' => b'A',
            b'0'..=b'8' | b'A'..=b'Y' => *c + 1,
            _ => b'0',
        };
        if *c != b'0' {
            break;
        }
    }
    *name = bytes.iter().map(|&b| char::from(b)).collect();
}

/// First `<stem>.DAT` in `objects_dir` that does not exist yet, permutating
/// `stem` on each collision.
pub fn find_object_path(objects_dir: &Path, stem: &mut String) -> PathBuf {
    loop {
        let path = objects_dir.join(format!("{stem}.DAT"));
        if !path.exists() {
            return path;
        }
        debug!(path = %path.display(), "object file name taken");
        permutate_object_filename(stem);
    }
}

/// Install `file` into `objects_dir`, returning the path written.
///
/// The repository is emptied before and after. Fails without writing when
/// the object does not verify, no slot or image space is free, or an object
/// with the same identity is already in `index`.
pub fn try_install_object(
    repository: &mut ObjectRepository,
    index: &ObjectIndex,
    objects_dir: &Path,
    file: ObjectFile,
    hooks: &mut dyn HostHooks,
) -> Result<PathBuf> {
    repository.unload_all();
    let result = install(repository, index, objects_dir, file, hooks);
    repository.unload_all();
    result
}

fn install(
    repository: &mut ObjectRepository,
    index: &ObjectIndex,
    objects_dir: &Path,
    file: ObjectFile,
    hooks: &mut dyn HostHooks,
) -> Result<PathBuf> {
    verify_object(&file)?;
    let header = file.header;
    let object_type = file.object_type()?;

    if !repository.images().has_capacity() {
        return Err(Error::ImageSpaceExhausted);
    }
    let id = repository
        .find_free_object_id(object_type)
        .ok_or(Error::NoFreeSlot(object_type))?;
    repository.load_object(file, id, LoadMode::Partial)?;

    if index.is_object_installed(&header) {
        return Err(Error::AlreadyInstalled(header));
    }
    write_object_file(repository, objects_dir, &header, hooks)
}

fn write_object_file(
    repository: &ObjectRepository,
    objects_dir: &Path,
    header: &ObjectHeader,
    hooks: &mut dyn HostHooks,
) -> Result<PathBuf> {
    let name = header.name();
    hooks.progress_begin(&format!("Installing new data: {name}"));
    hooks.progress_set(50);
    hooks.pump_events();

    let mut stem = sanitise_object_filename(&name);
    let path = find_object_path(objects_dir, &mut stem);

    hooks.progress_set(180);
    let mut writer = BinaryWriter::new();
    let written = repository
        .write_packed_objects(&mut writer, std::slice::from_ref(header))
        .and_then(|()| std::fs::write(&path, writer.as_bytes()).map_err(Error::from));
    hooks.progress_set(240);
    hooks.progress_set(255);
    hooks.progress_end();
    written?;

    info!(object = %header, path = %path.display(), "object installed");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{current_folder_state, object_files};
    use crate::hooks::NullHost;
    use locobj_object::fixtures::{framed_payload, object_file, vehicle_payload};
    use locobj_object::{LanguageId, NoObjects, ObjectType};

    fn index_of(dir: &Path) -> ObjectIndex {
        let files = object_files(dir).unwrap();
        let state = current_folder_state(dir).unwrap();
        ObjectIndex::build(&files, state, LanguageId::EnglishUk, &NoObjects, &mut NullHost).unwrap()
    }

    #[test]
    fn test_sanitise() {
        assert_eq!(sanitise_object_filename("test a"), "TEST");
        assert_eq!(sanitise_object_filename("A/B:C"), "A_B_C");
        assert_eq!(sanitise_object_filename("CURRPNDS"), "CURRPNDS");
        assert_eq!(sanitise_object_filename(""), FALLBACK_FILE_NAME);
    }

    #[test]
    fn test_permutate() {
        let step = |s: &str| {
            let mut s = s.to_owned();
            permutate_object_filename(&mut s);
            s
        };
        assert_eq!(step("TEST"), "TESU");
        assert_eq!(step("TES0"), "TES1");
        assert_eq!(step("TES9"), "TESA");
        assert_eq!(step("TESZ"), "TET0");
        assert_eq!(step("TE_"), "TF0");
        assert_eq!(step("AB~"), "AC0");
        assert_eq!(step("X9Z"), "XA0");

        let mut name = "AB_".to_owned();
        for _ in 0..200 {
            permutate_object_filename(&mut name);
            assert_eq!(name.len(), 3);
            assert!(name.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
        }
        assert_eq!(step("AZ"), FALLBACK_FILE_NAME);
        assert_eq!(step("A"), FALLBACK_FILE_NAME);
    }

    #[test]
    fn test_install_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_of(dir.path());
        let mut repo = ObjectRepository::default();

        let file = object_file(ObjectType::Vehicle, "BOEING", vehicle_payload("Boeing 707", 1));
        let expected = file.to_bytes().unwrap();
        let path = try_install_object(&mut repo, &index, dir.path(), file, &mut NullHost).unwrap();

        assert_eq!(path, dir.path().join("BOEING.DAT"));
        assert_eq!(std::fs::read(&path).unwrap(), expected);
        assert_eq!(repo.loaded_objects().count(), 0);
    }

    #[test]
    fn test_filename_collision() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = ObjectRepository::default();

        let first = object_file(ObjectType::Currency, "TEST A", framed_payload(ObjectType::Currency, &["A"], 1));
        let second = object_file(ObjectType::Currency, "TEST B", framed_payload(ObjectType::Currency, &["B"], 1));

        let index = index_of(dir.path());
        let a = try_install_object(&mut repo, &index, dir.path(), first, &mut NullHost).unwrap();
        let index = index_of(dir.path());
        let b = try_install_object(&mut repo, &index, dir.path(), second, &mut NullHost).unwrap();

        assert_eq!(a.file_name().unwrap(), "TEST.DAT");
        assert_eq!(b.file_name().unwrap(), "TESU.DAT");
        assert_eq!(index_of(dir.path()).len(), 2);
    }

    #[test]
    fn test_reinstall_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = ObjectRepository::default();
        let file = object_file(ObjectType::Vehicle, "BOEING", vehicle_payload("Boeing 707", 1));

        let index = index_of(dir.path());
        try_install_object(&mut repo, &index, dir.path(), file.clone(), &mut NullHost).unwrap();
        let index = index_of(dir.path());
        let err = try_install_object(&mut repo, &index, dir.path(), file, &mut NullHost).unwrap_err();

        assert!(matches!(err, Error::AlreadyInstalled(_)));
        assert_eq!(object_files(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_bad_checksum_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let index = index_of(dir.path());
        let mut repo = ObjectRepository::default();
        let mut file = object_file(ObjectType::Vehicle, "BOEING", vehicle_payload("Boeing 707", 1));
        file.payload[0] ^= 1;

        let err = try_install_object(&mut repo, &index, dir.path(), file, &mut NullHost).unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch(_)));
        assert!(object_files(dir.path()).unwrap().is_empty());
    }
}
