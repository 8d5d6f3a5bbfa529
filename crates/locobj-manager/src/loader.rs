//! Resolving an indexed header to its verified file contents.

use std::path::Path;

use locobj_object::{content_type, ObjectFile, ObjectHeader};
use tracing::error;

use crate::index::{object_path, ObjectIndex};
use crate::{Error, Result};

/// Checksum and type-specific validation of a decoded file.
pub fn verify_object(file: &ObjectFile) -> Result<()> {
    if !file.is_checksum_valid() {
        return Err(Error::ChecksumMismatch(file.header));
    }
    let object_type = file
        .header
        .object_type()
        .ok_or(Error::UnknownObjectType(file.header.type_tag()))?;
    content_type(object_type)
        .validate(&file.payload)
        .map_err(|source| Error::ValidationFailed {
            header: file.header,
            source,
        })
}

/// Find `header` in the index, read its file and verify it.
///
/// The file must still contain the object the index recorded for it.
pub fn find_and_preload_object(
    index: &ObjectIndex,
    objects_dir: &Path,
    header: &ObjectHeader,
) -> Result<ObjectFile> {
    let entry = index.find(header).ok_or(Error::NotInstalled(*header))?;
    let path = object_path(objects_dir, &entry);
    let file = ObjectFile::open(&path)?;

    if file.header != *header {
        error!(
            expected = %header,
            actual = %file.header,
            path = %path.display(),
            "mismatch between installed object header and object file header"
        );
        return Err(Error::HeaderMismatch {
            expected: *header,
            actual: file.header,
            path,
        });
    }

    if let Err(err) = verify_object(&file) {
        if !entry.is_partial() {
            error!(object = %header, error = %err, "indexed object failed verification");
        }
        return Err(err);
    }
    Ok(file)
}
