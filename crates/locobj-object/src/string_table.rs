//! Localised string tables.
//!
//! A table is a run of `(language: u8, text: cstring)` pairs closed by a
//! `0xFF` language byte. Loading picks one text and binds it to a string id.

use std::borrow::Cow;

use locobj_common::BinaryReader;
use rustc_hash::FxHashMap;

use crate::{Error, LanguageId, LoadedObjectHandle, ObjectType, Result};

/// Identifier of a bound display string.
pub type StringId = u16;

/// String ids handed to temporary (preview) objects: `base + table index`.
pub const TEMPORARY_STRING_BASE: StringId = 0x2000;

/// First string id used by repository slots.
pub const OBJECT_STRING_BASE: StringId = 0x2100;

/// One parsed string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringTable<'a> {
    /// Selected text, without terminator. Empty if the table has no entries.
    pub text: &'a [u8],
    /// Language tag of the selected entry.
    pub language: Option<u8>,
    /// Bytes occupied by the whole table, terminator included.
    pub table_len: usize,
}

/// Parse the table at the reader's position and select a text.
///
/// Preference order: `preferred`, UK English, US English, then the first
/// entry in the table.
pub fn read_string_table<'a>(
    reader: &mut BinaryReader<'a>,
    preferred: LanguageId,
) -> Result<StringTable<'a>> {
    let start = reader.position();
    let mut selected: Option<(u8, u8, &'a [u8])> = None;

    loop {
        let language = reader.read_u8()?;
        if language == LanguageId::END {
            break;
        }
        let text = reader.read_cstr()?;
        let rank = match language {
            l if l == preferred as u8 => 0,
            l if l == LanguageId::EnglishUk as u8 => 1,
            l if l == LanguageId::EnglishUs as u8 => 2,
            _ => 3,
        };
        if selected.map_or(true, |(best, _, _)| rank < best) {
            selected = Some((rank, language, text));
        }
    }

    Ok(StringTable {
        text: selected.map_or(&[][..], |(_, _, text)| text),
        language: selected.map(|(_, language, _)| language),
        table_len: reader.position() - start,
    })
}

/// String id bound to table `index` of the object in `handle`'s slot.
pub fn object_string_id(handle: LoadedObjectHandle, index: u8) -> Result<StringId> {
    let ty = handle.object_type;
    let per_object = ty.string_table_count();
    if index >= per_object {
        return Err(Error::StringTableIndex {
            object_type: ty,
            index,
        });
    }
    let preceding: usize = ObjectType::ALL[..ty.index()]
        .iter()
        .map(|t| usize::from(t.max_objects()) * usize::from(t.string_table_count()))
        .sum();
    let offset = preceding + usize::from(handle.id) * usize::from(per_object) + usize::from(index);
    Ok(OBJECT_STRING_BASE + offset as StringId)
}

/// String id bound to table `index` of the temporary object.
pub fn temporary_string_id(index: u8) -> StringId {
    TEMPORARY_STRING_BASE + StringId::from(index)
}

/// Texts bound to string ids.
#[derive(Debug, Clone, Default)]
pub struct StringRegistry {
    strings: FxHashMap<StringId, Vec<u8>>,
}

impl StringRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `text` to `id`, replacing any previous binding.
    pub fn bind(&mut self, id: StringId, text: &[u8]) {
        self.strings.insert(id, text.to_vec());
    }

    pub fn get(&self, id: StringId) -> Option<&[u8]> {
        self.strings.get(&id).map(Vec::as_slice)
    }

    /// Bound text decoded for display.
    pub fn get_lossy(&self, id: StringId) -> Option<Cow<'_, str>> {
        self.get(id).map(String::from_utf8_lossy)
    }

    pub fn remove(&mut self, id: StringId) {
        self.strings.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn clear(&mut self) {
        self.strings.clear();
    }
}
