//! The 16-byte object identity key.

use std::borrow::Cow;
use std::fmt;

use locobj_common::checksum::Checksum;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{vanilla, ObjectType};

const TYPE_MASK: u32 = 0x3F;
const SOURCE_GAME_SHIFT: u32 = 6;
const SOURCE_GAME_MASK: u32 = 0x3 << SOURCE_GAME_SHIFT;

/// Where an object claims to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SourceGame {
    Custom = 0,
    Data = 1,
    Vanilla = 2,
    OpenLoco = 3,
}

impl SourceGame {
    const fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => Self::Custom,
            1 => Self::Data,
            2 => Self::Vanilla,
            _ => Self::OpenLoco,
        }
    }
}

/// Identity and checksum of one object, byte-exact on disk.
///
/// `flags` packs the type tag (bits 0-5) and the source game (bits 6-7); the
/// remaining bits are revision flags. `name` is space padded, not terminated.
///
/// Equality is deliberately asymmetric: two custom headers must match byte
/// for byte, any other pair matches on type and name alone. Many built-in
/// objects reference each other with stale classification bits and would
/// otherwise never resolve.
#[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct ObjectHeader {
    pub flags: u32,
    pub name: [u8; 8],
    pub checksum: u32,
}

impl ObjectHeader {
    /// Size of a header in bytes.
    pub const SIZE: usize = 16;

    /// The empty header: every byte `0xFF`.
    pub const EMPTY: Self = Self {
        flags: u32::MAX,
        name: [0xFF; 8],
        checksum: u32::MAX,
    };

    /// Build a header. `name` is truncated or space padded to eight bytes.
    pub fn new(object_type: ObjectType, source_game: SourceGame, name: &str, checksum: u32) -> Self {
        let mut padded = [b' '; 8];
        for (dst, src) in padded.iter_mut().zip(name.bytes()) {
            *dst = src;
        }
        Self {
            flags: u32::from(object_type as u8) | (u32::from(source_game as u8) << SOURCE_GAME_SHIFT),
            name: padded,
            checksum,
        }
    }

    /// Raw six-bit type tag.
    #[inline]
    pub fn type_tag(&self) -> u8 {
        (self.flags & TYPE_MASK) as u8
    }

    /// Content type, if the tag is in range.
    #[inline]
    pub fn object_type(&self) -> Option<ObjectType> {
        ObjectType::from_u8(self.type_tag())
    }

    #[inline]
    pub fn source_game(&self) -> SourceGame {
        SourceGame::from_bits(self.flags >> SOURCE_GAME_SHIFT)
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.source_game() == SourceGame::Custom
    }

    /// True iff every byte is `0xFF`.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0xFF)
    }

    /// The name with trailing padding removed.
    pub fn name(&self) -> Cow<'_, str> {
        let end = self
            .name
            .iter()
            .rposition(|&b| b != b' ' && b != 0)
            .map_or(0, |p| p + 1);
        String::from_utf8_lossy(&self.name[..end])
    }

    /// Loose match used when exact resolution fails: type, name and revision
    /// flags must agree; source game and checksum are ignored.
    pub fn fuzzy_eq(&self, other: &Self) -> bool {
        (self.flags & !SOURCE_GAME_MASK) == (other.flags & !SOURCE_GAME_MASK)
            && self.name == other.name
    }

    /// Whether this names an object shipped with the original game.
    pub fn is_vanilla(&self) -> bool {
        vanilla::is_vanilla(&self.name, self.type_tag())
    }

    /// Checksum over the low flag byte, the name, then `payload`.
    pub fn compute_checksum(&self, payload: &[u8]) -> u32 {
        let flags = self.flags;
        let mut checksum = Checksum::default();
        checksum.update(&flags.to_le_bytes()[..1]);
        checksum.update(&self.name);
        checksum.update(payload);
        checksum.value()
    }

    /// Whether the stored checksum matches `payload`.
    pub fn is_checksum_valid(&self, payload: &[u8]) -> bool {
        self.compute_checksum(payload) == self.checksum
    }

    /// Copy of this header with its checksum recomputed for `payload`.
    pub fn with_checksum(mut self, payload: &[u8]) -> Self {
        self.checksum = self.compute_checksum(payload);
        self
    }
}

impl Default for ObjectHeader {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for ObjectHeader {
    fn eq(&self, other: &Self) -> bool {
        if self.is_custom() && other.is_custom() {
            self.as_bytes() == other.as_bytes()
        } else {
            self.type_tag() == other.type_tag() && self.name == other.name
        }
    }
}

impl fmt::Debug for ObjectHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.flags;
        let checksum = self.checksum;
        f.debug_struct("ObjectHeader")
            .field("flags", &format_args!("{flags:#010x}"))
            .field("name", &String::from_utf8_lossy(&self.name))
            .field("checksum", &format_args!("{checksum:#010x}"))
            .finish()
    }
}

impl fmt::Display for ObjectHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("<empty>");
        }
        match self.object_type() {
            Some(ty) => write!(f, "{}/{}", ty, self.name()),
            None => write!(f, "#{}/{}", self.type_tag(), self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(source: SourceGame, name: &str, checksum: u32) -> ObjectHeader {
        ObjectHeader::new(ObjectType::Vehicle, source, name, checksum)
    }

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<ObjectHeader>(), ObjectHeader::SIZE);
        let h = header(SourceGame::Vanilla, "LOCO1", 0x11223344);
        assert_eq!(
            h.as_bytes(),
            [23 | (2 << 6), 0, 0, 0, b'L', b'O', b'C', b'O', b'1', b' ', b' ', b' ', 0x44, 0x33, 0x22, 0x11]
        );
    }

    #[test]
    fn test_bitfields() {
        let h = header(SourceGame::Data, "X", 0);
        assert_eq!(h.object_type(), Some(ObjectType::Vehicle));
        assert_eq!(h.source_game(), SourceGame::Data);
        assert!(!h.is_custom());
        assert_eq!(h.name(), "X");
    }

    #[test]
    fn test_empty() {
        assert!(ObjectHeader::EMPTY.is_empty());
        assert!(ObjectHeader::default().is_empty());
        assert!(!header(SourceGame::Custom, "A", 0).is_empty());
    }

    #[test]
    fn test_non_custom_equality_ignores_checksum_and_flags() {
        let a = header(SourceGame::Vanilla, "LOCO1", 1);
        let mut b = header(SourceGame::Data, "LOCO1", 2);
        b.flags |= 0x100;
        assert_eq!(a, b);

        // one side custom still compares by type and name
        let c = header(SourceGame::Custom, "LOCO1", 3);
        assert_eq!(a, c);
        assert_eq!(c, a);

        let other_name = header(SourceGame::Vanilla, "LOCO2", 1);
        assert_ne!(a, other_name);
        let other_type = ObjectHeader::new(ObjectType::Track, SourceGame::Vanilla, "LOCO1", 1);
        assert_ne!(a, other_type);
    }

    #[test]
    fn test_custom_equality_is_byte_exact() {
        let a = header(SourceGame::Custom, "MYLOCO", 1);
        let b = header(SourceGame::Custom, "MYLOCO", 2);
        assert_ne!(a, b);
        assert_eq!(a, header(SourceGame::Custom, "MYLOCO", 1));
    }

    #[test]
    fn test_fuzzy_ignores_checksum_and_source() {
        let a = header(SourceGame::Custom, "MYLOCO", 1);
        let b = header(SourceGame::Custom, "MYLOCO", 2);
        let c = header(SourceGame::Vanilla, "MYLOCO", 3);
        assert!(a.fuzzy_eq(&b));
        assert!(a.fuzzy_eq(&c));

        let mut revised = b;
        revised.flags |= 0x100;
        assert!(!a.fuzzy_eq(&revised));
    }

    #[test]
    fn test_checksum_covers_low_flag_byte_name_and_payload() {
        let payload = [1u8, 2, 3, 4];
        let h = header(SourceGame::Custom, "CHK", 0).with_checksum(&payload);
        assert!(h.is_checksum_valid(&payload));
        assert_eq!(h.compute_checksum(&payload), h.compute_checksum(&payload));

        let mut mutated = payload;
        mutated[2] ^= 0x40;
        assert!(!h.is_checksum_valid(&mutated));

        // upper flag bytes are not part of the checksum
        let mut high = h;
        high.flags |= 0x0100_0000;
        assert!(high.is_checksum_valid(&payload));

        let mut renamed = h;
        renamed.name[0] = b'D';
        assert!(!renamed.is_checksum_valid(&payload));
    }

    #[test]
    fn test_vanilla_lookup() {
        let skin = ObjectHeader::new(ObjectType::InterfaceSkin, SourceGame::Custom, "INTERDEF", 0);
        assert!(skin.is_vanilla());
        assert!(!header(SourceGame::Vanilla, "NOTREAL", 0).is_vanilla());
    }

    #[test]
    fn test_display() {
        assert_eq!(header(SourceGame::Custom, "LOCO1", 0).to_string(), "vehicle/LOCO1");
        assert_eq!(ObjectHeader::EMPTY.to_string(), "<empty>");
    }
}
