//! Language identifiers used by localised string tables.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A string table language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum LanguageId {
    #[default]
    EnglishUk = 0,
    EnglishUs = 1,
    French = 2,
    German = 3,
    Spanish = 4,
    Italian = 5,
    Dutch = 6,
    Swedish = 7,
    Japanese = 8,
    Korean = 9,
    ChineseSimplified = 10,
    ChineseTraditional = 11,
    Portuguese = 13,
}

impl LanguageId {
    /// Marker byte that ends a string table.
    pub const END: u8 = 0xFF;

    const ALL: [(LanguageId, &'static str); 13] = [
        (Self::EnglishUk, "english_uk"),
        (Self::EnglishUs, "english_us"),
        (Self::French, "french"),
        (Self::German, "german"),
        (Self::Spanish, "spanish"),
        (Self::Italian, "italian"),
        (Self::Dutch, "dutch"),
        (Self::Swedish, "swedish"),
        (Self::Japanese, "japanese"),
        (Self::Korean, "korean"),
        (Self::ChineseSimplified, "chinese_simplified"),
        (Self::ChineseTraditional, "chinese_traditional"),
        (Self::Portuguese, "portuguese"),
    ];

    /// Map a raw tag to a language.
    pub fn from_u8(tag: u8) -> Option<Self> {
        Self::ALL
            .iter()
            .map(|&(lang, _)| lang)
            .find(|&lang| lang as u8 == tag)
    }

    pub fn name(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|&&(lang, _)| lang == self)
            .map_or("unknown", |&(_, name)| name)
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LanguageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .find(|&&(_, name)| name == wanted)
            .map(|&(lang, _)| lang)
            .ok_or_else(|| Error::UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(LanguageId::from_u8(0), Some(LanguageId::EnglishUk));
        assert_eq!(LanguageId::from_u8(13), Some(LanguageId::Portuguese));
        assert_eq!(LanguageId::from_u8(12), None);
        assert_eq!(LanguageId::from_u8(LanguageId::END), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("German".parse::<LanguageId>().unwrap(), LanguageId::German);
        assert_eq!(
            "chinese-simplified".parse::<LanguageId>().unwrap(),
            LanguageId::ChineseSimplified
        );
        assert!("klingon".parse::<LanguageId>().is_err());
    }
}
