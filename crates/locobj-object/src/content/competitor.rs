//! AI competitor personalities.

use locobj_common::BinaryReader;

use super::{load_string_tables, u32_at, u8_at};
use crate::registry::{check_fixed_len, ContentDetails, ContentState, ContentType, LoadContext};
use crate::{Error, ObjectType, Result};

pub(crate) const EMOTIONS: usize = 0x0C;
pub(crate) const INTELLIGENCE: usize = 0x34;
pub(crate) const AGGRESSIVENESS: usize = 0x35;
pub(crate) const COMPETITIVENESS: usize = 0x36;

const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=9;

/// The rating triple a competitor reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompetitorDetails {
    pub intelligence: u8,
    pub aggressiveness: u8,
    pub competitiveness: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompetitorContent;

impl ContentType for CompetitorContent {
    fn object_type(&self) -> ObjectType {
        ObjectType::Competitor
    }

    fn validate(&self, payload: &[u8]) -> Result<()> {
        check_fixed_len(ObjectType::Competitor, payload)?;

        let invalid = |reason: &'static str| Error::Invalid {
            object_type: ObjectType::Competitor,
            reason,
        };
        // Neutral face.
        if u32_at(payload, EMOTIONS) & 1 == 0 {
            return Err(invalid("neutral emotion missing"));
        }
        for offset in [INTELLIGENCE, AGGRESSIVENESS, COMPETITIVENESS] {
            if !RATING_RANGE.contains(&u8_at(payload, offset)) {
                return Err(invalid("rating out of range"));
            }
        }
        Ok(())
    }

    fn load(&self, payload: &[u8], ctx: &mut LoadContext<'_>) -> Result<ContentState> {
        check_fixed_len(ObjectType::Competitor, payload)?;
        let mut reader = BinaryReader::new_at(payload, ObjectType::Competitor.fixed_len());
        load_string_tables(ObjectType::Competitor, &mut reader, ctx)?;
        let images = ctx.load_image_table(&mut reader)?;

        Ok(ContentState {
            images: Some(images),
            details: ContentDetails::Competitor(CompetitorDetails {
                intelligence: u8_at(payload, INTELLIGENCE),
                aggressiveness: u8_at(payload, AGGRESSIVENESS),
                competitiveness: u8_at(payload, COMPETITIVENESS),
            }),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::competitor_payload;
    use crate::image_table::ImageRegistry;
    use crate::registry::{DependentObjects, NoObjects};
    use crate::string_table::StringRegistry;
    use crate::LanguageId;

    #[test]
    fn test_validate_ratings() {
        let payload = competitor_payload("Mr. Tycoon", (3, 7, 9));
        CompetitorContent.validate(&payload).unwrap();

        let mut bad = payload.clone();
        bad[AGGRESSIVENESS] = 10;
        assert!(CompetitorContent.validate(&bad).is_err());

        let mut bad = payload.clone();
        bad[INTELLIGENCE] = 0;
        assert!(CompetitorContent.validate(&bad).is_err());

        let mut bad = payload;
        bad[EMOTIONS] = 0;
        assert!(CompetitorContent.validate(&bad).is_err());
    }

    #[test]
    fn test_load_reports_ratings() {
        let payload = competitor_payload("Mr. Tycoon", (3, 7, 9));
        let mut images = ImageRegistry::new();
        let mut strings = StringRegistry::new();
        let mut deps = DependentObjects::default();
        let mut ctx = LoadContext::for_preview(
            ObjectType::Competitor,
            LanguageId::EnglishUk,
            &NoObjects,
            &mut images,
            &mut strings,
            &mut deps,
        );
        let state = CompetitorContent.load(&payload, &mut ctx).unwrap();
        assert_eq!(state.ratings(), Some((3, 7, 9)));
        assert_eq!(ctx.finish().len(), 2);
    }
}
