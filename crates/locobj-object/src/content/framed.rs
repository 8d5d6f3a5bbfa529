use locobj_common::BinaryReader;

use crate::image_table::{find_image_table, ImageTable};
use crate::registry::{check_fixed_len, ContentState, ContentType, LoadContext};
use crate::{Error, ObjectType, Result};

/// Registry entry for types described entirely by their per-type table
/// values: fixed body, string tables, optional trailing image table.
#[derive(Debug, Clone, Copy)]
pub struct FramedContent {
    object_type: ObjectType,
}

impl FramedContent {
    pub const fn new(object_type: ObjectType) -> Self {
        Self { object_type }
    }
}

impl ContentType for FramedContent {
    fn object_type(&self) -> ObjectType {
        self.object_type
    }

    fn validate(&self, payload: &[u8]) -> Result<()> {
        check_fixed_len(self.object_type, payload)
    }

    fn load(&self, payload: &[u8], ctx: &mut LoadContext<'_>) -> Result<ContentState> {
        check_fixed_len(self.object_type, payload)?;
        let mut reader = BinaryReader::new_at(payload, self.object_type.fixed_len());
        load_string_tables(self.object_type, &mut reader, ctx)?;

        let images = if self.object_type.has_image_table() {
            Some(load_image_table_at_end(self.object_type, payload, &mut reader, ctx)?)
        } else {
            None
        };

        Ok(ContentState {
            images,
            ..Default::default()
        })
    }
}

/// Load every string table the type declares, in order.
pub(crate) fn load_string_tables(
    object_type: ObjectType,
    reader: &mut BinaryReader<'_>,
    ctx: &mut LoadContext<'_>,
) -> Result<()> {
    for index in 0..object_type.string_table_count() {
        ctx.load_string_table(reader, index)?;
    }
    Ok(())
}

/// Skip type-specific sections this crate does not interpret and load the
/// image table closing the payload.
pub(crate) fn load_image_table_at_end(
    object_type: ObjectType,
    payload: &[u8],
    reader: &mut BinaryReader<'_>,
    ctx: &mut LoadContext<'_>,
) -> Result<ImageTable> {
    let start = find_image_table(payload, reader.position()).ok_or(Error::ImageTableNotFound(object_type))?;
    reader.seek(start);
    ctx.load_image_table(reader)
}
