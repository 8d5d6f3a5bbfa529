//! Object identity and content types for Locomotion `.DAT` objects.
//!
//! Every object file starts with a 16-byte [`ObjectHeader`] naming its
//! content type and carrying a checksum of the payload. The payload opens
//! with a fixed-layout body, followed by localised string tables, any
//! type-specific sections, and usually an image table.
//!
//! # Example
//!
//! ```no_run
//! use locobj_object::ObjectFile;
//!
//! let file = ObjectFile::open("objdata/BOEING.DAT")?;
//! println!("{} checksum ok: {}", file.header, file.is_checksum_valid());
//! # Ok::<(), locobj_object::Error>(())
//! ```
//!
//! # Layers
//!
//! - [`ObjectHeader`], [`ObjectType`] - identity, per-type capacities
//! - [`string_table`], [`image_table`] - the common sub-table framers and
//!   the registries their contents are bound into
//! - [`registry`] - the [`ContentType`] capability set and one entry per type
//! - [`view`] - typed read access to loaded objects

pub mod content;
mod error;
mod header;
pub mod image_table;
mod language;
mod object_file;
mod object_type;
pub mod registry;
pub mod string_table;
pub mod vanilla;
pub mod view;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use error::{Error, Result};
pub use header::{ObjectHeader, SourceGame};
pub use image_table::{ImageRegistry, ImageTable, IMAGE_BASE_DISC, IMAGE_BASE_OBJECTS, MAX_OBJECT_IMAGES};
pub use language::LanguageId;
pub use object_file::ObjectFile;
pub use object_type::{ObjectType, MAX_OBJECTS_TOTAL, OBJECT_TYPE_COUNT};
pub use registry::{
    content_type, ContentDetails, ContentState, ContentType, DependentObjects, LoadContext, LoadedObjectHandle,
    LoadedObjectId, NoObjects, ObjectLookup,
};
pub use string_table::{StringId, StringRegistry};
pub use view::{CompetitorObject, FramedObject, TrackObject, TypedObject, VehicleObject};
