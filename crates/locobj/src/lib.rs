//! Locobj - object file handling for Locomotion content.
//!
//! This crate re-exports the locobj library crates behind one dependency.
//!
//! # Crates
//!
//! - [`locobj_common`] - Binary reading and writing, checksum accumulator
//! - [`locobj_sawyer`] - Chunk codec used by `.DAT` payloads
//! - [`locobj_object`] - Object headers, content types, string and image tables
//! - [`locobj_manager`] - Installed object index, repository and installer
//!
//! # Example
//!
//! ```no_run
//! use locobj::prelude::*;
//!
//! let mut manager = ObjectManager::new(ObjectManagerConfig::new("objdata"));
//! manager.load_index()?;
//!
//! let available = manager.get_available_objects(ObjectType::Vehicle);
//! if let Some((_, entry)) = available.first() {
//!     let header = entry.header;
//!     manager.load(&header)?;
//!     if let Some(vehicle) = manager.get::<VehicleObject>(0) {
//!         println!("{:?} {}", vehicle.object.name(), vehicle.power());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use locobj_common as common;
pub use locobj_manager as manager;
pub use locobj_object as object;
pub use locobj_sawyer as sawyer;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use locobj_common::{BinaryReader, BinaryWriter};
    pub use locobj_manager::{
        HostHooks, LoadObjectsResult, ObjectIndexEntry, ObjectManager, ObjectManagerConfig, TemporaryObject,
    };
    pub use locobj_object::{
        CompetitorObject, FramedObject, LanguageId, LoadedObjectHandle, ObjectFile, ObjectHeader, ObjectLookup,
        ObjectType, TrackObject, TypedObject, VehicleObject,
    };
    pub use locobj_sawyer::Encoding;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
