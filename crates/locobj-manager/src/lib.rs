//! Installed object index, object repository and installer.
//!
//! [`ObjectManager`] ties the pieces together:
//!
//! - [`ObjectIndex`] describes every valid `.DAT` file in the objects
//!   directory and is cached on disk, keyed by a fingerprint of the folder.
//! - [`ObjectRepository`] holds the loaded objects in fixed per-type slots
//!   and owns the image and string ids bound to them.
//! - [`TemporaryObject`] is a preview load that never touches a slot.
//! - [`installer`] writes new objects into the directory.
//!
//! ```no_run
//! use locobj_manager::{ObjectManager, ObjectManagerConfig};
//! use locobj_object::ObjectType;
//!
//! let mut manager = ObjectManager::new(ObjectManagerConfig::new("objdata"));
//! manager.load_index()?;
//! for (_, entry) in manager.get_available_objects(ObjectType::Vehicle) {
//!     println!("{}", entry.name_lossy());
//! }
//! # Ok::<(), locobj_manager::Error>(())
//! ```

mod config;
pub mod descriptor;
mod error;
pub mod fingerprint;
mod hooks;
pub mod index;
pub mod installer;
mod loader;
mod manager;
pub mod repository;
mod temporary;

pub use config::{ObjectManagerConfig, DEFAULT_INDEX_FILE_NAME};
pub use descriptor::ObjectIndexEntry;
pub use error::{Error, Result};
pub use fingerprint::FolderState;
pub use hooks::{HostHooks, NullHost};
pub use index::{ObjectIndex, ObjectIndexId};
pub use loader::{find_and_preload_object, verify_object};
pub use manager::{LoadObjectsResult, ObjectManager};
pub use repository::{LoadMode, LoadedObject, ObjectRepository, Slot};
pub use temporary::{load_temporary_object, preview_object_file, TemporaryObject};
