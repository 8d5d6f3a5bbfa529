//! Object manager configuration.

use std::path::{Path, PathBuf};

use locobj_object::LanguageId;

/// File name of the index cache when no path is configured.
pub const DEFAULT_INDEX_FILE_NAME: &str = "objindex.dat";

/// Where objects live and how they are presented.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObjectManagerConfig {
    /// Resolved content directory scanned for `.DAT` files.
    pub objects_dir: PathBuf,
    /// Index cache file. Empty means `<objects_dir>/objindex.dat`.
    pub index_path: PathBuf,
    /// Preferred string table language.
    pub language: LanguageId,
    /// First run: changes the progress caption only.
    pub first_time: bool,
}

impl Default for ObjectManagerConfig {
    fn default() -> Self {
        Self {
            objects_dir: PathBuf::from("objdata"),
            index_path: PathBuf::new(),
            language: LanguageId::default(),
            first_time: false,
        }
    }
}

impl ObjectManagerConfig {
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = path.into();
        self
    }

    pub fn with_language(mut self, language: LanguageId) -> Self {
        self.language = language;
        self
    }

    pub fn with_first_time(mut self, first_time: bool) -> Self {
        self.first_time = first_time;
        self
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// The index cache path, defaulted from the objects directory.
    pub fn index_path(&self) -> PathBuf {
        if self.index_path.as_os_str().is_empty() {
            self.objects_dir.join(DEFAULT_INDEX_FILE_NAME)
        } else {
            self.index_path.clone()
        }
    }

    /// Progress caption for an index rebuild.
    pub fn progress_caption(&self) -> &'static str {
        if self.first_time {
            "Starting for the first time..."
        } else {
            "Checking object files..."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_index_path() {
        let config = ObjectManagerConfig::new("/games/loco/objdata");
        assert_eq!(config.index_path(), PathBuf::from("/games/loco/objdata/objindex.dat"));

        let config = config.with_index_path("/tmp/index.dat");
        assert_eq!(config.index_path(), PathBuf::from("/tmp/index.dat"));
    }

    #[test]
    fn test_builder() {
        let config = ObjectManagerConfig::new("objdata")
            .with_language(LanguageId::German)
            .with_first_time(true);
        assert_eq!(config.language, LanguageId::German);
        assert_eq!(config.progress_caption(), "Starting for the first time...");
    }
}
