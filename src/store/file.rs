//! # File Store
//!
//! Settings persisted as a single JSON object of string values.

use super::KeyValueStore;
use crate::KitbagResult;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A JSON-file backed settings store.
///
/// The file is read once on open and rewritten on every mutation. A missing
/// file starts empty and is created on the first write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// An unreadable or corrupted file is logged and treated as empty so a
    /// damaged settings file never blocks play. The next successful write
    /// replaces it.
    ///
    /// A write that cannot be flushed to disk is rolled back in memory, so
    /// the store always reflects the last state written.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = Self::load_from_disk(&path);
        log::debug!("Opened settings store {} with {} keys", path.display(), values.len());
        Self { path, values }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> BTreeMap<String, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                log::warn!("Could not read settings file {}: {}", path.display(), e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Ignoring corrupted settings file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }

    fn flush(&self) -> KitbagResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_string(&mut self, key: &str, value: &str) -> KitbagResult<()> {
        let previous = self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            match previous {
                Some(previous) => self.values.insert(key.to_string(), previous),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) -> KitbagResult<bool> {
        let Some(previous) = self.values.remove(key) else {
            return Ok(false);
        };
        if let Err(e) = self.flush() {
            self.values.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }
}
