//! JSON file item store
//!
//! Persists the collection as a JSON array of `{"_id", "name"}` documents.
//! Every operation re-reads the file under a lock, applies the change and
//! writes it back through a temporary file plus rename, so a crash never
//! leaves a half-written collection behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::core::models::{Item, ItemId, ItemName, ObjectIdGenerator};
use crate::core::ports::{ItemStore, StoreError};

/// Item store backed by a single JSON document file
#[derive(Debug)]
pub struct FileItemStore {
    path: PathBuf,
    lock: Mutex<()>,
    ids: ObjectIdGenerator,
}

impl FileItemStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty collection and is created on first write.
    /// An existing file is parsed once up front so a corrupt collection is
    /// reported at startup rather than on the first request.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
            ids: ObjectIdGenerator::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<Vec<Item>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, items: &[Item]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_string_pretty(items).map_err(StoreError::Serialize)?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl ItemStore for FileItemStore {
    fn find_all(&self) -> Result<Vec<Item>, StoreError> {
        let _guard = self.guard()?;
        self.load()
    }

    fn create(&self, name: &ItemName) -> Result<Item, StoreError> {
        let _guard = self.guard()?;
        let mut items = self.load()?;
        let mut id = self.ids.next_id();
        while items.iter().any(|item| item.id == id) {
            id = self.ids.next_id();
        }
        let item = Item::new(id, name.clone());
        items.push(item.clone());
        self.save(&items)?;
        Ok(item)
    }

    fn upsert_by_id(&self, id: &ItemId, name: &ItemName) -> Result<Item, StoreError> {
        let _guard = self.guard()?;
        let mut items = self.load()?;
        let item = if let Some(existing) = items.iter_mut().find(|item| &item.id == id) {
            existing.name = name.clone();
            existing.clone()
        } else {
            let item = Item::new(id.clone(), name.clone());
            items.push(item.clone());
            item
        };
        self.save(&items)?;
        Ok(item)
    }

    fn delete_by_id(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let _guard = self.guard()?;
        let mut items = self.load()?;
        let Some(index) = items.iter().position(|item| &item.id == id) else {
            return Ok(None);
        };
        let removed = items.remove(index);
        self.save(&items)?;
        Ok(Some(removed))
    }
}
