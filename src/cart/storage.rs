use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::CartError;

/// String key/value store standing in for the browser's local storage.
pub trait CartStorage: Send + Sync + 'static {
    fn load(&self, key: &str) -> Result<Option<String>, CartError>;
    fn save(&self, key: &str, value: &str) -> Result<(), CartError>;
    fn remove(&self, key: &str) -> Result<(), CartError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, CartError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CartError> {
        fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash never leaves a half-written cart behind.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CartError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory storage. Clones share the same entries, and every save is counted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Seed a raw value without counting it as a write.
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

fn poisoned() -> CartError {
    CartError::Storage(io::Error::other("memory storage lock poisoned"))
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, CartError> {
        let entries = self.inner.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CartError> {
        let mut entries = self.inner.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CartError> {
        let mut entries = self.inner.entries.lock().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = std::env::temp_dir().join(format!("aero-cart-{}", Uuid::new_v4()));
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.load("aero-delivery-cart").unwrap(), None);
        storage.save("aero-delivery-cart", "[]").unwrap();
        assert_eq!(storage.load("aero-delivery-cart").unwrap().as_deref(), Some("[]"));
        assert!(dir.join("aero-delivery-cart.json").exists());

        storage.remove("aero-delivery-cart").unwrap();
        assert_eq!(storage.load("aero-delivery-cart").unwrap(), None);
        storage.remove("aero-delivery-cart").unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn memory_storage_counts_writes_across_clones() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.insert_raw("k", "seed");
        assert_eq!(handle.writes(), 0);
        storage.save("k", "v").unwrap();
        assert_eq!(handle.writes(), 1);
        assert_eq!(handle.get("k").as_deref(), Some("v"));
    }
}
