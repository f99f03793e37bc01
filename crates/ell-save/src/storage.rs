//! Key-value storage backends for snapshots.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{SaveError, SaveResult};

/// A string key-value store.
pub trait Storage {
    /// Read a value. `Ok(None)` means the key is not present.
    fn get(&self, key: &str) -> SaveResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> SaveResult<()>;

    /// Remove a value. Returns whether it existed.
    fn remove(&mut self, key: &str) -> SaveResult<bool>;
}

/// Keys become file names, so they are restricted to a portable alphabet.
fn check_key(key: &str) -> SaveResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(SaveError::InvalidKey(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// In-process store with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of keys and values in bytes.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Bytes currently used by keys and values.
    pub fn used(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> SaveResult<Option<String>> {
        check_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> SaveResult<()> {
        check_key(key)?;
        if let Some(limit) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.used() - replaced + key.len() + value.len();
            if needed > limit {
                return Err(SaveError::QuotaExceeded { needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SaveResult<bool> {
        check_key(key)?;
        Ok(self.entries.remove(key).is_some())
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary file that is then renamed over the target, so
/// an interrupted save leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for save files. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the save files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for a key.
    pub fn path_for(&self, key: &str) -> SaveResult<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SaveError + '_ {
    move |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> SaveResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> SaveResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;
        debug!(path = %path.display(), bytes = value.len(), "wrote save file");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> SaveResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Tries a primary store first and a secondary one when it fails.
///
/// Reads prefer the primary; a value is only read from the secondary when
/// the primary errors or does not have the key. A successful write clears
/// the key from the other store so a read always sees the latest value.
#[derive(Debug, Clone)]
pub struct FallbackStorage<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Storage, S: Storage> FallbackStorage<P, S> {
    /// Chain two stores.
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// The primary store.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// The secondary store.
    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

impl<P: Storage, S: Storage> Storage for FallbackStorage<P, S> {
    fn get(&self, key: &str) -> SaveResult<Option<String>> {
        match self.primary.get(key) {
            Ok(Some(value)) => Ok(Some(value)),
            Ok(None) => self.secondary.get(key),
            Err(e) => {
                warn!(key, error = %e, "primary storage read failed, trying secondary");
                self.secondary.get(key)
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> SaveResult<()> {
        match self.primary.set(key, value) {
            Ok(()) => {
                // Drop any older copy so it cannot resurface on read
                if let Err(e) = self.secondary.remove(key) {
                    warn!(key, error = %e, "could not clear stale secondary value");
                }
                Ok(())
            }
            Err(primary) => {
                warn!(key, error = %primary, "primary storage write failed, trying secondary");
                self.secondary
                    .set(key, value)
                    .map_err(|secondary| SaveError::AllBackendsFailed {
                        primary: Box::new(primary),
                        secondary: Box::new(secondary),
                    })?;
                // Reads prefer the primary, so its older value must go
                if let Err(e) = self.primary.remove(key) {
                    warn!(key, error = %e, "could not clear stale primary value");
                }
                Ok(())
            }
        }
    }

    fn remove(&mut self, key: &str) -> SaveResult<bool> {
        let primary = self.primary.remove(key);
        let secondary = self.secondary.remove(key);
        match (primary, secondary) {
            (Ok(a), Ok(b)) => Ok(a || b),
            (Ok(a), Err(e)) | (Err(e), Ok(a)) => {
                warn!(key, error = %e, "storage remove failed on one backend");
                Ok(a)
            }
            (Err(primary), Err(secondary)) => Err(SaveError::AllBackendsFailed {
                primary: Box::new(primary),
                secondary: Box::new(secondary),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_set_get_remove() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get("slot").unwrap(), None);
        store.set("slot", "one").unwrap();
        store.set("slot", "two").unwrap();
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("two"));
        assert!(store.remove("slot").unwrap());
        assert!(!store.remove("slot").unwrap());
    }

    #[test]
    fn memory_quota() {
        let mut store = MemoryStorage::new().with_quota(10);
        store.set("a", "12345").unwrap();
        // Replacing a value only counts the difference
        store.set("a", "123456789").unwrap();
        let err = store.set("b", "12345").unwrap_err();
        assert!(matches!(
            err,
            SaveError::QuotaExceeded {
                needed: 16,
                limit: 10
            }
        ));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn rejects_unsafe_keys() {
        let mut store = MemoryStorage::new();
        for key in ["", "../escape", "a/b", ".hidden", "with space"] {
            assert!(matches!(store.set(key, "x"), Err(SaveError::InvalidKey(_))), "{key}");
        }
        assert!(store.set("ellidra-save_2.bak", "x").is_ok());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStorage::new(dir.path().join("saves"));
        assert_eq!(store.get("slot").unwrap(), None);

        store.set("slot", "{\"a\":1}").unwrap();
        let path = store.path_for("slot").unwrap();
        assert!(path.ends_with("saves/slot.json"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":1}");
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("{\"a\":1}"));

        // No temp file left behind
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);

        assert!(store.remove("slot").unwrap());
        assert!(!store.remove("slot").unwrap());
    }

    #[test]
    fn file_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a dir").unwrap();
        let mut store = FileStorage::new(&blocker);
        assert!(matches!(store.set("slot", "x"), Err(SaveError::Io { .. })));
    }

    #[test]
    fn fallback_writes_to_secondary_when_primary_is_full() {
        let mut store =
            FallbackStorage::new(MemoryStorage::new().with_quota(4), MemoryStorage::new());
        store.set("slot", "a long value").unwrap();
        assert_eq!(store.primary().get("slot").unwrap(), None);
        assert_eq!(
            store.secondary().get("slot").unwrap().as_deref(),
            Some("a long value")
        );
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("a long value"));
        assert!(store.remove("slot").unwrap());
        assert_eq!(store.get("slot").unwrap(), None);
    }

    #[test]
    fn fallback_prefers_primary() {
        let mut store = FallbackStorage::new(MemoryStorage::new(), MemoryStorage::new());
        store.set("slot", "value").unwrap();
        assert!(store.primary().get("slot").unwrap().is_some());
        assert!(store.secondary().get("slot").unwrap().is_none());
    }

    #[test]
    fn newer_value_in_secondary_replaces_primary_copy() {
        let mut store =
            FallbackStorage::new(MemoryStorage::new().with_quota(20), MemoryStorage::new());
        store.set("slot", "old").unwrap();
        assert_eq!(store.primary().get("slot").unwrap().as_deref(), Some("old"));

        store.set("slot", "a much newer and longer value").unwrap();
        assert_eq!(
            store.get("slot").unwrap().as_deref(),
            Some("a much newer and longer value")
        );
        assert_eq!(store.primary().get("slot").unwrap(), None);

        // Fits the primary again; the secondary copy is dropped
        store.set("slot", "short").unwrap();
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("short"));
        assert_eq!(store.secondary().get("slot").unwrap(), None);
    }

    #[test]
    fn fallback_reports_both_failures() {
        let mut store = FallbackStorage::new(
            MemoryStorage::new().with_quota(1),
            MemoryStorage::new().with_quota(1),
        );
        let err = store.set("slot", "value").unwrap_err();
        assert!(matches!(err, SaveError::AllBackendsFailed { .. }));
    }
}
