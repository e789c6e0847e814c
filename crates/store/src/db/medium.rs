//! Backing media: durable string-to-string maps the store persists into.
//!
//! A medium knows nothing about records. It stores one opaque string per
//! key and must make each `set` or `remove` all-or-nothing: after a failed
//! write the previous value is still readable.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors raised by a backing medium.
#[derive(Debug, Error)]
pub enum MediumError {
    /// Reading or writing the underlying storage failed.
    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        /// Logical key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The key cannot be mapped onto the medium.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A durable key-string to string map.
pub trait Medium {
    /// Read the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `MediumError` if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `MediumError` if the medium cannot be written. The previous
    /// value is left intact.
    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `MediumError` if the medium cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), MediumError>;
}

// =============================================================================
// In-memory medium
// =============================================================================

/// Process-local medium backed by a `HashMap`. Contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    entries: HashMap<String, String>,
}

impl MemoryMedium {
    /// Create an empty medium.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Medium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), MediumError> {
        self.entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File medium
// =============================================================================

/// Directory-backed medium storing each key as `<key>.json`.
///
/// Writes go to a hidden temporary file in the same directory, are synced,
/// then renamed over the target, so a crash or failed write never leaves a
/// half-written value behind.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Open (and create if missing) a data directory.
    ///
    /// # Errors
    ///
    /// Returns `MediumError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, MediumError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| MediumError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "opened file medium");
        Ok(Self { dir })
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, MediumError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(MediumError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Medium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(MediumError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MediumError> {
        let target = self.path_for(key)?;
        write_atomic(&self.dir, key, &target, value).map_err(|source| MediumError::Io {
            key: key.to_owned(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), MediumError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(MediumError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

/// Write `contents` to `target` via a temp file and rename.
fn write_atomic(dir: &Path, key: &str, target: &Path, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp = dir.join(format!(".{key}.tmp.{}.{counter}", std::process::id()));

    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });

    if let Err(err) = written.and_then(|()| rename_over(&tmp, target)) {
        // Leave the target untouched; drop the partial temp file.
        drop(fs::remove_file(&tmp));
        return Err(err);
    }

    // Best-effort directory sync so the rename itself is durable.
    if let Ok(handle) = fs::File::open(dir) {
        drop(handle.sync_all());
    }
    Ok(())
}

#[cfg(windows)]
fn rename_over(from: &Path, to: &Path) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match fs::remove_file(to) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    fs::rename(from, to)
}

#[cfg(not(windows))]
fn rename_over(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_medium() {
        let mut medium = MemoryMedium::new();
        assert_eq!(medium.get("k").unwrap(), None);

        medium.set("k", "v1").unwrap();
        medium.set("k", "v2").unwrap();
        assert_eq!(medium.get("k").unwrap().as_deref(), Some("v2"));

        medium.remove("k").unwrap();
        medium.remove("k").unwrap();
        assert_eq!(medium.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_medium_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut medium = FileMedium::open(tmp.path().join("data")).unwrap();

        assert_eq!(medium.get("marketplace_vendors").unwrap(), None);
        medium.set("marketplace_vendors", "[]").unwrap();
        assert_eq!(
            medium.get("marketplace_vendors").unwrap().as_deref(),
            Some("[]")
        );
        assert!(tmp.path().join("data/marketplace_vendors.json").exists());

        medium.remove("marketplace_vendors").unwrap();
        medium.remove("marketplace_vendors").unwrap();
        assert_eq!(medium.get("marketplace_vendors").unwrap(), None);
    }

    #[test]
    fn test_file_medium_persists_across_handles() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut medium = FileMedium::open(tmp.path()).unwrap();
            medium.set("slot", "{\"a\":1}").unwrap();
        }
        let medium = FileMedium::open(tmp.path()).unwrap();
        assert_eq!(medium.get("slot").unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_file_medium_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let mut medium = FileMedium::open(tmp.path()).unwrap();
        medium.set("slot", "one").unwrap();
        medium.set("slot", "two").unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["slot.json".to_owned()]);
    }

    #[test]
    fn test_file_medium_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut medium = FileMedium::open(tmp.path()).unwrap();
        assert!(matches!(
            medium.set("../escape", "x"),
            Err(MediumError::InvalidKey(_))
        ));
        assert!(matches!(medium.get(""), Err(MediumError::InvalidKey(_))));
    }

    #[test]
    fn test_failed_write_cleans_up_temp_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut medium = FileMedium::open(tmp.path()).unwrap();

        // A directory squatting on the target path makes the rename fail.
        fs::create_dir(tmp.path().join("slot.json")).unwrap();
        assert!(matches!(
            medium.set("slot", "new"),
            Err(MediumError::Io { .. })
        ));

        let entries = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
        assert!(tmp.path().join("slot.json").is_dir());
    }
}
