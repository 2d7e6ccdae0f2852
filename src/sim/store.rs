/// Key/value document storage for save data.
///
/// Each document is a JSON string under a short key (`player`, `levels`,
/// `settings`). Two backends:
///
///   - `FileStore`   one `<key>.json` per document in the save directory.
///                     Writes go to a temp file first and are renamed over
///                     the target, so readers never see a half-written file.
///   - `MemoryStore` in-process map, used by tests.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode {key}: {message}")]
    Serialize { key: String, message: String },
    #[error("{0}")]
    Injected(String),
}

impl StoreError {
    fn io(key: &str, source: std::io::Error) -> Self {
        StoreError::Io { key: key.to_string(), source }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait Store {
    /// Raw document text, or `None` if nothing is stored under `key`.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replace the document under `key`.
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Remove the document. Removing a missing document is not an error.
    fn delete(&mut self, key: &str) -> StoreResult<()>;
}

// ══════════════════════════════════════════════════════════════
// File backend
// ══════════════════════════════════════════════════════════════

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.json.tmp"))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(key, e))?;

        let tmp = self.temp_path_for(key);
        {
            let mut file = std::fs::File::create(&tmp).map_err(|e| StoreError::io(key, e))?;
            file.write_all(value.as_bytes()).map_err(|e| StoreError::io(key, e))?;
            file.sync_all().map_err(|e| StoreError::io(key, e))?;
        }
        std::fs::rename(&tmp, self.path_for(key)).map_err(|e| StoreError::io(key, e))?;
        log::debug!("wrote {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

/// Pick a directory for save files.
///
/// Order: config override, exe directory (if writable), XDG data home,
/// then the current directory.
pub fn resolve_save_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // System installs (/usr/games) are read-only
            let marker = parent.join(".write_test_bukvar");
            if std::fs::write(&marker, "").is_ok() {
                let _ = std::fs::remove_file(&marker);
                return parent.to_path_buf();
            }
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/bukvar");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// Memory backend
// ══════════════════════════════════════════════════════════════

/// In-memory backend with failure switches, for tests.
#[derive(Default)]
#[cfg_attr(not(test), allow(dead_code))]
pub struct MemoryStore {
    docs: HashMap<String, String>,
    pub fail_writes: bool,
    pub fail_deletes: bool,
    pub writes: usize,
}

#[cfg_attr(not(test), allow(dead_code))]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant a raw document, bypassing the write counter.
    pub fn put_raw(&mut self, key: &str, value: &str) {
        self.docs.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.docs.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.docs.contains_key(key)
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.docs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Injected(format!("write to {key} refused")));
        }
        self.writes += 1;
        self.docs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        if self.fail_deletes {
            return Err(StoreError::Injected(format!("delete of {key} refused")));
        }
        self.docs.remove(key);
        Ok(())
    }
}
