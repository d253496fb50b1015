use crate::errors::StorageError;
use crate::migrate::normalize;
use crate::models::TrackerData;
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, error};

/// Where a tracker keeps its document: a string blob under a key.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut backend = Self::default();
        backend.entries.insert(key.into(), value.into());
        backend
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(&path, err)),
        }
    }

    /// Writes a sibling temp file and renames it over the target, so a crash
    /// mid-write leaves the previous document intact.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|err| StorageError::io(&self.dir, err))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|err| StorageError::io(&tmp, err))?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::io(&path, err));
        }
        Ok(())
    }
}

/// Reads the document under `key`. A missing or malformed document loads as an
/// empty tracker; a backend that cannot be read is an error, so the stored
/// document is never replaced by an empty one.
pub fn load_data<B: StorageBackend + ?Sized>(
    backend: &B,
    key: &str,
) -> Result<TrackerData, StorageError> {
    match backend.get(key) {
        Ok(Some(raw)) => Ok(decode_data(&raw)),
        Ok(None) => {
            debug!(key, "no stored tracker state");
            Ok(TrackerData::default())
        }
        Err(err) => {
            error!("failed to read tracker state: {err}");
            Err(err)
        }
    }
}

pub fn persist_data<B: StorageBackend + ?Sized>(
    backend: &mut B,
    key: &str,
    data: &TrackerData,
) -> Result<(), StorageError> {
    let payload = encode_data(data)?;
    backend.set(key, &payload)
}

pub fn encode_data(data: &TrackerData) -> Result<String, StorageError> {
    Ok(serde_json::to_string(data)?)
}

pub fn decode_data(raw: &str) -> TrackerData {
    match serde_json::from_str(raw) {
        Ok(value) => normalize(value),
        Err(err) => {
            error!("failed to parse tracker state: {err}");
            TrackerData::default()
        }
    }
}
