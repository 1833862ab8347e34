use std::{fs, io::ErrorKind, path::PathBuf};

use crate::errors::StorageError;

/// Minimal get/set surface over a string key. The rate limiter depends on
/// this rather than on the filesystem so tests can swap in an in-memory
/// fake.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-per-key store under a single directory. The service uses exactly
/// one key, so this holds the whole send-history record in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write(e.to_string()))?;
        fs::write(self.path_for(key), value).map_err(|e| StorageError::Write(e.to_string()))
    }
}
