use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

pub const USER_KEY: &str = "spaceRift_user";
pub const PROGRESS_KEY: &str = "spaceRift_progress";

/// Key/value store of JSON blobs, one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw = match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed { key: key.to_string(), source })
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|source| StorageError::Encode { key: key.to_string(), source })?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), json)?;
        debug!("Stored {} under {}", key, self.dir.display());
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Progress;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let value: Option<Progress> = storage.get(PROGRESS_KEY).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn stores_and_reloads_progress() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested"));
        let progress = Progress {
            level: 3,
            experience: 40,
            experience_to_next: 300,
            credits: 1250,
            score: 540,
            inventory: vec!["ship_hull_1".to_string()],
        };
        storage.set(PROGRESS_KEY, &progress).unwrap();
        assert_eq!(storage.get::<Progress>(PROGRESS_KEY).unwrap(), Some(progress));

        storage.remove(PROGRESS_KEY).unwrap();
        assert!(storage.get::<Progress>(PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn corrupt_blob_is_reported_with_its_key() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("spaceRift_progress.json"), "{not json").unwrap();
        let storage = LocalStorage::new(dir.path());
        let err = storage.get::<Progress>(PROGRESS_KEY).unwrap_err();
        assert!(matches!(err, StorageError::Malformed { ref key, .. } if key == PROGRESS_KEY));
    }
}
