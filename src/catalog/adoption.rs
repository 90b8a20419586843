//! # Adopted Set
//!
//! The dogs the user has adopted. `AdoptionStore` is plain in-memory state;
//! persistence goes through an `AdoptionStorage`, called exactly twice per
//! run: `load` when the app mounts, `save` when it unmounts.
//!
//! The JSON file implementation writes atomically (write `.tmp`, then
//! `rename()`), so a crash mid-save leaves the previous file intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dog::Dog;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("adoption storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("adoption storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// A dog plus when it was adopted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptedDog {
    pub dog: Dog,
    pub adopted_at: DateTime<Utc>,
}

#[async_trait]
pub trait AdoptionStorage: Send + Sync {
    async fn load(&self) -> Result<Vec<AdoptedDog>, StorageError>;
    async fn save(&self, dogs: &[AdoptedDog]) -> Result<(), StorageError>;
}

// ============================================================================
// Store
// ============================================================================

/// The adopted set, keyed by dog name.
#[derive(Debug, Default, Clone)]
pub struct AdoptionStore {
    dogs: Vec<AdoptedDog>,
}

impl AdoptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `dog` unless one with the same name is already adopted.
    /// Returns whether it was added.
    pub fn add(&mut self, dog: Dog) -> bool {
        if self.is_adopted(&dog.name) {
            debug!("{} already adopted", dog.name);
            return false;
        }
        info!("Adopted {}", dog.name);
        self.dogs.push(AdoptedDog {
            dog,
            adopted_at: Utc::now(),
        });
        true
    }

    /// Removes every adopted dog called `name`. Returns whether any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.dogs.len();
        self.dogs.retain(|a| a.dog.name != name);
        let removed = self.dogs.len() != before;
        if removed {
            info!("Released {}", name);
        }
        removed
    }

    pub fn is_adopted(&self, name: &str) -> bool {
        self.dogs.iter().any(|a| a.dog.name == name)
    }

    pub fn dogs(&self) -> &[AdoptedDog] {
        &self.dogs
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    /// Mount: replaces the in-memory set with what `storage` holds.
    /// On failure the set is left empty and the error returned.
    pub async fn load(&mut self, storage: &dyn AdoptionStorage) -> Result<(), StorageError> {
        self.dogs.clear();
        let mut loaded = storage.load().await?;
        // Older files may carry duplicates; first one wins.
        let mut seen = std::collections::HashSet::new();
        loaded.retain(|a| seen.insert(a.dog.name.clone()));
        debug!("Loaded {} adopted dogs", loaded.len());
        self.dogs = loaded;
        Ok(())
    }

    /// Unmount: writes the whole set, including an empty one.
    pub async fn save(&self, storage: &dyn AdoptionStorage) -> Result<(), StorageError> {
        storage.save(&self.dogs).await?;
        debug!("Saved {} adopted dogs", self.dogs.len());
        Ok(())
    }
}

// ============================================================================
// JSON file storage
// ============================================================================

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AdoptionStorage for JsonFileStorage {
    /// A missing file is an empty set.
    async fn load(&self) -> Result<Vec<AdoptedDog>, StorageError> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No adopted set at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("Failed to read adopted set: {}", e);
                return Err(e.into());
            }
        };
        Ok(serde_json::from_str(&json)?)
    }

    async fn save(&self, dogs: &[AdoptedDog]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(dogs)?;
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedupes_by_name() {
        let mut store = AdoptionStore::new();
        assert!(store.add(Dog::new("Max", "Beagle", "a.jpg")));
        assert!(!store.add(Dog::new("Max", "Pug", "b.jpg")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.dogs()[0].dog.breed, "Beagle");
    }

    #[test]
    fn test_remove() {
        let mut store = AdoptionStore::new();
        store.add(Dog::new("Max", "Beagle", "a.jpg"));
        store.add(Dog::new("Luna", "Husky", "b.jpg"));
        assert!(store.remove("Max"));
        assert!(!store.is_adopted("Max"));
        assert!(store.is_adopted("Luna"));
        assert!(!store.remove("Max"));
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("adopted.json"));
        let mut store = AdoptionStore::new();
        store.load(&storage).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("adopted.json");
        let storage = JsonFileStorage::new(&path);
        let mut store = AdoptionStore::new();
        store.add(Dog::new("Coco", "Poodle", "c.jpg"));
        store.save(&storage).await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adopted.json");
        std::fs::write(&path, "not json").unwrap();
        let mut store = AdoptionStore::new();
        store.add(Dog::new("Thor", "Akita", "t.jpg"));
        let err = store.load(&JsonFileStorage::new(&path)).await.unwrap_err();
        assert!(matches!(err, StorageError::Format(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_drops_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adopted.json");
        let now = Utc::now();
        let dogs = vec![
            AdoptedDog { dog: Dog::new("Max", "Beagle", "a"), adopted_at: now },
            AdoptedDog { dog: Dog::new("Max", "Pug", "b"), adopted_at: now },
        ];
        std::fs::write(&path, serde_json::to_string(&dogs).unwrap()).unwrap();
        let mut store = AdoptionStore::new();
        store.load(&JsonFileStorage::new(&path)).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.dogs()[0].dog.breed, "Beagle");
    }
}
