use std::sync::Mutex;

use async_trait::async_trait;
use waypost::catalog::adoption::AdoptedDog;
use waypost::catalog::{AdoptionStorage, AdoptionStore, Dog, JsonFileStorage, StorageError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Counts I/O calls so tests can check nothing happens between mount and unmount.
#[derive(Default)]
struct CountingStorage {
    saved: Mutex<Vec<AdoptedDog>>,
    loads: Mutex<usize>,
    saves: Mutex<usize>,
}

#[async_trait]
impl AdoptionStorage for CountingStorage {
    async fn load(&self) -> Result<Vec<AdoptedDog>, StorageError> {
        *self.loads.lock().unwrap() += 1;
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save(&self, dogs: &[AdoptedDog]) -> Result<(), StorageError> {
        *self.saves.lock().unwrap() += 1;
        *self.saved.lock().unwrap() = dogs.to_vec();
        Ok(())
    }
}

fn dog(name: &str) -> Dog {
    Dog::new(name, "Mestizo", format!("{}.jpg", name.to_lowercase()))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("adopted.json"));

    let mut store = AdoptionStore::new();
    store.load(&storage).await.unwrap();
    store.add(dog("Max"));
    store.add(dog("Luna"));
    store.save(&storage).await.unwrap();

    let mut reloaded = AdoptionStore::new();
    reloaded.load(&storage).await.unwrap();
    let names: Vec<_> = reloaded.dogs().iter().map(|a| a.dog.name.as_str()).collect();
    assert_eq!(names, vec!["Max", "Luna"]);
    assert_eq!(reloaded.dogs()[0].adopted_at, store.dogs()[0].adopted_at);
}

#[tokio::test]
async fn test_releasing_last_dog_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("adopted.json"));

    let mut store = AdoptionStore::new();
    store.add(dog("Toby"));
    store.save(&storage).await.unwrap();
    store.remove("Toby");
    store.save(&storage).await.unwrap();

    let mut reloaded = AdoptionStore::new();
    reloaded.load(&storage).await.unwrap();
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn test_io_only_at_lifecycle_points() {
    let storage = CountingStorage::default();
    let mut store = AdoptionStore::new();

    store.load(&storage).await.unwrap();
    store.add(dog("Coco"));
    store.add(dog("Coco"));
    store.add(dog("Nina"));
    store.remove("Nina");
    assert_eq!(*storage.loads.lock().unwrap(), 1);
    assert_eq!(*storage.saves.lock().unwrap(), 0);

    store.save(&storage).await.unwrap();
    assert_eq!(*storage.saves.lock().unwrap(), 1);
    assert_eq!(storage.saved.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_load_replaces_unsaved_changes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("adopted.json"));

    let mut store = AdoptionStore::new();
    store.add(dog("Simba"));
    store.load(&storage).await.unwrap();
    assert!(!store.is_adopted("Simba"));
}
