use std::sync::{Arc, Mutex};

use fairway_scorecard::{KeyValueStore, MemoryStore, StorageError};

/// A store the test keeps a handle to after the worker takes ownership.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
    writes: Arc<Mutex<usize>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStore::new())),
            writes: Arc::default(),
        }
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().get(key).unwrap()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        *self.writes.lock().unwrap() += 1;
        self.inner.lock().unwrap().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.lock().unwrap().remove(key)
    }
}

/// A scratch directory unique to this test process.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("fairway-it-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
