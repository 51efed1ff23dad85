//! In-process collaborators for tests and throwaway instances.
//!
//! Clones share the same backing data, so a test can keep one handle while
//! the store owns another.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use larder_core::models::recipe::Recipe;
use larder_core::upload_keys;

use crate::error::StorageError;
use crate::images::ImageStore;
use crate::recipes::RecipeRepository;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rejected(what: &str) -> StorageError {
    StorageError::io(what, std::io::Error::other("writes disabled"))
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    recipes: Arc<Mutex<Vec<Recipe>>>,
    writes: Arc<AtomicU64>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryRepository {
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(Mutex::new(recipes)),
            ..Self::default()
        }
    }

    /// Make every following `write_all` fail until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<Recipe> {
        lock(&self.recipes).clone()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl RecipeRepository for MemoryRepository {
    fn read_all(&self) -> Result<Vec<Recipe>, StorageError> {
        Ok(self.snapshot())
    }

    fn write_all(&self, recipes: &[Recipe]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(rejected("memory://recipes"));
        }
        *lock(&self.recipes) = recipes.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    next: Arc<AtomicU64>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryImageStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn references(&self) -> Vec<String> {
        lock(&self.images).keys().cloned().collect()
    }
}

impl ImageStore for MemoryImageStore {
    fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(rejected("memory://uploads"));
        }
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let reference = upload_keys::image_reference(&format!(
            "{n}.{}",
            upload_keys::image_extension(suggested_name)
        ));
        lock(&self.images).insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    fn delete(&self, reference: &str) -> Result<(), StorageError> {
        lock(&self.images).remove(reference);
        Ok(())
    }

    fn exists(&self, reference: &str) -> bool {
        lock(&self.images).contains_key(reference)
    }
}
