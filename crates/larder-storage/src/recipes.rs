use std::path::{Path, PathBuf};

use larder_core::models::recipe::Recipe;

use crate::error::StorageError;

/// Whole-collection persistence for recipes.
pub trait RecipeRepository: Send {
    /// Read every stored recipe. A missing store is an empty collection.
    fn read_all(&self) -> Result<Vec<Recipe>, StorageError>;

    /// Replace the stored collection with `recipes`.
    fn write_all(&self, recipes: &[Recipe]) -> Result<(), StorageError>;
}

/// Recipes kept as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable data file is copied before it can be overwritten.
    pub fn quarantine_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    fn quarantine(&self) {
        let target = self.quarantine_path();
        match std::fs::copy(&self.path, &target) {
            Ok(_) => tracing::warn!(
                path = %self.path.display(),
                copy = %target.display(),
                "corrupt data file copied aside"
            ),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "failed to copy corrupt data file aside"
            ),
        }
    }
}

impl RecipeRepository for JsonFileRepository {
    fn read_all(&self) -> Result<Vec<Recipe>, StorageError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no data file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Vec<Recipe>>(&bytes) {
            Ok(recipes) => {
                tracing::debug!(
                    path = %self.path.display(),
                    count = recipes.len(),
                    "recipes loaded from disk"
                );
                Ok(recipes)
            }
            Err(e) => {
                self.quarantine();
                Err(StorageError::Corrupt {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Write to a temp file then rename, so a crash never leaves a
    /// half-written data file behind.
    fn write_all(&self, recipes: &[Recipe]) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(recipes)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|e| StorageError::io(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            count = recipes.len(),
            "recipes flushed to disk"
        );
        Ok(())
    }
}
