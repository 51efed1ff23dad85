use std::path::{Path, PathBuf};

use larder_core::upload_keys;

use crate::error::StorageError;

/// Storage for uploaded recipe images.
///
/// A reference is an opaque string handed back by [`ImageStore::store`] and
/// saved verbatim on the recipe.
pub trait ImageStore: Send {
    fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, StorageError>;

    /// Remove a stored image. Deleting something that is not there is not
    /// an error.
    fn delete(&self, reference: &str) -> Result<(), StorageError>;

    fn exists(&self, reference: &str) -> bool;
}

/// Images written as individual files under one directory and served back
/// under [`upload_keys::UPLOADS_ROUTE`].
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    root: PathBuf,
}

impl DiskImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, reference: &str) -> Option<PathBuf> {
        upload_keys::image_file_name(reference).map(|name| self.root.join(name))
    }
}

impl ImageStore for DiskImageStore {
    fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, StorageError> {
        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))?;

        let file_name = format!(
            "{}-{}.{}",
            jiff::Timestamp::now().as_millisecond(),
            uuid::Uuid::new_v4().simple(),
            upload_keys::image_extension(suggested_name)
        );
        let path = self.root.join(&file_name);
        std::fs::write(&path, bytes).map_err(|e| StorageError::io(&path, e))?;

        tracing::info!(path = %path.display(), size = bytes.len(), "image stored");
        Ok(upload_keys::image_reference(&file_name))
    }

    fn delete(&self, reference: &str) -> Result<(), StorageError> {
        let Some(path) = self.path_for(reference) else {
            tracing::debug!(reference, "not a local upload, nothing to delete");
            return Ok(());
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "image deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    fn exists(&self, reference: &str) -> bool {
        self.path_for(reference).is_some_and(|path| path.is_file())
    }
}
