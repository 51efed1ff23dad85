use std::sync::Arc;

use tokio::sync::Mutex;

use larder_storage::images::DiskImageStore;
use larder_storage::recipes::JsonFileRepository;
use larder_storage::store::RecipeStore;

use crate::config::ServerConfig;

pub type DiskRecipeStore = RecipeStore<JsonFileRepository, DiskImageStore>;

/// Shared application state, injected into all route handlers via Axum state.
///
/// The store sits behind one mutex, so requests that touch it run one at a
/// time.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<DiskRecipeStore>>,
}

impl AppState {
    pub fn open(config: &ServerConfig) -> Self {
        let store = RecipeStore::open(
            JsonFileRepository::new(&config.data_file),
            DiskImageStore::new(&config.uploads_dir),
        );
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
