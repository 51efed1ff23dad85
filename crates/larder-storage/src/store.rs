//! The authoritative recipe collection.
//!
//! Every mutation is applied to a staged copy of the collection, written
//! through the [`RecipeRepository`], and only then committed to memory. A
//! failed write leaves the in-memory collection exactly as it was.

use std::collections::HashSet;

use jiff::Timestamp;
use larder_core::models::ingredient::Ingredient;
use larder_core::models::recipe::{Recipe, normalize_title};

use crate::error::StoreError;
use crate::images::ImageStore;
use crate::recipes::RecipeRepository;

/// Input for [`RecipeStore::create`].
#[derive(Debug, Clone, Default)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    /// Reference previously returned by [`RecipeStore::store_image`].
    pub image_url: Option<String>,
}

/// Fields to overwrite in [`RecipeStore::update`]. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub image_url: Option<String>,
}

pub struct RecipeStore<R, I> {
    recipes: Vec<Recipe>,
    repository: R,
    images: I,
}

impl<R: RecipeRepository, I: ImageStore> RecipeStore<R, I> {
    /// Load the collection. Startup never fails: an unreadable store is
    /// logged and treated as empty.
    pub fn open(repository: R, images: I) -> Self {
        let mut recipes = match repository.read_all() {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::error!(error = %e, "failed to load recipes, starting with an empty collection");
                Vec::new()
            }
        };
        enforce_single_pin(&mut recipes);
        warn_duplicate_ids(&recipes);
        tracing::info!(count = recipes.len(), "recipe store opened");

        Self {
            recipes,
            repository,
            images,
        }
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Recipe, StoreError> {
        self.recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    pub fn create(&mut self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let title = normalize_title(&new.title)?;
        let now = Timestamp::now();
        let recipe = Recipe::new(
            self.next_id(now),
            title,
            new.description.unwrap_or_default(),
            new.ingredients,
            new.image_url,
            now,
        );

        let mut staged = self.recipes.clone();
        staged.push(recipe.clone());
        self.commit(staged)?;

        tracing::info!(id = %recipe.id, title = %recipe.title, total = self.recipes.len(), "recipe created");
        Ok(recipe)
    }

    pub fn update(&mut self, id: &str, patch: RecipePatch) -> Result<Recipe, StoreError> {
        let index = self.position(id)?;
        let title = patch.title.as_deref().map(normalize_title).transpose()?;

        let mut staged = self.recipes.clone();
        let recipe = &mut staged[index];
        let previous_image = recipe.image_url.clone();

        if let Some(title) = title {
            recipe.title = title;
        }
        if let Some(description) = patch.description {
            recipe.description = description;
        }
        if let Some(ingredients) = patch.ingredients {
            recipe.set_ingredients(ingredients);
        }
        if let Some(image_url) = patch.image_url {
            recipe.image_url = Some(image_url);
        }
        recipe.updated_at = Timestamp::now();
        let updated = recipe.clone();

        self.commit(staged)?;

        if let Some(old) = previous_image
            && updated.image_url.as_deref() != Some(old.as_str())
        {
            self.discard_image(&old);
        }

        tracing::info!(id = %updated.id, "recipe updated");
        Ok(updated)
    }

    /// Pin or unpin a recipe. Pinning clears the flag on whichever recipe
    /// held it before.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> Result<Recipe, StoreError> {
        let index = self.position(id)?;
        let now = Timestamp::now();

        let mut staged = self.recipes.clone();
        if pinned {
            for (i, other) in staged.iter_mut().enumerate() {
                if i != index && other.is_pinned {
                    other.is_pinned = false;
                    other.updated_at = now;
                    tracing::debug!(id = %other.id, "recipe unpinned");
                }
            }
        }
        let recipe = &mut staged[index];
        recipe.is_pinned = pinned;
        recipe.updated_at = now;
        let updated = recipe.clone();

        self.commit(staged)?;

        tracing::info!(id = %updated.id, pinned, "recipe pin changed");
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self.position(id)?;

        let mut staged = self.recipes.clone();
        let removed = staged.remove(index);
        self.commit(staged)?;

        if let Some(reference) = &removed.image_url {
            self.discard_image(reference);
        }

        tracing::info!(id = %removed.id, remaining = self.recipes.len(), "recipe deleted");
        Ok(())
    }

    /// Store an uploaded image and return the reference to put on a recipe.
    pub fn store_image(&self, bytes: &[u8], suggested_name: &str) -> Result<String, StoreError> {
        self.images
            .store(bytes, suggested_name)
            .map_err(StoreError::Image)
    }

    /// Delete a stored image. Failures are logged, not returned: the recipe
    /// change that made the image obsolete has already been committed.
    pub fn discard_image(&self, reference: &str) {
        if let Err(e) = self.images.delete(reference) {
            tracing::warn!(reference, error = %e, "failed to delete image");
        }
    }

    pub fn image_exists(&self, reference: &str) -> bool {
        self.images.exists(reference)
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.recipes
            .iter()
            .position(|recipe| recipe.id == id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Millisecond timestamp, bumped past any id already in use.
    fn next_id(&self, now: Timestamp) -> String {
        let mut millis = now.as_millisecond();
        loop {
            let candidate = millis.to_string();
            if !self.recipes.iter().any(|recipe| recipe.id == candidate) {
                return candidate;
            }
            millis += 1;
        }
    }

    fn commit(&mut self, staged: Vec<Recipe>) -> Result<(), StoreError> {
        if let Err(e) = self.repository.write_all(&staged) {
            tracing::error!(error = %e, count = staged.len(), "failed to persist recipes, change discarded");
            return Err(StoreError::Persistence(e));
        }
        self.recipes = staged;
        Ok(())
    }
}

/// Older data may carry several pinned recipes; keep the first.
fn enforce_single_pin(recipes: &mut [Recipe]) {
    let mut seen = false;
    for recipe in recipes.iter_mut().filter(|recipe| recipe.is_pinned) {
        if seen {
            tracing::warn!(id = %recipe.id, "extra pinned recipe found on load, unpinning");
            recipe.is_pinned = false;
        }
        seen = true;
    }
}

/// Older data may repeat an id. Lookups by id only ever reach the first
/// recipe carrying it, so the rest are reported.
fn warn_duplicate_ids(recipes: &[Recipe]) {
    let mut seen = HashSet::new();
    for recipe in recipes {
        if !seen.insert(recipe.id.as_str()) {
            tracing::warn!(id = %recipe.id, title = %recipe.title, "duplicate recipe id found on load, only the first is reachable");
        }
    }
}
