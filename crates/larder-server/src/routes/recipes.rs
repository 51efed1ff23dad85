use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use larder_core::aggregate::{IngredientLine, ingredient_lines, sort_recipes};
use larder_core::models::recipe::Recipe;
use larder_core::models::sort::SortOrder;
use larder_storage::store::{NewRecipe, RecipePatch};

use crate::error::ApiError;
use crate::routes::form::{ImageUpload, RecipeForm};
use crate::state::{AppState, DiskRecipeStore};

#[derive(Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRequest {
    pub is_pinned: bool,
}

/// List recipes in storage order, or sorted when `?sort=` is given.
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let store = state.store.lock().await;
    let recipes = match query.sort.as_deref() {
        Some(name) => sort_recipes(store.all(), SortOrder::parse(name)),
        None => store.all().to_vec(),
    };
    Ok(Json(recipes))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(store.get(&id)?.clone()))
}

pub async fn get_ingredient_lines(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<IngredientLine>>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(ingredient_lines(store.get(&id)?)))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    form: RecipeForm,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let mut store = state.store.lock().await;
    let image_url = store_upload(&store, form.image.as_ref())?;

    let created = store.create(NewRecipe {
        title: form.title.unwrap_or_default(),
        description: form.description,
        ingredients: form.ingredients.unwrap_or_default(),
        image_url: image_url.clone(),
    });

    match created {
        Ok(recipe) => Ok((StatusCode::CREATED, Json(recipe))),
        Err(e) => {
            discard_upload(&store, image_url.as_deref());
            Err(e.into())
        }
    }
}

pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: RecipeForm,
) -> Result<Json<Recipe>, ApiError> {
    let mut store = state.store.lock().await;
    store.get(&id)?;
    let image_url = store_upload(&store, form.image.as_ref())?;

    let updated = store.update(
        &id,
        RecipePatch {
            title: form.title,
            description: form.description,
            ingredients: form.ingredients,
            image_url: image_url.clone(),
        },
    );

    match updated {
        Ok(recipe) => Ok(Json(recipe)),
        Err(e) => {
            discard_upload(&store, image_url.as_deref());
            Err(e.into())
        }
    }
}

pub async fn set_pinned(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PinRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let mut store = state.store.lock().await;
    Ok(Json(store.set_pinned(&id, req.is_pinned)?))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.lock().await;
    store.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn store_upload(
    store: &DiskRecipeStore,
    upload: Option<&ImageUpload>,
) -> Result<Option<String>, ApiError> {
    upload
        .map(|upload| store.store_image(&upload.bytes, &upload.file_name))
        .transpose()
        .map_err(ApiError::from)
}

/// Remove an image stored for a request that then failed.
fn discard_upload(store: &DiskRecipeStore, reference: Option<&str>) {
    if let Some(reference) = reference {
        store.discard_image(reference);
    }
}
