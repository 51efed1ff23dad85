use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::ingredient::{Ingredient, deserialize_ingredients};
use crate::aggregate;
use crate::error::CoreError;

/// A stored recipe.
///
/// `total_weight` and `ingredients_count` are derived from `ingredients` and
/// can only change through [`Recipe::set_ingredients`].
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    ingredients: Vec<Ingredient>,
    pub image_url: Option<String>,
    pub is_pinned: bool,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
    total_weight: f64,
    ingredients_count: usize,
}

impl Recipe {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        ingredients: Vec<Ingredient>,
        image_url: Option<String>,
        now: jiff::Timestamp,
    ) -> Self {
        let mut recipe = Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            ingredients: Vec::new(),
            image_url,
            is_pinned: false,
            created_at: now,
            updated_at: now,
            total_weight: 0.0,
            ingredients_count: 0,
        };
        recipe.set_ingredients(ingredients);
        recipe
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn ingredients_count(&self) -> usize {
        self.ingredients_count
    }

    /// Replace the ingredient list and recompute the derived fields.
    pub fn set_ingredients(&mut self, ingredients: Vec<Ingredient>) {
        self.total_weight = aggregate::compute_total_weight(&ingredients);
        self.ingredients_count = aggregate::compute_ingredients_count(&ingredients);
        self.ingredients = ingredients;
    }
}

/// Trim a title, rejecting it if nothing is left.
pub fn normalize_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("title", "Recipe title is required"));
    }
    Ok(trimmed.to_string())
}

/// On-disk shape accepted when loading. Older files carry numeric ids,
/// string-encoded ingredient lists and missing fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_ingredients")]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    created_at: Option<jiff::Timestamp>,
    #[serde(default)]
    updated_at: Option<jiff::Timestamp>,
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RecipeRecord::deserialize(deserializer).map(Recipe::from)
    }
}

impl From<RecipeRecord> for Recipe {
    fn from(record: RecipeRecord) -> Self {
        let created_at = record.created_at.unwrap_or(jiff::Timestamp::UNIX_EPOCH);
        let mut recipe = Recipe::new(
            record.id,
            record.title,
            record.description.unwrap_or_default(),
            record.ingredients,
            record.image_url,
            created_at,
        );
        recipe.is_pinned = record.is_pinned;
        recipe.updated_at = record.updated_at.unwrap_or(created_at);
        recipe
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RecordId::deserialize(deserializer)? {
        RecordId::Text(text) => text,
        RecordId::Number(number) => number.to_string(),
    })
}
