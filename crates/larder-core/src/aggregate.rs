//! Derived recipe fields and listing order.
//!
//! Pure functions over already-loaded recipes. Every weight goes through
//! [`amount::parse_weight`] so totals agree wherever they are computed.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount;
use crate::models::ingredient::Ingredient;
use crate::models::recipe::Recipe;
use crate::models::sort::SortOrder;

pub fn compute_total_weight(ingredients: &[Ingredient]) -> f64 {
    ingredients
        .iter()
        .map(|ingredient| amount::parse_weight(&ingredient.amount))
        .sum()
}

pub fn compute_ingredients_count(ingredients: &[Ingredient]) -> usize {
    ingredients.len()
}

/// Order recipes for display.
///
/// Pinned recipes come first in their original relative order; the rest are
/// ordered by `order`. The sort is stable, so ties keep their input order.
pub fn sort_recipes(recipes: &[Recipe], order: SortOrder) -> Vec<Recipe> {
    let (mut sorted, mut unpinned): (Vec<Recipe>, Vec<Recipe>) =
        recipes.iter().cloned().partition(|recipe| recipe.is_pinned);

    unpinned.sort_by(|a, b| compare(a, b, order));
    sorted.append(&mut unpinned);
    sorted
}

fn compare(a: &Recipe, b: &Recipe, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Newest => b.created_at.cmp(&a.created_at),
        SortOrder::Oldest => a.created_at.cmp(&b.created_at),
        SortOrder::NameAsc => title_key(a).cmp(&title_key(b)),
        SortOrder::NameDesc => title_key(b).cmp(&title_key(a)),
        SortOrder::WeightAsc => a.total_weight().total_cmp(&b.total_weight()),
        SortOrder::WeightDesc => b.total_weight().total_cmp(&a.total_weight()),
        SortOrder::IngredientsAsc => a.ingredients_count().cmp(&b.ingredients_count()),
        SortOrder::IngredientsDesc => b.ingredients_count().cmp(&a.ingredients_count()),
    }
}

fn title_key(recipe: &Recipe) -> String {
    recipe.title.to_lowercase()
}

/// Totals across the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CollectionSummary {
    pub recipes: usize,
    pub total_weight: f64,
}

pub fn collection_summary(recipes: &[Recipe]) -> CollectionSummary {
    CollectionSummary {
        recipes: recipes.len(),
        total_weight: recipes.iter().map(Recipe::total_weight).sum(),
    }
}

/// One row of a recipe's ingredient table: parsed weight per item and the
/// number of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct IngredientLine {
    pub name: String,
    pub amount: String,
    pub weight: f64,
    pub quantity: u32,
}

pub fn ingredient_lines(recipe: &Recipe) -> Vec<IngredientLine> {
    recipe
        .ingredients()
        .iter()
        .map(|ingredient| IngredientLine {
            name: ingredient.name.clone(),
            amount: ingredient.amount.clone(),
            weight: ingredient.weight(),
            quantity: ingredient.quantity(),
        })
        .collect()
}
