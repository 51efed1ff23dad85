use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Ordering applied to the unpinned part of a recipe listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SortOrder {
    /// Most recently created first.
    #[default]
    Newest,
    Oldest,
    /// Title, case-insensitive.
    NameAsc,
    NameDesc,
    /// Total weight.
    WeightAsc,
    WeightDesc,
    /// Number of ingredients.
    IngredientsAsc,
    IngredientsDesc,
}

impl SortOrder {
    /// Parse a wire name such as `"name-asc"`. Unknown names fall back to
    /// [`SortOrder::Newest`].
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "oldest" => SortOrder::Oldest,
            "name-asc" => SortOrder::NameAsc,
            "name-desc" => SortOrder::NameDesc,
            "weight-asc" => SortOrder::WeightAsc,
            "weight-desc" => SortOrder::WeightDesc,
            "ingredients-asc" => SortOrder::IngredientsAsc,
            "ingredients-desc" => SortOrder::IngredientsDesc,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::WeightAsc => "weight-asc",
            SortOrder::WeightDesc => "weight-desc",
            SortOrder::IngredientsAsc => "ingredients-asc",
            SortOrder::IngredientsDesc => "ingredients-desc",
        }
    }
}
