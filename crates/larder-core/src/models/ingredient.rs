use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::amount;

/// One line of a recipe. `amount` and `notes` are free text typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub amount: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub notes: String,
    /// Opaque identifier some clients attach; kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional, type = "string | number")]
    pub ingredient_id: Option<serde_json::Value>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            notes: notes.into(),
            ingredient_id: None,
        }
    }

    pub fn weight(&self) -> f64 {
        amount::parse_weight(&self.amount)
    }

    pub fn quantity(&self) -> u32 {
        amount::parse_quantity(&self.notes)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextField {
    Text(String),
    Number(serde_json::Number),
    Other(IgnoredAny),
}

/// Free-text fields accept numbers as their decimal text; `null` and any
/// other value read as empty.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextField::deserialize(deserializer)? {
        TextField::Text(text) => text,
        TextField::Number(number) => number.to_string(),
        TextField::Other(_) => String::new(),
    })
}

/// Shapes an ingredient list has been stored in over time.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsField {
    List(Vec<Ingredient>),
    Encoded(String),
    Other(IgnoredAny),
}

/// Deserialize a stored ingredient list that may be an array, a JSON-encoded
/// string of an array, or `null`. Anything undecodable yields an empty list.
pub fn deserialize_ingredients<'de, D>(deserializer: D) -> Result<Vec<Ingredient>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IngredientsField::deserialize(deserializer)? {
        IngredientsField::List(list) => list,
        IngredientsField::Encoded(text) => decode_ingredients(&text),
        IngredientsField::Other(_) => Vec::new(),
    })
}

/// Decode a JSON-encoded ingredient list found in older data files.
/// Undecodable text yields an empty list.
pub fn decode_ingredients(text: &str) -> Vec<Ingredient> {
    parse_ingredients(text).unwrap_or_default()
}

/// Parse a JSON-encoded ingredient list sent by a client. Blank text is an
/// empty list.
pub fn parse_ingredients(text: &str) -> Result<Vec<Ingredient>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text)
}
