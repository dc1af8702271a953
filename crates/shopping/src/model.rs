use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::prelude::FromRow;

/// One ingredient as read from a recipe.
///
/// Recipe data comes from several importers and no shape is enforced
/// upstream, so both structured records and free-text lines are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Text(String),
    Structured(StructuredIngredient),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Ingredient {
    pub fn structured(name: impl Into<String>, amount: f64, unit: Option<&str>) -> Self {
        Self::Structured(StructuredIngredient {
            name: name.into(),
            amount: Some(Amount::Number(amount)),
            unit: unit.map(str::to_owned),
            notes: None,
        })
    }

    /// Reads one array element leniently. Elements that are neither a string
    /// nor an object carry nothing to buy and yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.to_owned())),
            Value::Object(map) => {
                let text = |key: &str| match map.get(key) {
                    Some(Value::String(v)) => Some(v.to_owned()),
                    Some(Value::Number(v)) => Some(v.to_string()),
                    _ => None,
                };

                let amount = match map.get("amount").or_else(|| map.get("quantity")) {
                    Some(Value::Number(n)) => n.as_f64().map(Amount::Number),
                    Some(Value::String(s)) => Some(Amount::Text(s.to_owned())),
                    _ => None,
                };

                Some(Self::Structured(StructuredIngredient {
                    name: text("name").unwrap_or_default(),
                    amount,
                    unit: text("unit"),
                    notes: text("notes"),
                }))
            }
            Value::Number(n) => Some(Self::Text(n.to_string())),
            _ => None,
        }
    }

    /// Parses a stored ingredient array. Anything that is not a JSON array,
    /// including a missing or corrupt column, reads as no ingredients.
    pub fn list_from_json(raw: &str) -> Vec<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(values)) => values.iter().filter_map(Self::from_json).collect(),
            Ok(Value::Null) => vec![],
            Ok(other) => {
                tracing::warn!(kind = %json_kind(&other), "ingredients column is not an array");
                vec![]
            }
            Err(err) => {
                tracing::warn!(error = %err, "ingredients column is not valid json");
                vec![]
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub list_id: String,
    pub name: String,
    pub quantity: Option<String>,
    pub is_complete: bool,
    pub auto_added: bool,
    pub pending_confirmation: bool,
    pub source_recipe_id: Option<String>,
    pub auto_added_at: Option<i64>,
    pub created_by: String,
    pub created_at: i64,
}

impl ShoppingItem {
    pub fn is_pending(&self) -> bool {
        self.auto_added && self.pending_confirmation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub household_id: String,
    pub title: String,
    pub total_items: i64,
    pub completed_items: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListCounts {
    pub total_items: i64,
    pub completed_items: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub household_id: String,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
    pub created_at: i64,
}

#[derive(FromRow)]
pub(crate) struct RecipeRow {
    pub id: String,
    pub household_id: String,
    pub title: String,
    pub ingredients: String,
    pub created_at: i64,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            ingredients: Ingredient::list_from_json(&row.ingredients),
            id: row.id,
            household_id: row.household_id,
            title: row.title,
            created_at: row.created_at,
        }
    }
}
