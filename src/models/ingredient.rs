use serde::{Deserialize, Serialize};

/// A flat ingredient cache entry, keyed by the provider's external id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub external_id: i64,
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub external_id: i64,
    pub name: String,
    pub image: String,
}

/// Normalized per-100g nutritional summary. Macros are `None` when the
/// provider's nutrient list has no matching entry.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientInfo {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub protein: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientSubstitutes {
    pub ingredient: String,
    pub substitutes: Vec<String>,
    pub message: Option<String>,
}
