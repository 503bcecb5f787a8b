//! Wire types for the upstream provider's JSON responses. Field names
//! mirror the provider's payloads exactly; renames map them onto our
//! conventions.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ComplexSearchResponse {
    #[serde(default)]
    pub results: Vec<RecipeSummary>,
}

/// A recipe as returned by complexSearch and findByIngredients.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct RandomRecipesResponse {
    #[serde(default)]
    pub recipes: Vec<RandomRecipe>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomRecipe {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(rename = "extendedIngredients", default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedIngredient {
    pub original: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarRecipeItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientSearchResponse {
    #[serde(default)]
    pub results: Vec<IngredientHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientHit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct IngredientInformation {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct SubstitutesResponse {
    #[serde(default)]
    pub substitutes: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}
