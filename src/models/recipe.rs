use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached recipe row. `external_id` is the upstream provider's identifier
/// and the only stable cross-call join key.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub external_id: i64,
    pub title: String,
    pub image: String,
    pub instructions: String,
    /// Legacy marker, always true once persisted.
    pub cached: bool,
    pub meal_type: Option<String>,
    pub diet: Option<String>,
    pub prep_time: Option<i64>,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<RecipeIngredient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub description: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Directed edge from a cached recipe to another recipe known only by its
/// external id, with a denormalized title/image snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarRecipe {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(skip_serializing)]
    pub recipe_id: i64,
    pub similar_external_id: i64,
    pub title: String,
    pub image: Option<String>,
}

/// Response shape for the similar-recipes endpoint: the anchor recipe plus
/// its edge set.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeWithSimilar {
    pub external_id: i64,
    pub title: String,
    pub image: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub similar_recipes: Vec<SimilarRecipe>,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub external_id: i64,
    pub title: String,
    pub image: String,
    pub instructions: String,
    pub ingredients: Vec<NewRecipeIngredient>,
}

#[derive(Debug, Clone)]
pub struct NewRecipeIngredient {
    pub description: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSimilarRecipe {
    pub recipe_id: i64,
    pub similar_external_id: i64,
    pub title: String,
    pub image: Option<String>,
}
