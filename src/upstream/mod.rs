mod client;
mod types;

pub use client::ProviderClient;
pub use types::{
    ExtendedIngredient, IngredientHit, IngredientInformation, Nutrient, RandomRecipe,
    RecipeSummary, SimilarRecipeItem, SubstitutesResponse,
};
