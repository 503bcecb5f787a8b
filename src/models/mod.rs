mod ingredient;
mod recipe;

pub use ingredient::{Ingredient, IngredientInfo, IngredientSubstitutes, NewIngredient};
pub use recipe::{
    NewRecipe, NewRecipeIngredient, NewSimilarRecipe, Recipe, RecipeIngredient, RecipeWithSimilar,
    SimilarRecipe,
};
