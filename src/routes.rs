use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::filters::{split_csv, PrepTimeBucket, RecipeFilters};
use crate::models::{Ingredient, IngredientInfo, IngredientSubstitutes, Recipe, RecipeWithSimilar};
use crate::state::AppState;

const DEFAULT_RECIPE_COUNT: u32 = 5;
const INGREDIENT_SEARCH_MIN: u32 = 10;
const INGREDIENT_SEARCH_MAX: u32 = 50;
const RANDOM_MIN: u32 = 1;
const RANDOM_MAX: u32 = 20;

pub async fn welcome_handler() -> Json<serde_json::Value> {
    Json(json!({"message": "recipebox is running"}))
}

#[derive(Deserialize)]
pub struct IngredientSearchParams {
    query: String,
    number: Option<u32>,
}

pub async fn ingredient_search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IngredientSearchParams>,
) -> Result<Json<Vec<Ingredient>>> {
    let number = params.number.unwrap_or(INGREDIENT_SEARCH_MIN);
    validate_range("number", number, INGREDIENT_SEARCH_MIN, INGREDIENT_SEARCH_MAX)?;

    let ingredients = state.engine.search_ingredients(&params.query, number).await?;
    Ok(Json(ingredients))
}

pub async fn ingredient_info_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<IngredientInfo>> {
    let info = state.engine.ingredient_info(id).await?;
    Ok(Json(info))
}

pub async fn ingredient_substitutes_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<IngredientSubstitutes>> {
    let substitutes = state.engine.substitutes(&name).await?;
    Ok(Json(substitutes))
}

#[derive(Deserialize)]
pub struct RecipeSearchParams {
    number: Option<u32>,
    meal_type: Option<String>,
    diet: Option<String>,
    prep_time: Option<String>,
    exclude_ingredients: Option<String>,
}

pub async fn recipe_search_handler(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    Query(params): Query<RecipeSearchParams>,
) -> Result<Json<Vec<Recipe>>> {
    let filters = RecipeFilters::new(
        params.meal_type,
        params.diet,
        params.prep_time.as_deref(),
        params
            .exclude_ingredients
            .as_deref()
            .map(split_csv)
            .unwrap_or_default(),
    );
    let number = params.number.unwrap_or(DEFAULT_RECIPE_COUNT);

    let recipes = state.engine.search_by_title(&title, number, &filters).await?;
    Ok(Json(recipes))
}

#[derive(Deserialize)]
pub struct ByIngredientsParams {
    ingredients: String,
    number: Option<u32>,
    meal_type: Option<String>,
    diet: Option<String>,
    prep_time: Option<String>,
    exclude_ingredients: Option<String>,
}

pub async fn recipes_by_ingredients_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByIngredientsParams>,
) -> Result<Json<Vec<serde_json::Value>>> {
    let recipes = state
        .engine
        .search_by_ingredients(
            &params.ingredients,
            params.number.unwrap_or(DEFAULT_RECIPE_COUNT),
            params.meal_type.as_deref(),
            params.diet.as_deref(),
            PrepTimeBucket::parse(params.prep_time.as_deref()),
            params.exclude_ingredients.as_deref(),
        )
        .await?;
    Ok(Json(recipes))
}

#[derive(Deserialize)]
pub struct SimilarParams {
    title: String,
    number: Option<u32>,
}

/// The path id is part of the route shape but the lookup is title-driven.
pub async fn similar_recipes_handler(
    State(state): State<Arc<AppState>>,
    Path(_id): Path<i64>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<RecipeWithSimilar>> {
    let number = params.number.unwrap_or(DEFAULT_RECIPE_COUNT);
    let result = state.engine.find_similar(&params.title, number).await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct RandomParams {
    number: Option<u32>,
}

pub async fn random_recipes_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomParams>,
) -> Result<Json<Vec<Recipe>>> {
    let number = params.number.unwrap_or(DEFAULT_RECIPE_COUNT);
    validate_range("number", number, RANDOM_MIN, RANDOM_MAX)?;

    let recipes = state.engine.fetch_random(number).await?;
    Ok(Json(recipes))
}

// Stub endpoints kept from the original surface, out of core scope.

pub async fn menu_handler() -> Json<serde_json::Value> {
    Json(json!({"message": "Meal plan endpoint"}))
}

pub async fn products_handler() -> Json<serde_json::Value> {
    Json(json!({"message": "Product search endpoint"}))
}

pub async fn wine_handler() -> Json<serde_json::Value> {
    Json(json!({"message": "Wine endpoint"}))
}

fn validate_range(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}
