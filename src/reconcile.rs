//! The cache-and-reconcile layer: decides when a query is served from the
//! local store, when to fall through to the upstream provider, and how to
//! merge the two result sets without duplicating rows.

use std::collections::HashSet;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::filters::{PrepTimeBucket, RecipeFilters};
use crate::models::{
    Ingredient, IngredientInfo, IngredientSubstitutes, NewIngredient, NewRecipe,
    NewRecipeIngredient, NewSimilarRecipe, Recipe, RecipeWithSimilar,
};
use crate::upstream::ProviderClient;

const CALORIES_NUTRIENT: &str = "Calories";
const CARBS_NUTRIENT: &str = "Carbohydrates";
const FAT_NUTRIENT: &str = "Fat";
const PROTEIN_NUTRIENT: &str = "Protein";

#[derive(Clone)]
pub struct Engine {
    repo: Repository,
    provider: ProviderClient,
}

impl Engine {
    pub fn new(repo: Repository, provider: ProviderClient) -> Self {
        Self { repo, provider }
    }

    /// Title search: stored matches first, then upstream complexSearch,
    /// persisting anything new. The merged set is keyed by external id with
    /// stored rows taking precedence, ordered local-first, and capped at
    /// `count`. Local hits alone satisfy the request when upstream comes
    /// back empty; NotFound only when both sides are empty.
    pub async fn search_by_title(
        &self,
        title: &str,
        count: u32,
        filters: &RecipeFilters,
    ) -> Result<Vec<Recipe>> {
        let local = self.repo.search_recipes_by_title(title, filters, count).await?;

        let fetched = self.provider.complex_search(title, count).await?;
        if fetched.is_empty() {
            if local.is_empty() {
                return Err(AppError::NotFound(format!("no recipes found for '{title}'")));
            }
            tracing::debug!("Upstream empty for '{title}', serving {} stored rows", local.len());
            return Ok(local);
        }

        let mut merged = local;
        let mut seen: HashSet<i64> = merged.iter().map(|r| r.external_id).collect();

        for item in fetched {
            let stored = self
                .repo
                .upsert_recipe(NewRecipe {
                    external_id: item.id,
                    title: item.title,
                    image: item.image,
                    instructions: String::new(),
                    ingredients: Vec::new(),
                })
                .await?;
            if seen.insert(stored.external_id) {
                merged.push(stored);
            }
        }

        merged.truncate(count as usize);
        Ok(merged)
    }

    /// findByIngredients pass-through: no local-store check, no write-back.
    /// The provider has no server-side ready-time filter, so the prep-time
    /// bucket is applied locally over `readyInMinutes`.
    pub async fn search_by_ingredients(
        &self,
        ingredients: &str,
        count: u32,
        meal_type: Option<&str>,
        diet: Option<&str>,
        prep_time: PrepTimeBucket,
        exclude_ingredients: Option<&str>,
    ) -> Result<Vec<serde_json::Value>> {
        let mut recipes = self
            .provider
            .find_by_ingredients(ingredients, count, meal_type, diet, exclude_ingredients)
            .await?;

        if recipes.is_empty() {
            return Err(AppError::NotFound("no recipes found for those ingredients".to_string()));
        }

        recipes.retain(|recipe| {
            let minutes = recipe
                .get("readyInMinutes")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0);
            prep_time.contains(minutes)
        });

        Ok(recipes)
    }

    /// Similar-recipe lookup. A stored recipe with stored edges is a
    /// terminal cache hit; otherwise resolve the title upstream, cache the
    /// first hit, fetch its similar set, and upsert the edges.
    pub async fn find_similar(&self, title: &str, count: u32) -> Result<RecipeWithSimilar> {
        if let Some(recipe) = self.repo.find_first_recipe_by_title(title).await? {
            let edges = self.repo.similar_recipes_for(recipe.id).await?;
            if !edges.is_empty() {
                return Ok(with_similar(recipe, edges));
            }
        }

        let results = self.provider.complex_search(title, count).await?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("no recipe found for '{title}'")))?;

        let recipe = self
            .repo
            .upsert_recipe(NewRecipe {
                external_id: first.id,
                title: first.title,
                image: first.image,
                instructions: String::new(),
                ingredients: Vec::new(),
            })
            .await?;

        let similar = self.provider.similar_recipes(recipe.external_id, count).await?;
        if similar.is_empty() {
            return Err(AppError::NotFound(format!(
                "no similar recipes found for '{}'",
                recipe.title
            )));
        }

        let edges = self
            .repo
            .upsert_similar_recipes(
                similar
                    .into_iter()
                    .map(|item| NewSimilarRecipe {
                        recipe_id: recipe.id,
                        similar_external_id: item.id,
                        title: item.title,
                        image: item.image,
                    })
                    .collect(),
            )
            .await?;

        Ok(with_similar(recipe, edges))
    }

    /// Random recipes, persisted with their ingredient lines. A failure to
    /// persist one item is logged and skipped rather than failing the whole
    /// batch; successfully stored items come back in upstream order.
    pub async fn fetch_random(&self, count: u32) -> Result<Vec<Recipe>> {
        let fetched = self.provider.random_recipes(count).await?;

        let mut stored = Vec::with_capacity(fetched.len());
        for item in fetched {
            let external_id = item.id;
            let new_recipe = NewRecipe {
                external_id,
                title: item.title,
                image: item.image,
                instructions: item.instructions.unwrap_or_default(),
                ingredients: item
                    .extended_ingredients
                    .into_iter()
                    .map(|line| NewRecipeIngredient {
                        description: line.original,
                        quantity: line.amount.map(|a| a.to_string()),
                        unit: line.unit,
                    })
                    .collect(),
            };

            match self.repo.upsert_recipe(new_recipe).await {
                Ok(recipe) => stored.push(recipe),
                Err(e) => {
                    tracing::warn!("Failed to persist random recipe {external_id}: {e}");
                }
            }
        }

        Ok(stored)
    }

    /// Ingredient search: every upstream hit is reused-or-created in the
    /// cache; the response is this call's hits only, deduplicated by
    /// external id.
    pub async fn search_ingredients(&self, query: &str, count: u32) -> Result<Vec<Ingredient>> {
        let hits = self.provider.search_ingredients(query, count).await?;
        if hits.is_empty() {
            return Err(AppError::NotFound(format!("no ingredients found for '{query}'")));
        }

        let mut seen: HashSet<i64> = HashSet::new();
        let mut ingredients = Vec::with_capacity(hits.len());
        for hit in hits {
            let stored = self
                .repo
                .upsert_ingredient(NewIngredient {
                    external_id: hit.id,
                    name: hit.name,
                    image: hit.image,
                })
                .await?;
            if seen.insert(stored.external_id) {
                ingredients.push(stored);
            }
        }

        Ok(ingredients)
    }

    /// Nutritional summary pass-through, no persistence. Each macro is the
    /// first nutrient whose name matches, `None` when absent.
    pub async fn ingredient_info(&self, external_id: i64) -> Result<IngredientInfo> {
        let info = self.provider.ingredient_information(external_id).await?;
        let nutrients = info.nutrition.unwrap_or_default().nutrients;

        let amount_of = |name: &str| {
            nutrients
                .iter()
                .find(|n| n.name == name)
                .map(|n| n.amount)
        };

        Ok(IngredientInfo {
            id: info.id,
            name: info.name,
            image: info.image,
            calories: amount_of(CALORIES_NUTRIENT),
            carbs: amount_of(CARBS_NUTRIENT),
            fat: amount_of(FAT_NUTRIENT),
            protein: amount_of(PROTEIN_NUTRIENT),
        })
    }

    /// Substitute lookup pass-through.
    pub async fn substitutes(&self, name: &str) -> Result<IngredientSubstitutes> {
        let response = self.provider.ingredient_substitutes(name).await?;
        if response.substitutes.is_empty() {
            return Err(AppError::NotFound(format!("no substitutes found for '{name}'")));
        }

        Ok(IngredientSubstitutes {
            ingredient: name.to_string(),
            substitutes: response.substitutes,
            message: response.message,
        })
    }
}

fn with_similar(recipe: Recipe, edges: Vec<crate::models::SimilarRecipe>) -> RecipeWithSimilar {
    RecipeWithSimilar {
        external_id: recipe.external_id,
        title: recipe.title,
        image: recipe.image,
        ingredients: recipe.ingredients,
        similar_recipes: edges,
    }
}
