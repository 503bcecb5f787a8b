use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{AppError, Result};

use super::types::{
    ComplexSearchResponse, IngredientHit, IngredientInformation, IngredientSearchResponse,
    RandomRecipe, RandomRecipesResponse, RecipeSummary, SimilarRecipeItem, SubstitutesResponse,
};

/// HTTP accessor for the upstream recipe-data provider. Holds the API key
/// and base URL explicitly; authentication travels as the `apiKey` query
/// parameter on every request.
#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ProviderClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .connect_timeout(config.upstream_timeout)
            .user_agent("recipebox/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn complex_search(&self, query: &str, number: u32) -> Result<Vec<RecipeSummary>> {
        let response: ComplexSearchResponse = self
            .get_json(
                "/recipes/complexSearch",
                &[
                    ("query", query.to_string()),
                    ("number", number.to_string()),
                ],
            )
            .await?;
        Ok(response.results)
    }

    /// findByIngredients, passed through provider-shaped. Optional filters
    /// the provider supports server-side go out as query parameters.
    pub async fn find_by_ingredients(
        &self,
        ingredients: &str,
        number: u32,
        meal_type: Option<&str>,
        diet: Option<&str>,
        exclude_ingredients: Option<&str>,
    ) -> Result<Vec<serde_json::Value>> {
        let mut params = vec![
            ("ingredients", ingredients.to_string()),
            ("number", number.to_string()),
        ];
        if let Some(diet) = diet {
            params.push(("diet", diet.to_string()));
        }
        // The provider calls the meal type "type".
        if let Some(meal_type) = meal_type {
            params.push(("type", meal_type.to_string()));
        }
        if let Some(exclude) = exclude_ingredients {
            params.push(("excludeIngredients", exclude.to_string()));
        }

        self.get_json("/recipes/findByIngredients", &params).await
    }

    pub async fn similar_recipes(
        &self,
        external_id: i64,
        number: u32,
    ) -> Result<Vec<SimilarRecipeItem>> {
        self.get_json(
            &format!("/recipes/{external_id}/similar"),
            &[("number", number.to_string())],
        )
        .await
    }

    pub async fn random_recipes(&self, number: u32) -> Result<Vec<RandomRecipe>> {
        let response: RandomRecipesResponse = self
            .get_json("/recipes/random", &[("number", number.to_string())])
            .await?;
        Ok(response.recipes)
    }

    pub async fn search_ingredients(&self, query: &str, number: u32) -> Result<Vec<IngredientHit>> {
        let response: IngredientSearchResponse = self
            .get_json(
                "/food/ingredients/search",
                &[
                    ("query", query.to_string()),
                    ("number", number.to_string()),
                ],
            )
            .await?;
        Ok(response.results)
    }

    /// Ingredient detail normalized to amount per 100 g.
    pub async fn ingredient_information(&self, external_id: i64) -> Result<IngredientInformation> {
        self.get_json(
            &format!("/food/ingredients/{external_id}/information"),
            &[
                ("amount", "100".to_string()),
                ("unit", "g".to_string()),
            ],
        )
        .await
    }

    pub async fn ingredient_substitutes(&self, name: &str) -> Result<SubstitutesResponse> {
        self.get_json(
            "/food/ingredients/substitutes",
            &[("ingredientName", name.to_string())],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Upstream returned {status} for {path}");
            return Err(AppError::Upstream(format!("provider returned HTTP {status} for {path}")));
        }

        Ok(response.json().await?)
    }
}
