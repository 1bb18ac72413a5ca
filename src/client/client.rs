use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::client::{
    error::ApiError,
    types::*,
};

/// Operations on the recipe collection endpoint.
///
/// Pages depend on this trait rather than on [`RecipeClient`] so they can be
/// driven by any backend, including in-memory fakes.
pub trait RecipeApi: Send + Sync {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Recipe>, ApiError>> + Send;

    fn get_one(&self, id: RecipeId) -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    fn create(&self, payload: &RecipePayload) -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    fn update(
        &self,
        id: RecipeId,
        payload: &RecipePayload,
    ) -> impl Future<Output = Result<Recipe, ApiError>> + Send;

    fn delete(&self, id: RecipeId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// HTTP client for the recipe backend.
///
/// `base_url` points at the API root (e.g. `http://localhost:5000/api`); the
/// collection lives at `{base_url}/recipes`. Cloning is cheap and shares the
/// underlying connection pool.
#[derive(Clone)]
pub struct RecipeClient {
    base_url: String,
    client: Client,
}

impl RecipeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Builds a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: String, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Setup(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/recipes", self.base_url)
    }

    fn recipe_url(&self, id: RecipeId) -> String {
        format!("{}/recipes/{}", self.base_url, id)
    }

    /// Sends a request and intercepts every failure.
    ///
    /// Failures are logged and handed back unchanged: no retries, no
    /// rewriting of the error.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                tracing::error!("Request setup error: {}", e);
                return Err(ApiError::Setup(e.to_string()));
            }
            Err(e) => {
                tracing::error!("Request error (no response received): {}", e);
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        tracing::debug!("{} responded with status {}", response.url(), status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::error!("Response error with status {}: {}", status, body);
            return Err(ApiError::Server { status, body });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse recipe API response: {}", e);
            ApiError::Decode(e.to_string())
        })
    }
}

impl RecipeApi for RecipeClient {
    async fn get_all(&self) -> Result<Vec<Recipe>, ApiError> {
        let url = self.collection_url();
        tracing::debug!("Fetching all recipes: {}", url);

        let response = self.send(self.client.get(&url)).await?;
        let recipes: Vec<Recipe> = Self::decode(response).await?;

        tracing::debug!("Fetched {} recipes", recipes.len());
        Ok(recipes)
    }

    async fn get_one(&self, id: RecipeId) -> Result<Recipe, ApiError> {
        let url = self.recipe_url(id);
        tracing::debug!("Fetching recipe: {}", url);

        let response = self.send(self.client.get(&url)).await?;
        Self::decode(response).await
    }

    async fn create(&self, payload: &RecipePayload) -> Result<Recipe, ApiError> {
        let url = self.collection_url();
        tracing::debug!("Creating recipe '{}'", payload.title);

        let response = self.send(self.client.post(&url).json(payload)).await?;
        let recipe: Recipe = Self::decode(response).await?;

        tracing::info!("Created recipe {} '{}'", recipe.id, recipe.title);
        Ok(recipe)
    }

    async fn update(&self, id: RecipeId, payload: &RecipePayload) -> Result<Recipe, ApiError> {
        let url = self.recipe_url(id);
        tracing::debug!("Updating recipe {}", id);

        let response = self.send(self.client.put(&url).json(payload)).await?;
        let recipe: Recipe = Self::decode(response).await?;

        tracing::info!("Updated recipe {} '{}'", recipe.id, recipe.title);
        Ok(recipe)
    }

    async fn delete(&self, id: RecipeId) -> Result<(), ApiError> {
        let url = self.recipe_url(id);
        tracing::debug!("Deleting recipe {}", id);

        self.send(self.client.delete(&url)).await?;

        tracing::info!("Deleted recipe {}", id);
        Ok(())
    }
}
