use std::future::Future;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::json;

use crate::client::{Recipe, RecipeApi, RecipeClient, RecipeId};
use crate::pages::{
    CategoryFilter, DetailPage, DetailState, Draft, DraftIngredient, FormState, ListPage, Mode,
    RecipeForm, SubmitOutcome,
};

// Parameter structs for tools
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Case-insensitive text to look for in recipe titles
    #[serde(default)]
    pub search: Option<String>,
    /// Exact category name, or "all"
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    pub id: i64,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    pub name: String,
    pub quantity: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    pub title: String,
    pub instructions: String,
    pub ingredients: Vec<IngredientParams>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub ingredients: Vec<IngredientParams>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    pub id: i64,
    /// Must be true for the recipe to actually be deleted
    #[serde(default)]
    pub confirm: bool,
}

fn draft_from_params(
    title: String,
    instructions: String,
    ingredients: Vec<IngredientParams>,
) -> Draft {
    Draft::new(
        title,
        instructions,
        ingredients
            .into_iter()
            .map(|i| DraftIngredient::new(i.name, i.quantity))
            .collect(),
    )
}

fn recipe_json(recipe: &Recipe) -> serde_json::Value {
    json!({
        "id": recipe.id,
        "title": recipe.title,
        "instructions": recipe.instructions,
        "ingredients": recipe.ingredients.iter().map(|i| json!({
            "name": i.name,
            "quantity": i.quantity,
        })).collect::<Vec<_>>(),
        "category": recipe.category,
        "difficulty": recipe.difficulty,
        "cooking_time": recipe.cooking_time,
        "description": recipe.description,
        "created_at": recipe.created_at,
    })
}

fn success(result: serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string());
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn failure(error: &str, details: impl Into<String>) -> Result<CallToolResult, McpError> {
    let error = json!({
        "error": error,
        "details": details.into(),
        "success": false
    });
    Ok(CallToolResult::error(vec![Content::text(error.to_string())]))
}

/// MCP surface over the recipe pages.
///
/// Every tool call mounts a fresh page against the shared client, so tools get
/// exactly the filtering, validation and error messages the terminal shell
/// shows.
#[derive(Clone)]
pub struct RecipeMcpServer {
    client: RecipeClient,
    tool_router: ToolRouter<RecipeMcpServer>,
}

#[tool_router]
impl RecipeMcpServer {
    pub fn new(client: RecipeClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Verifies the backend answers on the collection endpoint.
    pub async fn check_backend(&self) -> Result<usize, anyhow::Error> {
        let recipes = self.client.get_all().await?;
        tracing::info!("Recipe API reachable - found {} recipes", recipes.len());
        Ok(recipes.len())
    }

    #[tool(description = "List recipes, optionally filtered by title text and category")]
    pub async fn list_recipes(
        &self,
        Parameters(params): Parameters<ListRecipesParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut page = ListPage::new();
        page.mount(&self.client).await;

        if let Some(error) = page.error() {
            return failure("Failed to list recipes", error);
        }

        if let Some(search) = params.search {
            page.set_search(search);
        }
        if let Some(category) = params.category.as_deref() {
            page.set_category(CategoryFilter::parse(category));
        }

        let visible = page.visible();
        let result = json!({
            "recipes": visible.iter().map(|recipe| json!({
                "id": recipe.id,
                "title": recipe.title,
                "category": recipe.category,
                "difficulty": recipe.difficulty,
                "cooking_time": recipe.cooking_time,
                "description": recipe.description,
                "created_at": recipe.created_at,
            })).collect::<Vec<_>>(),
            "featured": page.featured().iter().map(|r| r.id).collect::<Vec<_>>(),
            "total_count": page.recipes().len(),
            "message": if visible.is_empty() {
                "No recipes found matching your search.".to_string()
            } else {
                format!("Found {} of {} recipes", visible.len(), page.recipes().len())
            }
        });
        success(result)
    }

    #[tool(description = "Get a recipe with its ingredients and instructions")]
    pub async fn get_recipe(
        &self,
        Parameters(params): Parameters<GetRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut page = DetailPage::new(RecipeId(params.id));
        page.mount(&self.client).await;

        match page.state() {
            DetailState::Loaded(recipe) => success(recipe_json(recipe)),
            _ => failure(
                "Recipe not found",
                page.error().unwrap_or("No recipe with that id").to_string(),
            ),
        }
    }

    #[tool(description = "Create a new recipe with at least one ingredient")]
    pub async fn create_recipe(
        &self,
        Parameters(params): Parameters<CreateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut form = RecipeForm::new(Mode::Create);
        form.set_draft(draft_from_params(params.title, params.instructions, params.ingredients));
        self.submit(form, "Recipe created successfully").await
    }

    #[tool(description = "Replace the title, instructions and ingredients of a recipe")]
    pub async fn update_recipe(
        &self,
        Parameters(params): Parameters<UpdateRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut form = RecipeForm::new(Mode::Edit(RecipeId(params.id)));
        form.mount(&self.client).await;

        if form.state() != FormState::Editing || form.error().is_some() {
            return failure(
                "Failed to load recipe",
                form.error().unwrap_or("Recipe is not editable").to_string(),
            );
        }

        form.set_draft(draft_from_params(params.title, params.instructions, params.ingredients));
        self.submit(form, "Recipe updated successfully").await
    }

    #[tool(description = "Delete a recipe. Nothing is deleted unless confirm is true")]
    pub async fn delete_recipe(
        &self,
        Parameters(params): Parameters<DeleteRecipeParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut page = DetailPage::new(RecipeId(params.id));
        page.mount(&self.client).await;

        let Some(prompt) = page.request_delete() else {
            return failure(
                "Recipe not found",
                page.error().unwrap_or("No recipe with that id").to_string(),
            );
        };

        if !params.confirm {
            page.cancel_delete();
            return success(json!({
                "id": params.id,
                "deleted": false,
                "message": format!("{} Call again with confirm=true to delete.", prompt)
            }));
        }

        match page.confirm_delete(&self.client).await {
            Some(_) => success(json!({
                "id": params.id,
                "deleted": true,
                "message": "Recipe deleted successfully"
            })),
            None => failure(
                "Failed to delete recipe",
                page.error().unwrap_or("Unknown error").to_string(),
            ),
        }
    }
}

impl RecipeMcpServer {
    async fn submit(&self, mut form: RecipeForm, message: &str) -> Result<CallToolResult, McpError> {
        match form.submit(&self.client).await {
            SubmitOutcome::Saved(recipe) => {
                let mut result = recipe_json(&recipe);
                result["success"] = json!(true);
                result["message"] = json!(message);
                success(result)
            }
            SubmitOutcome::Invalid(violation) => failure("Invalid recipe", violation.to_string()),
            SubmitOutcome::Failed(reason) => failure("Failed to save recipe", reason),
            SubmitOutcome::Ignored => failure("Failed to save recipe", "Form is not editable"),
        }
    }
}

#[tool_handler]
impl ServerHandler for RecipeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server manages a recipe collection: list and filter recipes, read a recipe's ingredients and instructions, create and update recipes (title, instructions and at least one ingredient with name and quantity), and delete recipes with explicit confirmation.".to_string()),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
