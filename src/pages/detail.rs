//! Recipe detail page with edit and delete actions.

use std::fmt::Write as _;

use crate::client::{ApiError, Recipe, RecipeApi, RecipeId};
use crate::pages::format_date;
use crate::router::Route;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this recipe?";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Recipe),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct DetailPage {
    id: RecipeId,
    state: DetailState,
    confirming_delete: bool,
    deleting: bool,
    error: Option<String>,
}

impl DetailPage {
    pub fn new(id: RecipeId) -> Self {
        Self {
            id,
            state: DetailState::Loading,
            confirming_delete: false,
            deleting: false,
            error: None,
        }
    }

    pub fn id(&self) -> RecipeId {
        self.id
    }

    pub async fn mount<A: RecipeApi>(&mut self, api: &A) {
        let result = api.get_one(self.id).await;
        self.apply(result);
    }

    /// A 404 renders plainly as not found; other failures also add a notice.
    pub fn apply(&mut self, result: Result<Recipe, ApiError>) {
        match result {
            Ok(recipe) => {
                self.error = None;
                self.state = DetailState::Loaded(recipe);
            }
            Err(e) => {
                tracing::error!("Error fetching recipe {}: {}", self.id, e);
                if !e.is_not_found() {
                    self.error = Some(format!("Could not load recipe: {}", e.user_message()));
                }
                self.state = DetailState::NotFound;
            }
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.state {
            DetailState::Loaded(recipe) => Some(recipe),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn edit_route(&self) -> Route {
        Route::Edit(self.id)
    }

    /// Starts the delete confirmation step. Returns the prompt to show, or
    /// `None` when there is no loaded recipe to delete.
    pub fn request_delete(&mut self) -> Option<&'static str> {
        self.recipe()?;
        if self.deleting {
            return None;
        }
        self.confirming_delete = true;
        Some(DELETE_PROMPT)
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Issues the delete once the user has confirmed. Returns the route to
    /// navigate to on success.
    pub async fn confirm_delete<A: RecipeApi>(&mut self, api: &A) -> Option<Route> {
        let id = self.begin_delete()?;
        let result = api.delete(id).await;
        self.finish_delete(result)
    }

    /// Marks a confirmed delete as in flight and returns the id to delete.
    /// `None` unless the user is confirming.
    pub fn begin_delete(&mut self) -> Option<RecipeId> {
        if !self.confirming_delete || self.deleting {
            return None;
        }
        self.confirming_delete = false;
        self.deleting = true;
        self.error = None;
        Some(self.id)
    }

    pub fn finish_delete(&mut self, result: Result<(), ApiError>) -> Option<Route> {
        if !self.deleting {
            return None;
        }
        self.deleting = false;

        match result {
            Ok(()) => Some(Route::List),
            Err(e) => {
                tracing::error!("Error deleting recipe {}: {}", self.id, e);
                self.error = Some(format!("Could not delete recipe: {}", e.user_message()));
                None
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {}", error);
        }

        match &self.state {
            DetailState::Loading => out.push_str("Loading recipe...\n"),
            DetailState::NotFound => out.push_str("Recipe not found\n"),
            DetailState::Loaded(recipe) => {
                let _ = writeln!(out, "# {}", recipe.title);
                out.push_str("\nIngredients\n");
                for ingredient in &recipe.ingredients {
                    let _ = writeln!(out, "  • {} {}", ingredient.quantity, ingredient.name);
                }
                out.push_str("\nInstructions\n");
                for line in recipe.instructions.lines() {
                    let _ = writeln!(out, "  {}", line);
                }
                let _ = writeln!(out, "\nAdded on {}", format_date(&recipe.created_at));

                if self.deleting {
                    out.push_str("\nDeleting...\n");
                } else if self.confirming_delete {
                    let _ = writeln!(out, "\n{} (yes/no)", DELETE_PROMPT);
                } else {
                    out.push_str("\nActions: edit | delete\n");
                }
            }
        }
        out
    }
}
