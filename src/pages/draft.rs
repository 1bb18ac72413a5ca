//! The unsaved recipe a form is editing, and its validation rules.

use thiserror::Error;

use crate::client::{IngredientPayload, Recipe, RecipePayload};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftIngredient {
    pub name: String,
    pub quantity: String,
}

impl DraftIngredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }
}

/// Local copy of a recipe being created or edited.
///
/// Drafts the form starts from hold at least one ingredient entry, possibly
/// blank, and the form never removes the last one. A draft assembled from
/// outside input with [`Draft::new`] holds exactly what it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub instructions: String,
    ingredients: Vec<DraftIngredient>,
}

impl Default for Draft {
    fn default() -> Self {
        Self::blank()
    }
}

/// Validation failures, in the order they are checked.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Recipe title is required")]
    MissingTitle,
    #[error("Recipe instructions are required")]
    MissingInstructions,
    #[error("At least one ingredient is required")]
    NoIngredients,
    #[error("All ingredient fields must be filled out")]
    IncompleteIngredient,
}

impl Draft {
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            instructions: String::new(),
            ingredients: vec![DraftIngredient::default()],
        }
    }

    pub fn new(
        title: impl Into<String>,
        instructions: impl Into<String>,
        ingredients: Vec<DraftIngredient>,
    ) -> Self {
        Self {
            title: title.into(),
            instructions: instructions.into(),
            ingredients,
        }
    }

    /// Prefills a draft for editing; a recipe without ingredients gets one
    /// blank entry.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let mut draft = Self::new(
            recipe.title.clone(),
            recipe.instructions.clone(),
            recipe
                .ingredients
                .iter()
                .map(|i| DraftIngredient::new(i.name.clone(), i.quantity.clone()))
                .collect(),
        );
        if draft.ingredients.is_empty() {
            draft.push_ingredient();
        }
        draft
    }

    pub fn ingredients(&self) -> &[DraftIngredient] {
        &self.ingredients
    }

    pub fn ingredient_mut(&mut self, index: usize) -> Option<&mut DraftIngredient> {
        self.ingredients.get_mut(index)
    }

    pub fn push_ingredient(&mut self) {
        self.ingredients.push(DraftIngredient::default());
    }

    /// Removes the entry at `index` unless it is the last one left.
    pub fn remove_ingredient(&mut self, index: usize) -> bool {
        if self.ingredients.len() < 2 || index >= self.ingredients.len() {
            return false;
        }
        self.ingredients.remove(index);
        true
    }

    /// First rule violated, if any.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.instructions.trim().is_empty() {
            return Err(ValidationError::MissingInstructions);
        }
        if self.ingredients.is_empty() {
            return Err(ValidationError::NoIngredients);
        }
        let incomplete = self
            .ingredients
            .iter()
            .any(|i| i.name.trim().is_empty() || i.quantity.trim().is_empty());
        if incomplete {
            return Err(ValidationError::IncompleteIngredient);
        }
        Ok(())
    }

    /// Request body carrying the draft exactly as typed.
    pub fn to_payload(&self) -> RecipePayload {
        RecipePayload {
            title: self.title.clone(),
            instructions: self.instructions.clone(),
            ingredients: self
                .ingredients
                .iter()
                .map(|i| IngredientPayload {
                    name: i.name.clone(),
                    quantity: i.quantity.clone(),
                })
                .collect(),
        }
    }
}
