//! Create/edit recipe form.
//!
//! The form is a small state machine over a local [`Draft`]:
//!
//! ```text
//! Loading ──(fetched)──▶ Editing ──(valid submit)──▶ Submitting ──(ok)──▶ NavigatedAway
//!  (edit only)              ▲  │                          │
//!                           │  └──(invalid: error set)    │
//!                           └─────(failed: error set)─────┘
//! ```
//!
//! Only `Editing` accepts mutations and submits. While `Submitting` a second
//! submit is refused, which is the only duplicate-submission guard.
//!
//! [`RecipeForm::submit`] runs the whole save. Callers that keep rendering
//! while the request is in flight use [`RecipeForm::begin_submit`], send the
//! returned [`PendingSave`] themselves, and hand the result to
//! [`RecipeForm::finish_submit`].

use std::fmt::Write as _;

use crate::client::{ApiError, Recipe, RecipeApi, RecipeId, RecipePayload};
use crate::pages::draft::{Draft, ValidationError};
use crate::router::Route;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load recipe. Please try again.";

/// Whether the form creates a new recipe or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(RecipeId),
}

impl Mode {
    pub fn from_route(route: Route) -> Option<Self> {
        match route {
            Route::Create => Some(Mode::Create),
            Route::Edit(id) => Some(Mode::Edit(id)),
            Route::List | Route::Detail(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Loading,
    Editing,
    Submitting,
    NavigatedAway,
}

/// A single editable input of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Instructions,
    IngredientName(usize),
    IngredientQuantity(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The backend accepted the recipe; the form is done.
    Saved(Recipe),
    /// Validation failed; nothing was sent.
    Invalid(ValidationError),
    /// The request failed; the message is shown on the form.
    Failed(String),
    /// The form was not in a state that accepts a submit.
    Ignored,
}

impl SubmitOutcome {
    pub fn navigate_to(&self) -> Option<Route> {
        match self {
            SubmitOutcome::Saved(_) => Some(Route::List),
            _ => None,
        }
    }
}

/// A validated save, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingSave {
    Create(RecipePayload),
    Update(RecipeId, RecipePayload),
}

impl PendingSave {
    pub async fn send<A: RecipeApi>(&self, api: &A) -> Result<Recipe, ApiError> {
        match self {
            PendingSave::Create(payload) => api.create(payload).await,
            PendingSave::Update(id, payload) => api.update(*id, payload).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecipeForm {
    mode: Mode,
    state: FormState,
    draft: Draft,
    error: Option<String>,
}

impl RecipeForm {
    pub fn new(mode: Mode) -> Self {
        let state = match mode {
            Mode::Create => FormState::Editing,
            Mode::Edit(_) => FormState::Loading,
        };
        Self {
            mode,
            state,
            draft: Draft::blank(),
            error: None,
        }
    }

    /// Loads the recipe being edited. Does nothing in create mode.
    pub async fn mount<A: RecipeApi>(&mut self, api: &A) {
        if let (Mode::Edit(id), FormState::Loading) = (self.mode, self.state) {
            let result = api.get_one(id).await;
            self.apply_loaded(result);
        }
    }

    pub fn apply_loaded(&mut self, result: Result<Recipe, ApiError>) {
        if self.state != FormState::Loading {
            return;
        }
        match result {
            Ok(recipe) => {
                self.draft = Draft::from_recipe(&recipe);
                self.error = None;
            }
            Err(e) => {
                tracing::error!("Error fetching recipe for editing: {}", e);
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        self.state = FormState::Editing;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn add_ingredient(&mut self) -> bool {
        if self.state != FormState::Editing {
            return false;
        }
        self.draft.push_ingredient();
        true
    }

    /// Removes an ingredient entry; refused when it is the only one left.
    pub fn remove_ingredient(&mut self, index: usize) -> bool {
        if self.state != FormState::Editing {
            return false;
        }
        self.draft.remove_ingredient(index)
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.state != FormState::Editing {
            return false;
        }
        let value = value.into();
        match field {
            Field::Title => self.draft.title = value,
            Field::Instructions => self.draft.instructions = value,
            Field::IngredientName(index) => match self.draft.ingredient_mut(index) {
                Some(ingredient) => ingredient.name = value,
                None => return false,
            },
            Field::IngredientQuantity(index) => match self.draft.ingredient_mut(index) {
                Some(ingredient) => ingredient.quantity = value,
                None => return false,
            },
        }
        true
    }

    /// Replaces the whole draft at once, as when the fields arrive together
    /// rather than keystroke by keystroke.
    pub fn set_draft(&mut self, draft: Draft) -> bool {
        if self.state != FormState::Editing {
            return false;
        }
        self.draft = draft;
        true
    }

    /// Validates and, if valid, saves the draft.
    pub async fn submit<A: RecipeApi>(&mut self, api: &A) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(save) => {
                let result = save.send(api).await;
                self.finish_submit(result)
            }
            Err(outcome) => outcome,
        }
    }

    /// Validates the draft and moves the form to `Submitting`.
    ///
    /// On success the save to send is returned; otherwise the outcome that
    /// ended the submit (`Invalid` or `Ignored`).
    pub fn begin_submit(&mut self) -> Result<PendingSave, SubmitOutcome> {
        if self.state != FormState::Editing {
            tracing::debug!("Ignoring submit while form is {:?}", self.state);
            return Err(SubmitOutcome::Ignored);
        }
        self.error = None;

        if let Err(violation) = self.draft.validate() {
            self.error = Some(violation.to_string());
            return Err(SubmitOutcome::Invalid(violation));
        }

        self.state = FormState::Submitting;
        let payload = self.draft.to_payload();
        Ok(match self.mode {
            Mode::Create => PendingSave::Create(payload),
            Mode::Edit(id) => PendingSave::Update(id, payload),
        })
    }

    /// Applies the response to a save started by [`Self::begin_submit`].
    pub fn finish_submit(&mut self, result: Result<Recipe, ApiError>) -> SubmitOutcome {
        if self.state != FormState::Submitting {
            tracing::debug!("Discarding save result while form is {:?}", self.state);
            return SubmitOutcome::Ignored;
        }
        match result {
            Ok(recipe) => {
                self.state = FormState::NavigatedAway;
                SubmitOutcome::Saved(recipe)
            }
            Err(e) => {
                tracing::error!("Error saving recipe: {}", e);
                let message = e.user_message();
                self.error = Some(message.clone());
                self.state = FormState::Editing;
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            Mode::Create => "Add New Recipe",
            Mode::Edit(_) => "Edit Recipe",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.mode, self.state == FormState::Submitting) {
            (Mode::Create, false) => "Save Recipe",
            (Mode::Create, true) => "Saving...",
            (Mode::Edit(_), false) => "Update Recipe",
            (Mode::Edit(_), true) => "Updating...",
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}", self.heading());

        if self.state == FormState::Loading {
            out.push_str("Loading recipe...\n");
            return out;
        }

        let _ = writeln!(out, "Title: {}", self.draft.title);
        out.push_str("Instructions:\n");
        for line in self.draft.instructions.lines() {
            let _ = writeln!(out, "  {}", line);
        }
        out.push_str("Ingredients:\n");
        let removable = self.draft.ingredients().len() > 1;
        for (n, ingredient) in self.draft.ingredients().iter().enumerate() {
            let _ = write!(
                out,
                "  {}. name: {:<20} quantity: {}",
                n + 1,
                ingredient.name,
                ingredient.quantity
            );
            if removable {
                out.push_str("  (remove)");
            }
            out.push('\n');
        }

        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {}", error);
        }
        let disabled = if self.state == FormState::Submitting {
            " (disabled)"
        } else {
            ""
        };
        let _ = writeln!(out, "[{}]{}", self.submit_label(), disabled);
        out
    }
}
