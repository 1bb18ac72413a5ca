//! # Pages
//!
//! Headless view models for the three screens of the app. Each page owns its
//! own copy of the data it fetched, exposes the operations a user can perform,
//! and renders itself to plain text.
//!
//! - [`list`] - all recipes with search and category filtering
//! - [`detail`] - one recipe, with edit and confirmed delete
//! - [`form`] - create/edit form over a [`draft::Draft`]

pub mod detail;
pub mod draft;
pub mod form;
pub mod list;

pub use detail::{DetailPage, DetailState};
pub use draft::{Draft, DraftIngredient, ValidationError};
pub use form::{Field, FormState, Mode, PendingSave, RecipeForm, SubmitOutcome};
pub use list::{CategoryFilter, ListPage, ListState};

use chrono::{DateTime, Utc};

pub(crate) fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}
