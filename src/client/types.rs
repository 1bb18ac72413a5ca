//! Type definitions for the recipe API.
//!
//! This module contains the data structures exchanged with the recipe backend:
//! the recipes and ingredients it returns, and the payload it accepts for
//! creating and updating recipes.
//!
//! ## Key Types
//!
//! - [`Recipe`] - A persisted recipe with its ingredients and metadata
//! - [`Ingredient`] - A persisted ingredient line (name + free-text quantity)
//! - [`RecipePayload`] - Request body for `POST` and `PUT` on the collection
//! - [`RecipeId`] - Opaque, backend-assigned recipe identifier
//!
//! ## API Compatibility
//!
//! The backend serializes `created_at` without a UTC offset (a naive ISO-8601
//! timestamp). [`Recipe`] accepts both that form and RFC 3339, treating naive
//! timestamps as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend-assigned recipe identifier.
///
/// Identifiers are opaque to the client: they are only ever read from backend
/// responses or parsed back out of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecipeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecipeId)
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        RecipeId(id)
    }
}

/// A persisted recipe as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier
    pub id: RecipeId,
    /// Recipe title
    pub title: String,
    /// Multi-line cooking instructions
    pub instructions: String,
    /// Ordered ingredient list
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Category shown as a badge and used by the list filter
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text difficulty (e.g. "Easy")
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Cooking time in minutes
    #[serde(default)]
    pub cooking_time: Option<u32>,
    /// Short description shown on cards
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL shown on cards
    #[serde(default)]
    pub image_url: Option<String>,
    /// Owning user, when the backend reports one
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Creation timestamp, assigned by the backend
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A persisted ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique ingredient identifier
    pub id: i64,
    /// Ingredient name (e.g. "Flour")
    pub name: String,
    /// Free-text quantity (e.g. "2 cups")
    pub quantity: String,
    /// Recipe this ingredient belongs to
    #[serde(default)]
    pub recipe_id: Option<RecipeId>,
}

/// Request body for creating or updating a recipe.
///
/// Used with `POST /recipes` and `PUT /recipes/{id}`. The backend replaces the
/// whole ingredient list on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePayload {
    pub title: String,
    pub instructions: String,
    pub ingredients: Vec<IngredientPayload>,
}

/// One `{name, quantity}` pair inside a [`RecipePayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientPayload {
    pub name: String,
    pub quantity: String,
}

/// Error body the backend sends with failing responses: `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Accepts RFC 3339 timestamps as well as the backend's offset-less
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` form.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}
