//! # Recipe API Client
//!
//! This module provides a thin HTTP client for the recipe backend's REST
//! collection endpoint (`/recipes`), plus the [`RecipeApi`] trait the pages are
//! written against.
//!
//! ## Modules
//!
//! - [`client`] - [`RecipeApi`] and its `reqwest` implementation, [`RecipeClient`]
//! - [`error`] - [`ApiError`] and user-facing message extraction
//! - [`types`] - Recipes, ingredients and request payloads
//!
//! ## Quick Start
//!
//! ```no_run
//! use recipe_organizer::client::{RecipeApi, RecipeClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = RecipeClient::new("http://localhost:5000/api".to_string());
//!
//! let recipes = client.get_all().await?;
//! println!("Found {} recipes", recipes.len());
//! # Ok(())
//! # }
//! ```

#[allow(clippy::module_inception)]
pub mod client;
pub mod error;
pub mod types;

pub use client::{RecipeApi, RecipeClient};
pub use error::ApiError;
pub use types::*;
