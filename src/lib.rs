//! # Recipe Organizer
//!
//! A client for a recipe REST backend. It provides list, detail and
//! create/edit pages over the backend's `/recipes` collection, and two ways to
//! drive them:
//!
//! ## Client Module
//!
//! The [`client`] module is a thin HTTP client for the recipe collection, with
//! a single interception point that logs every failed call.
//!
//! ## Pages
//!
//! The [`pages`] module holds the headless view models: the filtered recipe
//! list, the recipe detail page with confirmed delete, and the create/edit form
//! with its validation and submission state machine. [`app`] switches between
//! them as the user navigates between [`router`] routes.
//!
//! ## Front Ends
//!
//! [`shell`] is an interactive terminal client; [`server`] exposes the same
//! pages as MCP tools for AI assistants.
//!
//! ## Quick Start
//!
//! ```no_run
//! use recipe_organizer::{App, RecipeClient, Route};
//!
//! # async fn example() {
//! let client = RecipeClient::new("http://localhost:5000/api".to_string());
//! let mut app = App::new(client);
//!
//! app.open(Route::List).await;
//! println!("{}", app.render());
//! # }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod pages;
pub mod router;
pub mod server;
pub mod shell;

pub use app::App;
pub use client::{RecipeApi, RecipeClient};
pub use router::Route;
pub use server::RecipeMcpServer;
