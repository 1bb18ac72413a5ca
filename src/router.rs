//! User-facing routes.
//!
//! | Path                 | Route                 |
//! |----------------------|-----------------------|
//! | `/`                  | [`Route::List`]       |
//! | `/add-recipe`        | [`Route::Create`]     |
//! | `/edit-recipe/{id}`  | [`Route::Edit`]       |
//! | `/recipe/{id}`       | [`Route::Detail`]     |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::client::RecipeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Edit(RecipeId),
    Detail(RecipeId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no page at '{0}'")]
    UnknownPath(String),
    #[error("'{0}' is not a recipe id")]
    InvalidId(String),
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        let parse_id = |raw: &str| {
            raw.parse::<RecipeId>()
                .map_err(|_| RouteError::InvalidId(raw.to_string()))
        };

        match normalized {
            "/" => Ok(Route::List),
            "/add-recipe" => Ok(Route::Create),
            p => {
                if let Some(raw) = p.strip_prefix("/edit-recipe/") {
                    parse_id(raw).map(Route::Edit)
                } else if let Some(raw) = p.strip_prefix("/recipe/") {
                    parse_id(raw).map(Route::Detail)
                } else {
                    Err(RouteError::UnknownPath(trimmed.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => write!(f, "/"),
            Route::Create => write!(f, "/add-recipe"),
            Route::Edit(id) => write!(f, "/edit-recipe/{}", id),
            Route::Detail(id) => write!(f, "/recipe/{}", id),
        }
    }
}
