//! Command-line and environment configuration.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::client::{ApiError, RecipeClient};

#[derive(Debug, Parser)]
#[command(name = "recipe-organizer")]
#[command(about = "Browse, create, edit and delete recipes on a recipe API")]
#[command(version)]
pub struct Cli {
    /// Root of the recipe API; the collection lives at `<api-url>/recipes`
    #[arg(long, global = true, env = "RECIPES_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// Give up on a request after this many seconds (default: wait forever)
    #[arg(long, global = true, env = "RECIPES_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Interactive terminal client (the default)
    Shell {
        /// Route to open first
        #[arg(long, default_value = "/")]
        start: String,
    },

    /// Serve the recipe pages as MCP tools over SSE
    Serve {
        /// Address to bind the SSE server to
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3001")]
        bind: String,
    },
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn client(&self) -> Result<RecipeClient, ApiError> {
        RecipeClient::with_timeout(self.api_url.clone(), self.timeout())
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Shell {
            start: "/".to_string(),
        })
    }
}
