//! Recipe list page: every recipe as a card, with local search and category
//! filtering.

use std::fmt::Write as _;

use crate::client::{ApiError, Recipe, RecipeApi};
use crate::pages::format_date;

/// Categories offered by the filter bar, in display order.
pub const CATEGORIES: [&str; 5] = ["All", "Main Course", "Appetizers", "Desserts", "Beverages"];

const FEATURED_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (any case) selects everything. A name from [`CATEGORIES`] is
    /// taken in its listed spelling whatever case it was typed in; any other
    /// name is matched exactly.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return CategoryFilter::All;
        }
        let name = CATEGORIES
            .iter()
            .find(|c| c.eq_ignore_ascii_case(raw))
            .copied()
            .unwrap_or(raw);
        CategoryFilter::Only(name.to_string())
    }

    fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => recipe.category.as_deref() == Some(category.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Recipe>),
}

#[derive(Debug, Clone)]
pub struct ListPage {
    state: ListState,
    search: String,
    category: CategoryFilter,
    error: Option<String>,
}

impl Default for ListPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ListPage {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
            search: String::new(),
            category: CategoryFilter::All,
            error: None,
        }
    }

    /// Fetches the collection and applies the result.
    pub async fn mount<A: RecipeApi>(&mut self, api: &A) {
        let result = api.get_all().await;
        self.apply(result);
    }

    pub fn apply(&mut self, result: Result<Vec<Recipe>, ApiError>) {
        match result {
            Ok(recipes) => {
                self.error = None;
                self.state = ListState::Loaded(recipes);
            }
            Err(e) => {
                tracing::error!("Error fetching recipes: {}", e);
                self.error = Some(format!("Could not load recipes: {}", e.user_message()));
                self.state = ListState::Loaded(Vec::new());
            }
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    /// Every fetched recipe, unfiltered.
    pub fn recipes(&self) -> &[Recipe] {
        match &self.state {
            ListState::Loading => &[],
            ListState::Loaded(recipes) => recipes,
        }
    }

    /// Recipes matching the search text (case-insensitive title substring)
    /// and the selected category.
    pub fn visible(&self) -> Vec<&Recipe> {
        let needle = self.search.to_lowercase();
        self.recipes()
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .filter(|r| self.category.matches(r))
            .collect()
    }

    pub fn featured(&self) -> &[Recipe] {
        let recipes = self.recipes();
        &recipes[..recipes.len().min(FEATURED_COUNT)]
    }

    pub fn render(&self) -> String {
        if self.is_loading() {
            return "Loading recipes...\n".to_string();
        }

        let mut out = String::new();
        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {}", error);
        }

        let recipes = self.recipes();
        if recipes.is_empty() {
            if self.error.is_none() {
                out.push_str("No recipes yet!\nAdd your first recipe: go /add-recipe\n");
            }
            return out;
        }

        out.push_str("== Featured Recipes ==\n");
        for recipe in self.featured() {
            let _ = writeln!(out, "  [{}] {}", recipe.id, recipe.title);
            if let Some(description) = &recipe.description {
                let _ = writeln!(out, "      {}", description);
            }
        }
        out.push('\n');

        out.push_str("== All Recipes ==\n");
        let selected = match &self.category {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.as_str(),
        };
        let categories: Vec<String> = CATEGORIES
            .iter()
            .map(|c| {
                if *c == selected {
                    format!("[{}]", c)
                } else {
                    c.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "Categories: {}", categories.join(" | "));
        if !self.search.is_empty() {
            let _ = writeln!(out, "Search: \"{}\"", self.search);
        }

        let visible = self.visible();
        if visible.is_empty() {
            out.push_str("No recipes found matching your search.\n");
            return out;
        }

        for recipe in visible {
            render_card(&mut out, recipe);
        }
        out
    }
}

fn render_card(out: &mut String, recipe: &Recipe) {
    let badges: Vec<&str> = [recipe.category.as_deref(), recipe.difficulty.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    let _ = writeln!(out, "- [{}] {}", recipe.id, recipe.title);
    if !badges.is_empty() {
        let _ = writeln!(out, "    {}", badges.join(" · "));
    }
    if let Some(description) = &recipe.description {
        let _ = writeln!(out, "    {}", description);
    }
    let time = match recipe.cooking_time {
        Some(minutes) => format!("{} mins", minutes),
        None => "Time not specified".to_string(),
    };
    let _ = writeln!(out, "    {} · Added {}", time, format_date(&recipe.created_at));
}
