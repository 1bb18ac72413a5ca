//! Application shell: routing between pages and driving their fetches.
//!
//! The app owns exactly one page at a time. Navigating replaces the page with a
//! fresh one for the new route; the old page and any fetch it was waiting on
//! are dropped, so a late response can never land on the wrong page.

use std::future::Future;
use std::pin::Pin;

use crate::client::{ApiError, Recipe, RecipeApi};
use crate::pages::{DetailPage, DetailState, FormState, ListPage, Mode, RecipeForm};
use crate::router::Route;

#[derive(Debug, Clone)]
pub enum Page {
    List(ListPage),
    Detail(DetailPage),
    Form(RecipeForm),
}

impl Page {
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::List => Page::List(ListPage::new()),
            Route::Detail(id) => Page::Detail(DetailPage::new(id)),
            Route::Create => Page::Form(RecipeForm::new(Mode::Create)),
            Route::Edit(id) => Page::Form(RecipeForm::new(Mode::Edit(id))),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Page::List(page) => page.render(),
            Page::Detail(page) => page.render(),
            Page::Form(form) => form.render(),
        }
    }
}

/// Result of a page's mount fetch.
#[derive(Debug)]
pub enum Fetched {
    All(Result<Vec<Recipe>, ApiError>),
    One(Result<Recipe, ApiError>),
}

pub type PendingFetch<'a> = Pin<Box<dyn Future<Output = Fetched> + Send + 'a>>;

pub struct App<A> {
    api: A,
    route: Route,
    page: Page,
}

impl<A: RecipeApi> App<A> {
    /// Starts on the list page, not yet loaded.
    pub fn new(api: A) -> Self {
        Self {
            api,
            route: Route::List,
            page: Page::for_route(Route::List),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// The api alongside the page, for page operations that call the backend.
    pub fn split(&mut self) -> (&A, &mut Page) {
        (&self.api, &mut self.page)
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!("Navigating from {} to {}", self.route, route);
        self.route = route;
        self.page = Page::for_route(route);
    }

    /// The fetch the current page is waiting on, if it is still loading.
    pub fn pending_fetch(&self) -> Option<PendingFetch<'_>> {
        let api = &self.api;
        match &self.page {
            Page::List(page) if page.is_loading() => {
                Some(Box::pin(async move { Fetched::All(api.get_all().await) }))
            }
            Page::Detail(page) if matches!(page.state(), DetailState::Loading) => {
                let id = page.id();
                Some(Box::pin(async move { Fetched::One(api.get_one(id).await) }))
            }
            Page::Form(form) if form.state() == FormState::Loading => match form.mode() {
                Mode::Edit(id) => Some(Box::pin(async move { Fetched::One(api.get_one(id).await) })),
                Mode::Create => None,
            },
            _ => None,
        }
    }

    /// Hands a completed fetch to the current page.
    pub fn deliver(&mut self, fetched: Fetched) {
        match (&mut self.page, fetched) {
            (Page::List(page), Fetched::All(result)) => page.apply(result),
            (Page::Detail(page), Fetched::One(result)) => page.apply(result),
            (Page::Form(form), Fetched::One(result)) => form.apply_loaded(result),
            (_, fetched) => {
                tracing::debug!("Discarding fetch result not meant for {}: {:?}", self.route, fetched);
            }
        }
    }

    /// Navigates to `route` and waits for its page to finish loading.
    pub async fn open(&mut self, route: Route) {
        self.navigate(route);
        let fetched = match self.pending_fetch() {
            Some(fetch) => Some(fetch.await),
            None => None,
        };
        if let Some(fetched) = fetched {
            self.deliver(fetched);
        }
    }

    pub fn render(&self) -> String {
        self.page.render()
    }
}
