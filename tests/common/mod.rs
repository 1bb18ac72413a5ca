#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{TimeZone, Utc};
use recipe_organizer::client::{
    ApiError, Ingredient, Recipe, RecipeApi, RecipeId, RecipePayload,
};
use serde_json::{json, Value};

pub fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn recipe(id: i64, title: &str, category: Option<&str>) -> Recipe {
    Recipe {
        id: RecipeId(id),
        title: title.to_string(),
        instructions: format!("Make the {}.", title.to_lowercase()),
        ingredients: vec![Ingredient {
            id: id * 10,
            name: "Salt".to_string(),
            quantity: "1 pinch".to_string(),
            recipe_id: Some(RecipeId(id)),
        }],
        category: category.map(str::to_string),
        difficulty: None,
        cooking_time: None,
        description: None,
        image_url: None,
        user_id: Some(1),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
    }
}

/// A call the pages made against [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetAll,
    GetOne(RecipeId),
    Create(RecipePayload),
    Update(RecipeId, RecipePayload),
    Delete(RecipeId),
}

/// How [`MockApi`] fails while a failure is set.
#[derive(Debug, Clone)]
pub enum Failure {
    Status(u16, String),
    Network,
}

impl Failure {
    async fn to_error(&self) -> ApiError {
        match self {
            Failure::Status(status, body) => ApiError::Server {
                status: reqwest::StatusCode::from_u16(*status).expect("valid status"),
                body: body.clone(),
            },
            Failure::Network => ApiError::Transport(connect_error().await),
        }
    }
}

/// A genuine connection failure: a request to a port nothing listens on.
pub async fn connect_error() -> reqwest::Error {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let error = reqwest::Client::new()
        .get(format!("http://{}/api/recipes", addr))
        .send()
        .await
        .expect_err("nothing listens on a dropped port");
    assert!(error.is_connect(), "expected a connect error, got {}", error);
    error
}

/// In-memory stand-in for the recipe backend that records every call.
#[derive(Default)]
pub struct MockApi {
    recipes: Mutex<Vec<Recipe>>,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<Failure>>,
    hanging: Mutex<HashSet<RecipeId>>,
    writes_hang: Mutex<bool>,
}

impl MockApi {
    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Mutex::new(recipes),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    /// `get_one(id)` never resolves.
    pub fn hang_on(&self, id: RecipeId) {
        self.hanging.lock().unwrap().insert(id);
    }

    /// `create`, `update` and `delete` never resolve once recorded.
    pub fn hang_writes(&self) {
        *self.writes_hang.lock().unwrap() = true;
    }

    async fn maybe_hang(&self) {
        let hangs = *self.writes_hang.lock().unwrap();
        if hangs {
            std::future::pending::<()>().await;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes.lock().unwrap().clone()
    }

    async fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        let failure = self.failure.lock().unwrap().clone();
        match failure {
            Some(failure) => Err(failure.to_error().await),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Server {
            status: reqwest::StatusCode::NOT_FOUND,
            body: "<h1>Not Found</h1>".to_string(),
        }
    }

    fn build(id: RecipeId, payload: &RecipePayload) -> Recipe {
        let mut built = recipe(id.0, &payload.title, None);
        built.instructions = payload.instructions.clone();
        built.ingredients = payload
            .ingredients
            .iter()
            .enumerate()
            .map(|(n, i)| Ingredient {
                id: id.0 * 10 + n as i64,
                name: i.name.clone(),
                quantity: i.quantity.clone(),
                recipe_id: Some(id),
            })
            .collect();
        built
    }
}

impl RecipeApi for MockApi {
    async fn get_all(&self) -> Result<Vec<Recipe>, ApiError> {
        self.record(Call::GetAll).await?;
        Ok(self.recipes())
    }

    async fn get_one(&self, id: RecipeId) -> Result<Recipe, ApiError> {
        let hangs = self.hanging.lock().unwrap().contains(&id);
        if hangs {
            self.calls.lock().unwrap().push(Call::GetOne(id));
            std::future::pending::<()>().await;
        }
        self.record(Call::GetOne(id)).await?;
        self.recipes()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, payload: &RecipePayload) -> Result<Recipe, ApiError> {
        self.record(Call::Create(payload.clone())).await?;
        self.maybe_hang().await;
        let mut recipes = self.recipes.lock().unwrap();
        let id = RecipeId(recipes.iter().map(|r| r.id.0).max().unwrap_or(0) + 1);
        let created = Self::build(id, payload);
        recipes.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: RecipeId, payload: &RecipePayload) -> Result<Recipe, ApiError> {
        self.record(Call::Update(id, payload.clone())).await?;
        self.maybe_hang().await;
        let mut recipes = self.recipes.lock().unwrap();
        let existing = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(Self::not_found)?;
        let updated = Self::build(id, payload);
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: RecipeId) -> Result<(), ApiError> {
        self.record(Call::Delete(id)).await?;
        self.maybe_hang().await;
        let mut recipes = self.recipes.lock().unwrap();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        if recipes.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

/// A request the fake backend received.
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Store {
    recipes: Vec<Value>,
    next_id: i64,
    received: Vec<Received>,
}

type Shared = Arc<Mutex<Store>>;

/// In-process HTTP backend speaking the recipe API the way the real one does:
/// naive `created_at` timestamps, `{"error": ...}` bodies on 400, an HTML body
/// on 404, and an empty 204 on delete.
pub struct FakeBackend {
    pub base_url: String,
    store: Shared,
}

impl FakeBackend {
    pub async fn start() -> Result<Self> {
        let store: Shared = Arc::new(Mutex::new(Store {
            next_id: 1,
            ..Store::default()
        }));

        let app = Router::new()
            .route("/api/recipes", get(list_recipes).post(create_recipe))
            .route(
                "/api/recipes/:id",
                get(get_recipe).put(update_recipe).delete(delete_recipe),
            )
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}/api", addr),
            store,
        })
    }

    pub fn received(&self) -> Vec<Received> {
        self.store.lock().unwrap().received.clone()
    }

    pub fn recipe_count(&self) -> usize {
        self.store.lock().unwrap().recipes.len()
    }
}

fn record(store: &Shared, method: &'static str, path: String, body: Option<Value>) {
    store
        .lock()
        .unwrap()
        .received
        .push(Received { method, path, body });
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        "<!doctype html>\n<title>404 Not Found</title>\n<h1>Not Found</h1>",
    )
        .into_response()
}

fn ingredients_for(id: i64, data: &Value) -> Option<Vec<Value>> {
    let list = data.get("ingredients")?.as_array()?;
    list.iter()
        .enumerate()
        .map(|(n, i)| {
            Some(json!({
                "id": id * 100 + n as i64,
                "name": i.get("name")?.as_str()?,
                "quantity": i.get("quantity")?.as_str()?,
                "recipe_id": id,
            }))
        })
        .collect()
}

async fn list_recipes(State(store): State<Shared>) -> Response {
    record(&store, "GET", "/api/recipes".into(), None);
    let recipes = store.lock().unwrap().recipes.clone();
    Json(Value::Array(recipes)).into_response()
}

async fn get_recipe(State(store): State<Shared>, Path(id): Path<i64>) -> Response {
    record(&store, "GET", format!("/api/recipes/{}", id), None);
    let store = store.lock().unwrap();
    match store.recipes.iter().find(|r| r["id"] == id) {
        Some(recipe) => Json(recipe.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_recipe(State(store): State<Shared>, Json(data): Json<Value>) -> Response {
    record(&store, "POST", "/api/recipes".into(), Some(data.clone()));
    let mut store = store.lock().unwrap();

    let (Some(title), Some(instructions)) = (data["title"].as_str(), data["instructions"].as_str())
    else {
        return bad_request("Missing required fields");
    };
    if store.recipes.iter().any(|r| r["title"] == title) {
        return bad_request("Title already exists");
    }

    let id = store.next_id;
    let Some(ingredients) = ingredients_for(id, &data) else {
        return bad_request("Invalid ingredient data");
    };
    store.next_id += 1;

    let recipe = json!({
        "id": id,
        "title": title,
        "instructions": instructions,
        "created_at": "2024-05-01T10:00:00.123456",
        "user_id": 1,
        "ingredients": ingredients,
    });
    store.recipes.push(recipe.clone());
    (StatusCode::CREATED, Json(recipe)).into_response()
}

async fn update_recipe(
    State(store): State<Shared>,
    Path(id): Path<i64>,
    Json(data): Json<Value>,
) -> Response {
    record(&store, "PUT", format!("/api/recipes/{}", id), Some(data.clone()));
    let mut store = store.lock().unwrap();

    let Some(recipe) = store.recipes.iter_mut().find(|r| r["id"] == id) else {
        return not_found();
    };
    if let Some(title) = data.get("title") {
        recipe["title"] = title.clone();
    }
    if let Some(instructions) = data.get("instructions") {
        recipe["instructions"] = instructions.clone();
    }
    if data.get("ingredients").is_some() {
        let Some(ingredients) = ingredients_for(id, &data) else {
            return bad_request("Invalid ingredient data");
        };
        recipe["ingredients"] = Value::Array(ingredients);
    }
    Json(recipe.clone()).into_response()
}

async fn delete_recipe(State(store): State<Shared>, Path(id): Path<i64>) -> Response {
    record(&store, "DELETE", format!("/api/recipes/{}", id), None);
    let mut store = store.lock().unwrap();
    let before = store.recipes.len();
    store.recipes.retain(|r| r["id"] != id);
    if store.recipes.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}
