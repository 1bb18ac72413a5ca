mod common;

use common::FakeBackend;
use pretty_assertions::assert_eq;
use recipe_organizer::client::{
    ApiError, IngredientPayload, RecipeApi, RecipeClient, RecipeId, RecipePayload,
};
use serde_json::json;

fn pancakes() -> RecipePayload {
    RecipePayload {
        title: "Pancakes".to_string(),
        instructions: "Mix and fry.".to_string(),
        ingredients: vec![IngredientPayload {
            name: "Flour".to_string(),
            quantity: "2 cups".to_string(),
        }],
    }
}

#[tokio::test]
async fn test_create_sends_exact_body() {
    common::init_test_logging();
    let backend = FakeBackend::start().await.expect("fake backend should start");
    let client = RecipeClient::new(backend.base_url.clone());

    let created = client.create(&pancakes()).await.expect("create should succeed");

    assert_eq!(created.id, RecipeId(1));
    assert_eq!(created.title, "Pancakes");
    assert_eq!(created.ingredients[0].quantity, "2 cups");

    let received = backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method, "POST");
    assert_eq!(received[0].path, "/api/recipes");
    assert_eq!(
        received[0].body,
        Some(json!({
            "title": "Pancakes",
            "instructions": "Mix and fry.",
            "ingredients": [{"name": "Flour", "quantity": "2 cups"}]
        }))
    );
}

#[tokio::test]
async fn test_get_all_decodes_backend_timestamps() {
    let backend = FakeBackend::start().await.expect("fake backend should start");
    let client = RecipeClient::new(format!("{}/", backend.base_url));

    client.create(&pancakes()).await.expect("create should succeed");
    let recipes = client.get_all().await.expect("list should succeed");

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].created_at.to_rfc3339(), "2024-05-01T10:00:00.123456+00:00");
}

#[tokio::test]
async fn test_update_replaces_ingredients() {
    let backend = FakeBackend::start().await.expect("fake backend should start");
    let client = RecipeClient::new(backend.base_url.clone());
    let created = client.create(&pancakes()).await.expect("create should succeed");

    let mut payload = pancakes();
    payload.instructions = "Mix, rest, fry.".to_string();
    payload.ingredients.push(IngredientPayload {
        name: "Milk".to_string(),
        quantity: "1 cup".to_string(),
    });
    let updated = client
        .update(created.id, &payload)
        .await
        .expect("update should succeed");

    assert_eq!(updated.instructions, "Mix, rest, fry.");
    let names: Vec<&str> = updated.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Flour", "Milk"]);

    let fetched = client.get_one(created.id).await.expect("get should succeed");
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let backend = FakeBackend::start().await.expect("fake backend should start");
    let client = RecipeClient::new(backend.base_url.clone());
    let created = client.create(&pancakes()).await.expect("create should succeed");

    client.delete(created.id).await.expect("delete should succeed");
    assert_eq!(backend.recipe_count(), 0);

    let err = client.get_one(created.id).await.expect_err("recipe should be gone");
    assert!(err.is_not_found());
    assert_eq!(err.server_message(), None);
    assert_eq!(err.user_message(), "Server error: 404");
}

#[tokio::test]
async fn test_server_error_message_is_passed_through() {
    let backend = FakeBackend::start().await.expect("fake backend should start");
    let client = RecipeClient::new(backend.base_url.clone());
    client.create(&pancakes()).await.expect("first create should succeed");

    let err = client.create(&pancakes()).await.expect_err("duplicate title should fail");

    match &err {
        ApiError::Server { status, .. } => assert_eq!(status.as_u16(), 400),
        other => panic!("expected server error, got {:?}", other),
    }
    assert_eq!(err.user_message(), "Title already exists");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RecipeClient::new(format!("http://{}/api", addr));
    let err = client.get_all().await.expect_err("nothing is listening");

    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    assert_eq!(err.user_message(), "Network error. Please check your connection.");
}

#[tokio::test]
async fn test_mock_network_failure_matches_the_real_client() {
    let api = common::MockApi::default();
    api.fail_with(common::Failure::Network);

    let err = api.get_all().await.expect_err("network failure is set");
    assert!(
        matches!(&err, ApiError::Transport(e) if e.is_connect()),
        "got {:?}",
        err
    );
    assert_eq!(err.user_message(), "Network error. Please check your connection.");
}

#[tokio::test]
async fn test_malformed_base_url_is_a_setup_error() {
    let client = RecipeClient::new("not a url".to_string());
    let err = client.get_all().await.expect_err("url cannot be built");

    assert!(matches!(err, ApiError::Setup(_)), "got {:?}", err);
    assert_eq!(err.user_message(), "An unexpected error occurred.");
}
