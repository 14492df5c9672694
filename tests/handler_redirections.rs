mod common;

use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use redirector::api::handlers::{health_handler, redirect_handler};
use redirector::api::routes::api_routes;
use serde_json::{Value, json};

fn server(app: &common::TestApp) -> TestServer {
    let router = Router::new()
        .route("/{key}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(app.state.clone());

    TestServer::new(router).unwrap()
}

async fn create(server: &TestServer, location: &str) -> String {
    let response = server
        .post("/api/redirections")
        .json(&json!({ "location": location }))
        .await;

    assert_eq!(response.status_code(), 201);
    response.json::<Value>()["key"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_redirection() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let response = server
        .post("/api/redirections")
        .json(&json!({ "location": "https://example.com/target" }))
        .await;

    assert_eq!(response.status_code(), 201);

    let body: Value = response.json();
    let key = body["key"].as_str().unwrap();
    assert_eq!(key.len(), 6);
    assert_eq!(body["location"], "https://example.com/target");
    assert_eq!(body["_links"]["consume"]["href"], format!("/{key}"));
    assert_eq!(response.header("location"), format!("/{key}").as_str());
}

#[tokio::test]
async fn test_create_redirection_invalid_location() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let response = server
        .post("/api/redirections")
        .json(&json!({ "location": "not-a-url" }))
        .await;

    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");

    let list: Value = server.get("/api/redirections").await.json();
    assert_eq!(list["items"], json!([]));
}

#[tokio::test]
async fn test_create_redirection_rejects_control_characters() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let response = server
        .post("/api/redirections")
        .json(&json!({ "location": "http://example.com/a\nb" }))
        .await;

    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");

    let list: Value = server.get("/api/redirections").await.json();
    assert_eq!(list["items"], json!([]));
}

#[tokio::test]
async fn test_redirect_and_count() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let key = create(&server, "https://example.com/target").await;

    for _ in 0..3 {
        let response = server.get(&format!("/{key}")).await;
        assert_eq!(response.status_code(), 307);
        assert_eq!(response.header("location"), "https://example.com/target");
    }

    // created + 3 reads
    app.wait_for_events(4).await;

    let response = server.get(&format!("/api/redirections/{key}/count")).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["count"], 3);
    assert_eq!(
        body["_links"]["parent"]["href"],
        format!("/api/redirections/{key}")
    );
}

#[tokio::test]
async fn test_count_of_fresh_redirection_is_zero() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let key = create(&server, "https://example.com").await;
    app.wait_for_events(1).await;

    let body: Value = server
        .get(&format!("/api/redirections/{key}/count"))
        .await
        .json();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_get_redirection_does_not_count_visit() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let key = create(&server, "https://example.com").await;

    let response = server.get(&format!("/api/redirections/{key}")).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["location"], "https://example.com");

    app.wait_for_events(1).await;
    let body: Value = server
        .get(&format!("/api/redirections/{key}/count"))
        .await
        .json();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_delete_redirection() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let key = create(&server, "https://example.com").await;

    let response = server.delete(&format!("/api/redirections/{key}")).await;
    assert_eq!(response.status_code(), 204);

    let response = server.get(&format!("/{key}")).await;
    assert_eq!(response.status_code(), 404);

    let response = server.delete(&format!("/api/redirections/{key}")).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_unknown_key() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let response = server.get("/nokey1").await;
    assert_eq!(response.status_code(), 404);

    let response = server.get("/api/redirections/nokey1/count").await;
    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_list_redirections() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let first = create(&server, "https://example.com/1").await;
    let second = create(&server, "https://example.com/2").await;

    let response = server.get("/api/redirections").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["_links"]["self"]["href"], "/api/redirections");

    let mut keys: Vec<String> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["key"].as_str().unwrap().to_string())
        .collect();
    keys.sort();

    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn test_health() {
    let app = common::create_test_app(common::TEST_SEED);
    let server = server(&app);

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "healthy");

    app.dispatcher.shutdown().await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["dispatcher"]["status"], "error");
}
