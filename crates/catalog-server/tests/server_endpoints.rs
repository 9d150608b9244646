use catalog_auth::AuthConfig;
use catalog_server::{AppConfig, build_app};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

fn test_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig::with_secret("endpoint-test-signing-secret-0123456789"),
        ..AppConfig::default()
    }
}

async fn start_server() -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&test_config()).await.expect("build app");

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

async fn register(client: &reqwest::Client, api: &str, email: &str) -> String {
    let resp = client
        .post(format!("{api}/auth/register"))
        .json(&json!({
            "email": email,
            "password": "secret123",
            "firstName": "Test",
            "lastName": "User"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully");
    body["data"]["token"].as_str().unwrap().to_string()
}

fn product_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Solid oak",
        "price": 120.5,
        "stock": 4,
        "category": "Furniture"
    })
}

#[tokio::test]
async fn service_endpoints_work() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["service"], "Catalog API");

    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["cache"], "local");

    // Provided request ids are echoed back
    let resp = client
        .get(format!("{base}/healthz"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "req-123");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn auth_flow() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();
    let api = format!("{base}/api/v1");

    register(&client, &api, "ada@example.com").await;

    // Duplicate email
    let resp = client
        .post(format!("{api}/auth/register"))
        .json(&json!({"email": "ada@example.com", "password": "secret123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User with this email already exists");

    // Invalid registration payload
    let resp = client
        .post(format!("{api}/auth/register"))
        .json(&json!({"email": "nope", "password": "1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    // Login
    let resp = client
        .post(format!("{api}/auth/login"))
        .json(&json!({"email": "ada@example.com", "password": "secret123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["fullName"], "Test User");
    assert_eq!(body["data"]["role"], "User");
    assert!(body["data"]["expiresAt"].is_string());

    let resp = client
        .post(format!("{api}/auth/login"))
        .json(&json!({"email": "ada@example.com", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid email or password");

    // Malformed JSON
    let resp = client
        .post(format!("{api}/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn product_lifecycle() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();
    let api = format!("{base}/api/v1");

    let ada = register(&client, &api, "ada@example.com").await;
    let bob = register(&client, &api, "bob@example.com").await;

    // Anonymous and invalid tokens cannot create
    let resp = client
        .post(format!("{api}/products"))
        .json(&product_body("Desk"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .post(format!("{api}/products"))
        .bearer_auth("not-a-token")
        .json(&product_body("Desk"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Validation
    let resp = client
        .post(format!("{api}/products"))
        .bearer_auth(&ada)
        .json(&json!({"name": "", "price": 0, "stock": -1, "category": "Furniture"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    // Create
    let resp = client
        .post(format!("{api}/products"))
        .bearer_auth(&ada)
        .json(&product_body("Desk"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers()["location"].to_str().unwrap().to_string();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product created successfully");
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(location, format!("/api/v1/products/{id}"));

    // Anonymous reads, with a garbage token treated as anonymous
    let resp = client
        .get(format!("{api}/products?category=furn&pageSize=5"))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 5);

    let resp = client.get(format!("{base}{location}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Desk");
    assert_eq!(body["data"]["userName"], "Test User");

    let resp = client.get(format!("{api}/products/abc")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Ownership and existence
    let resp = client
        .put(format!("{api}/products/{id}"))
        .bearer_auth(&bob)
        .json(&product_body("Stolen"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .put(format!("{api}/products/9999"))
        .bearer_auth(&bob)
        .json(&product_body("Ghost"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product not found");

    // Update is visible on the next read
    let resp = client
        .put(format!("{api}/products/{id}"))
        .bearer_auth(&ada)
        .json(&product_body("Standing desk"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = client
        .get(format!("{api}/products/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["name"], "Standing desk");

    // Mine
    let resp = client
        .get(format!("{api}/products/mine"))
        .bearer_auth(&ada)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let resp = client.get(format!("{api}/products/mine")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Delete
    let resp = client
        .delete(format!("{api}/products/{id}"))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .delete(format!("{api}/products/{id}"))
        .bearer_auth(&ada)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product deleted successfully");

    let resp = client.get(format!("{api}/products/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = client
        .get(format!("{api}/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
