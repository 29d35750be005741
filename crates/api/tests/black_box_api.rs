use chrono::{Duration as ChronoDuration, Utc};
use clientdesk_auth::{JwtClaims, PrincipalId, Role};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = clientdesk_api::app::build_app(jwt_secret.to_string()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, roles: Vec<Role>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        roles,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn client_payload(name: &str, document_id: &str) -> serde_json::Value {
    json!({
        "name": name,
        "document_id": document_id,
        "contact": {
            "phone": "555-123-4567",
            "email": "contact@example.com"
        },
        "address": {
            "street": "123 Main St",
            "city": "Springfield",
            "state": "IL",
            "postal_code": "62701",
            "country": "US"
        }
    })
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/clients", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Health stays open.
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        roles: vec![Role::new("admin")],
        issued_at: now - ChronoDuration::minutes(20),
        expires_at: now - ChronoDuration::minutes(10),
    };
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .unwrap();

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/clients", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn principal_context_is_derived_from_token() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("admin")]);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["roles"].as_array().unwrap().iter().any(|r| r == "admin"));
}

#[tokio::test]
async fn client_crud_lifecycle() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("admin")]);

    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{}/clients", srv.base_url))
        .bearer_auth(&token)
        .json(&client_payload("Maria Souza", "123.456.789-00"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Maria Souza");
    assert_eq!(created["active"], true);
    assert_eq!(created["created_at"], created["updated_at"]);

    // Read back: every supplied field survives the round trip.
    let res = client
        .get(format!("{}/clients/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["document_id"], "123.456.789-00");
    assert_eq!(fetched["contact"]["email"], "contact@example.com");
    assert_eq!(fetched["address"]["city"], "Springfield");

    // Partial update: only the name changes, updated_at moves.
    let res = client
        .put(format!("{}/clients/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Maria S. Oliveira" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Maria S. Oliveira");
    assert_eq!(updated["document_id"], "123.456.789-00");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);

    // Delete, then both the read and a second delete are 404.
    let res = client
        .delete(format!("{}/clients/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/clients/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/clients/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_document_id_conflicts() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("admin")]);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/clients", srv.base_url))
        .bearer_auth(&token)
        .json(&client_payload("Maria Souza", "11111"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/clients", srv.base_url))
        .bearer_auth(&token)
        .json(&client_payload("Other Person", "11111"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "duplicate");
}

#[tokio::test]
async fn validation_failures_carry_field_details() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("admin")]);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/clients", srv.base_url))
        .bearer_auth(&token)
        .json(&client_payload("Maria Souza", "123"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "document_id"));
}

#[tokio::test]
async fn malformed_and_unknown_ids_are_both_not_found() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("admin")]);

    let client = reqwest::Client::new();
    for id in ["not-a-valid-id", "0198b2c0-0000-7000-8000-000000000000"] {
        let res = client
            .get(format!("{}/clients/{}", srv.base_url, id))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "id {id:?}");
    }
}

#[tokio::test]
async fn empty_update_is_rejected_as_a_caller_error() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("admin")]);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/clients", srv.base_url))
        .bearer_auth(&token)
        .json(&client_payload("Maria Souza", "11111"))
        .send()
        .await
        .unwrap();
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/clients/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn listing_filters_pagination_and_count() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, vec![Role::new("admin")]);

    let client = reqwest::Client::new();
    for (name, doc, active) in [
        ("John Doe", "10001", true),
        ("Jane Smith", "10002", true),
        ("Bob Johnson", "10003", false),
    ] {
        let mut payload = client_payload(name, doc);
        payload["active"] = json!(active);
        let res = client
            .post(format!("{}/clients", srv.base_url))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Case-insensitive substring filter.
    let res = client
        .get(format!("{}/clients?name=jo", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let mut names: Vec<String> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Bob Johnson", "John Doe"]);

    // Dedicated name search comes back name-ascending.
    let res = client
        .get(format!("{}/clients/search?name=jo", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bob Johnson", "John Doe"]);

    // Counts with and without the active filter.
    let res = client
        .get(format!("{}/clients/count", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["count"], 3);

    let res = client
        .get(format!("{}/clients/count?active=false", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["count"], 1);

    // Pagination bounds the page, not the count.
    let res = client
        .get(format!("{}/clients?skip=1&limit=1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}
