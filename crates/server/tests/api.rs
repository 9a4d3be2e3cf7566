use auth::TokenService;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use engine::Engine;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use server::{ServerState, router};

const SECRET: &[u8] = b"test-secret";

struct TestApp {
    router: Router,
    state: ServerState,
}

async fn test_app() -> TestApp {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let tokens = TokenService::with_hs256(SECRET).unwrap();
    let state = ServerState::new(engine, tokens);
    TestApp {
        router: router(state.clone()),
        state,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn raw(&self, uri: &str, token: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, token, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Register `username` and return a bearer token for it.
    async fn signup(&self, username: &str) -> String {
        let credentials = json!({ "username": username, "password": "pw" });
        let (status, _) = self
            .json("POST", "/api/register", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .json("POST", "/api/login", None, Some(credentials))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create(&self, token: &str, title: &str, amount: f64, category: &str) -> i64 {
        let (status, body) = self
            .json(
                "POST",
                "/api/expenses",
                Some(token),
                Some(json!({
                    "title": title,
                    "amount": amount,
                    "category": category,
                    "date": "2024-06-10T12:00:00Z",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn register_login_and_duplicate() {
    let app = test_app().await;

    let credentials = json!({ "username": "alice", "password": "pw" });
    let (status, body) = app
        .json("POST", "/api/register", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["is_premium"], false);

    let (status, _) = app
        .json("POST", "/api/register", None, Some(credentials.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .json("POST", "/api/login", None, Some(credentials))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["expires_in"], 24 * 3600);

    let (status, body) = app
        .json(
            "POST",
            "/api/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not authenticated");
}

#[tokio::test]
async fn protected_routes_reject_bad_credentials() {
    let app = test_app().await;
    let token = app.signup("alice").await;

    let (status, body) = app.json("GET", "/api/expenses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not authenticated");

    for header_value in [token.clone(), format!("Bearer {token} extra"), "Bearer ".to_string()] {
        let request = Request::builder()
            .uri("/api/expenses")
            .header(header::AUTHORIZATION, header_value)
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let (status, _) = app
        .json("GET", "/api/expenses", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = TokenService::with_hs256(b"other-secret")
        .unwrap()
        .issue(1)
        .unwrap();
    let (status, _) = app.json("GET", "/api/expenses", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = app
        .state
        .tokens
        .issue_at(1, Utc::now() - Duration::hours(48))
        .unwrap();
    let (status, _) = app.json("GET", "/api/expenses", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.json("GET", "/api/expenses", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn create_validates_category() {
    let app = test_app().await;
    let token = app.signup("alice").await;

    let (status, body) = app
        .json(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({ "title": "x", "amount": 1.0, "category": "Food" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "category");

    let (status, body) = app
        .json(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({ "title": "Bread", "amount": 3.0, "category": "Groceries" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["category"], "Groceries");
    assert_eq!(body["data"]["title"], "Bread");
}

#[tokio::test]
async fn records_are_owner_scoped() {
    let app = test_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let id = app.create(&alice, "Rent", 500.0, "Utilities").await;

    let (status, body) = app.json("GET", "/api/expenses", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let uri = format!("/api/expenses/{id}");
    let (status, body) = app
        .json("PUT", &uri, Some(&bob), Some(json!({ "title": "mine" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "expense not found or unauthorized");

    let (status, _) = app.json("DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.json("DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "Expense deleted");

    let (status, _) = app.json("DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_ignores_owner_in_payload() {
    let app = test_app().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let id = app.create(&alice, "Jacket", 60.0, "Clothing").await;

    let (_, body) = app.json("GET", "/api/expenses", Some(&alice), None).await;
    let alice_id = body["data"][0]["user_id"].clone();

    let (status, body) = app
        .json(
            "PUT",
            &format!("/api/expenses/{id}"),
            Some(&alice),
            Some(json!({ "amount": 55.0, "category": "", "user_id": 999 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], alice_id);
    assert_eq!(body["data"]["amount"], 55.0);
    assert_eq!(body["data"]["category"], "Clothing");

    let (_, body) = app.json("GET", "/api/expenses", Some(&bob), None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn list_applies_custom_filter() {
    let app = test_app().await;
    let token = app.signup("alice").await;
    app.create(&token, "June", 10.0, "Leisure").await;

    let (status, body) = app
        .json(
            "GET",
            "/api/expenses?filter=custom&start_date=2024-06-10&end_date=2024-06-10",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .json(
            "GET",
            "/api/expenses?filter=custom&start_date=2024-06-11&end_date=2024-06-30",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["data"], json!([]));

    let (status, body) = app
        .json(
            "GET",
            "/api/expenses?filter=custom&start_date=junk&end_date=2024-06-30",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "start_date");
}

#[tokio::test]
async fn stats_require_premium() {
    let app = test_app().await;
    let token = app.signup("alice").await;
    app.create(&token, "Apples", 10.0, "Groceries").await;
    app.create(&token, "Bread", 5.5, "Groceries").await;
    app.create(&token, "Cinema", 20.0, "Leisure").await;

    let (status, body) = app
        .json("GET", "/api/expenses/stats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "This is a Premium feature. Please upgrade!");

    let (status, _) = app.send("GET", "/api/expenses/export", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.state
        .engine
        .set_premium("alice", true, None)
        .await
        .unwrap();

    let (status, body) = app
        .json("GET", "/api/expenses/stats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "category": "Groceries", "total": 15.5 },
            { "category": "Leisure", "total": 20.0 },
        ])
    );
}

#[tokio::test]
async fn stats_for_unknown_account_is_unauthenticated() {
    let app = test_app().await;
    let token = app.state.tokens.issue(4242).unwrap();

    let (status, _) = app
        .json("GET", "/api/expenses/stats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn export_writes_csv() {
    let app = test_app().await;
    let token = app.signup("alice").await;
    let id = app.create(&token, "Headphones", 49.9, "Electronics").await;
    app.state
        .engine
        .set_premium("alice", true, None)
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/api/expenses/export")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment;filename=expenses.csv"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(
        text,
        format!("ID,Date,Category,Title,Amount\n{id},2024-06-10,Electronics,Headphones,49.90\n")
    );
}

#[tokio::test]
async fn malformed_payloads_use_the_error_envelope() {
    let app = test_app().await;
    let token = app.signup("alice").await;

    let (status, body) = app
        .json(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({ "title": "x", "category": "Groceries" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "amount");
    assert!(body["error"].is_string());

    let (status, body) = app.raw("/api/expenses", &token, "{not json").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "body");

    let (status, body) = app
        .json(
            "POST",
            "/api/register",
            None,
            Some(json!({ "username": "bob" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "password");

    let (_, body) = app.json("GET", "/api/expenses", Some(&token), None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn non_numeric_id_is_a_validation_error() {
    let app = test_app().await;
    let token = app.signup("alice").await;

    let (status, body) = app
        .json(
            "PUT",
            "/api/expenses/abc",
            Some(&token),
            Some(json!({ "title": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field"].is_string());
    assert!(body["error"].is_string());

    let (status, _) = app
        .json("DELETE", "/api/expenses/abc", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn write_with_unknown_account_is_unauthenticated() {
    let app = test_app().await;
    let token = app.state.tokens.issue(4242).unwrap();

    let (status, body) = app
        .json(
            "POST",
            "/api/expenses",
            Some(&token),
            Some(json!({ "title": "x", "amount": 1.0, "category": "Others" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not authenticated");
}

#[tokio::test]
async fn update_persists_the_date() {
    let app = test_app().await;
    let token = app.signup("alice").await;
    let id = app.create(&token, "Lamp", 30.0, "Electronics").await;

    let (status, _) = app
        .json(
            "PUT",
            &format!("/api/expenses/{id}"),
            Some(&token),
            Some(json!({ "date": "2024-01-02T03:04:05Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.json("GET", "/api/expenses", Some(&token), None).await;
    let stored = DateTime::parse_from_rfc3339(body["data"][0]["date"].as_str().unwrap()).unwrap();
    let expected = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z").unwrap();
    assert_eq!(stored, expected);
    assert_eq!(body["data"][0]["title"], "Lamp");
}
