//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the full router (auth middleware included) against an
//! in-memory database. `spawn_server` runs the real server on an ephemeral
//! port for tests that go through the HTTP client.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use cashflow::config::{AiConfig, AiProvider, Config, GoogleConfig};
use cashflow::db::{create_in_memory_pool, migrations};
use cashflow::server;
use cashflow::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 7070,
        database_path: PathBuf::from(":memory:"),
        migrations_path: PathBuf::from("migrations"),
        client_url: "http://localhost:5173".into(),
        google: None,
        ai: None,
        session_ttl: Duration::from_secs(3600),
    }
}

pub fn google_config() -> GoogleConfig {
    GoogleConfig {
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
        redirect_uri: "http://localhost:7070/api/auth/google/callback".into(),
        auth_url: GoogleConfig::AUTH_URL.into(),
        token_url: GoogleConfig::TOKEN_URL.into(),
        userinfo_url: GoogleConfig::USERINFO_URL.into(),
    }
}

/// A test client that holds one user's bearer token across sequential
/// requests.
pub struct TestClient {
    state: AppState,
    token: Option<String>,
}

impl TestClient {
    /// Create a new test client with a fresh in-memory database.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        Self {
            state: AppState::new(pool, config),
            token: None,
        }
    }

    /// A second client sharing the same database and sessions, with no token.
    pub fn other_user(&self) -> Self {
        Self {
            state: self.state.clone(),
            token: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the full router with middleware applied (mimics production setup).
    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    /// Send a request and return status, `Location` header (if any) and body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
    ) -> (StatusCode, Option<String>, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, location, String::from_utf8_lossy(&bytes).to_string())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = self.send(Method::GET, uri, None).await;
        (status, body)
    }

    /// GET and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, parse(&body))
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, _, body) = self.send(Method::POST, uri, Some(&body)).await;
        (status, parse(&body))
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, _, body) = self.send(Method::PUT, uri, Some(&body)).await;
        (status, parse(&body))
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        self.send(Method::DELETE, uri, None).await.0
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    /// Register `username` and keep the returned token for later requests.
    pub async fn register(&mut self, username: &str) -> Value {
        let (status, body) = self
            .post_json(
                "/api/auth/register",
                serde_json::json!({ "username": username, "password": "secret123" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        self.token = body["token"].as_str().map(str::to_string);
        body["user"].clone()
    }

    /// Create a record and return its server-side id.
    pub async fn create(&self, collection: &str, record: Value) -> String {
        let (status, body) = self.post_json(&format!("/api/{}", collection), record).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or(Value::Null)
}

// =============================================================================
// Record fixtures
// =============================================================================

pub fn income_json(amount: f64, frequency: &str, income_type: &str) -> Value {
    serde_json::json!({
        "source": "Acme Corp",
        "category": "Employment",
        "amount": amount,
        "type": income_type,
        "frequency": frequency,
    })
}

pub fn expense_json(category: &str, amount: f64) -> Value {
    serde_json::json!({
        "description": "Monthly bill",
        "category": category,
        "amount": amount,
        "date": "2024-03-01",
    })
}

pub fn asset_json(category: &str, value: f64, income_generated: f64) -> Value {
    serde_json::json!({
        "name": "Holding",
        "category": category,
        "value": value,
        "incomeGenerated": income_generated,
    })
}

pub fn liability_json(amount: f64) -> Value {
    serde_json::json!({
        "description": "Car loan",
        "type": "Auto Loan",
        "amount": amount,
        "interestRate": 4.5,
    })
}

pub fn goal_json(target: f64, current: f64) -> Value {
    serde_json::json!({
        "description": "Emergency fund",
        "targetAmount": target,
        "currentAmount": current,
        "targetDate": "2025-12-31",
    })
}

// =============================================================================
// Live server
// =============================================================================

/// A server on an ephemeral port backed by a temporary database file.
pub struct TestServer {
    pub base_url: String,
    _dir: TempDir,
}

pub async fn spawn_server() -> TestServer {
    spawn_server_with(test_config()).await
}

pub async fn spawn_server_with(config: Config) -> TestServer {
    let dir = TempDir::new().unwrap();
    let config = Config {
        database_path: dir.path().join("cashflow.db"),
        ..config
    };

    let (_state, app) = server::build_app(config).expect("Failed to build app");
    let (port, _handle) = server::serve(app, "127.0.0.1", 0)
        .await
        .expect("Failed to start server");

    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        _dir: dir,
    }
}

// =============================================================================
// Language model stand-in
// =============================================================================

pub const AI_API_KEY: &str = "test-ai-key";

/// An OpenAI-compatible chat completions endpoint that answers with the user
/// prompt it received, prefixed by `Advice for:`. Requests without the
/// expected API key get a 401; a prompt containing `FAIL` gets a 500.
pub async fn spawn_fake_ai() -> String {
    async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        let expected = format!("Bearer {}", AI_API_KEY);
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some(expected.as_str());
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        let prompt = body["messages"]
            .as_array()
            .and_then(|messages| messages.iter().find(|m| m["role"] == "user"))
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default()
            .to_string();
        if prompt.contains("FAIL") {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }

        Json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": format!("Advice for: {}", prompt) } }]
        }))
        .into_response()
    }

    let app = Router::new().route("/v1/chat/completions", post(completions));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}/v1", port)
}

pub fn ai_config(base_url: &str) -> AiConfig {
    AiConfig {
        provider: AiProvider::OpenAi,
        base_url: base_url.into(),
        api_key: AI_API_KEY.into(),
        model: "test-model".into(),
    }
}
