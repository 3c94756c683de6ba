//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the full router over a
//! fresh on-disk library, so requests exercise the real middleware stack and
//! store without binding a socket.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use libris_core::config::{DatabaseConfig, ServerConfig};
use libris_core::{create_authenticator, AuthConfig, Config, SqliteLibrary};

/// Test fixture for API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_author_creation() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/authors", json!({ "name": "Le Guin" })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Authorization header sent with every request, if any
    pub authorization: Option<String>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when empty or not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl TestFixture {
    /// Create a fixture with the access gate disabled.
    pub fn new() -> Self {
        Self::with_auth(AuthConfig::none())
    }

    /// Create a fixture gated by HTTP Basic with the given credentials.
    pub fn with_basic_auth(username: &str, password: &str) -> Self {
        Self::with_auth(AuthConfig::basic(username, password))
    }

    fn with_auth(auth: AuthConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let authenticator =
            Arc::from(create_authenticator(&auth).expect("Failed to create authenticator"));
        let library =
            Arc::new(SqliteLibrary::new(&db_path).expect("Failed to create library store"));

        let config = Config {
            auth,
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 8080, // Not used for in-process testing
            },
            database: DatabaseConfig { path: db_path },
        };

        let state = Arc::new(libris_server::state::AppState::new(
            config,
            authenticator,
            library,
        ));
        let router = libris_server::api::create_router(state);

        Self {
            router,
            authorization: None,
            temp_dir,
        }
    }

    /// Send Basic credentials with every subsequent request.
    pub fn authenticated(mut self, username: &str, password: &str) -> Self {
        self.authorization = Some(basic_header(username, password));
        self
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a GET request with an explicit Authorization header value.
    pub async fn get_with_authorization(&self, path: &str, value: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = &self.authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.send(request).await
    }

    /// Create an author and return its id.
    pub async fn create_author(&self, name: &str) -> i64 {
        let response = self.post("/authors", json!({ "name": name })).await;
        assert_eq!(response.status, StatusCode::OK, "create author: {:?}", response);
        response.body["id"].as_i64().expect("author id")
    }

    /// Create a category and return its id.
    pub async fn create_category(&self, name: &str) -> i64 {
        let response = self.post("/categories", json!({ "name": name })).await;
        assert_eq!(response.status, StatusCode::OK, "create category: {:?}", response);
        response.body["id"].as_i64().expect("category id")
    }

    /// Create a book and return its id.
    pub async fn create_book(
        &self,
        title: &str,
        year: Option<i64>,
        author_id: i64,
        category_id: i64,
    ) -> i64 {
        let response = self
            .post(
                "/books",
                json!({
                    "title": title,
                    "publication_year": year,
                    "author_id": author_id,
                    "category_id": category_id
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "create book: {:?}", response);
        response.body["id"].as_i64().expect("book id")
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(auth) = &self.authorization {
            request_builder = request_builder.header(header::AUTHORIZATION, auth);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}

/// Build an `Authorization: Basic ...` header value.
pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
