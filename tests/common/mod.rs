//! Shared helpers: an in-memory app driven through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use studyhive::config::DEFAULT_CORS_ORIGINS;
use studyhive::db::Store;
use studyhive::routes::AppState;
use studyhive::services::password::PasswordService;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret";
pub const PASSWORD: &str = "Str0ng!pass";

pub fn test_state(store: Store) -> AppState {
    AppState {
        store,
        jwt_secret: JWT_SECRET.into(),
        // Cheap hashing for tests
        passwords: PasswordService::new(8, 1).expect("argon2 params"),
        port: 3001,
    }
}

pub fn test_router(state: AppState) -> Router {
    let origins: Vec<String> = DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect();
    studyhive::router(state, &origins)
}

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            router: test_router(test_state(Store::in_memory())),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).expect("request")).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.expect("request");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a user and returns `(token, user id)`.
    pub async fn register(&self, name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["token"].as_str().expect("token").to_string(),
            body["user"]["id"].as_str().expect("user id").to_string(),
        )
    }
}
