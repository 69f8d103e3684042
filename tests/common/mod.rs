#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    middleware,
    response::Response,
    routing::get,
    Router,
};
use pcd_manager::{config::AppConfig, db, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Application router over a fresh in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = test_config();
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg).expect("app state");
        let router = Router::new()
            .route("/health", get(pcd_manager::health_check))
            .nest("/api/v1", pcd_manager::api_v1_routes())
            .layer(middleware::from_fn(
                pcd_manager::middleware_helpers::request_id_middleware,
            ))
            .with_state(state.clone());

        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Method::DELETE, uri, None).await
    }

    /// POSTs and returns the created record's `data` object, asserting a 201.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let response = self.post(uri, body).await;
        let status = response.status();
        let json = response_json(response).await;
        assert_eq!(status, 201, "creating {uri} failed: {json}");
        json["data"].clone()
    }

    pub async fn create_location(&self, state: &str, fab: &str) -> i64 {
        let location = self
            .create(
                "/api/v1/locations",
                serde_json::json!({ "state": state, "fab": fab }),
            )
            .await;
        location["id"].as_i64().expect("location id")
    }

    pub async fn create_tool(&self, name: &str) -> i64 {
        let tool = self
            .create("/api/v1/tools", serde_json::json!({ "name": name }))
            .await;
        tool["id"].as_i64().expect("tool id")
    }
}

/// Small Argon2 parameters keep hashing fast under test.
pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    );
    // One long-lived connection, so every query sees the same in-memory database
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg.db_idle_timeout_secs = 3_600;
    cfg.password_hash_memory_kib = 64;
    cfg.password_hash_iterations = 1;
    cfg
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
