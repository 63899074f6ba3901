#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use profile_api::app::{self, AppState, Stores};
use profile_api::auth::{generate_jwt, Claims};
use profile_api::database::models::User;
use profile_api::database::MemoryUserStore;

pub const SECRET: &str = "integration-test-secret";

pub const OWNER: i32 = 1;
pub const STRANGER: i32 = 2;
pub const SUPERUSER: i32 = 3;
pub const INACTIVE: i32 = 4;

/// The full router over empty in-memory tables, with four seeded accounts
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_list_limit(None).await
    }

    pub async fn with_list_limit(max_list_limit: Option<i64>) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        users.insert(user(OWNER, "owner@example.com", true, false)).await;
        users.insert(user(STRANGER, "stranger@example.com", true, false)).await;
        users.insert(user(SUPERUSER, "admin@example.com", true, true)).await;
        users.insert(user(INACTIVE, "gone@example.com", false, false)).await;

        let state = AppState {
            stores: Stores::in_memory(users),
            jwt_secret: Arc::from(SECRET),
            max_list_limit,
        };

        Self { router: app::router(state) }
    }

    pub async fn send(&self, method: Method, uri: &str, actor: Option<i32>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let token = actor.map(token_for);
        self.send_raw(method, uri, token.as_deref(), body.map(|b| b.to_string())).await
    }

    /// Like `send`, but with an arbitrary bearer token and a raw body
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))?,
            None => request.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        // Extractor rejections from axum itself come back as plain text
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, actor: Option<i32>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, actor, None).await
    }

    pub async fn post(&self, uri: &str, actor: i32, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(actor), Some(body)).await
    }

    pub async fn put(&self, uri: &str, actor: i32, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(actor), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, actor: i32) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, Some(actor), None).await
    }

    /// Create a row and return its id, failing loudly on anything but 200
    pub async fn create(&self, base: &str, actor: i32, body: Value) -> Result<i64> {
        let (status, created) = self.post(base, actor, body).await?;
        anyhow::ensure!(status == StatusCode::OK, "create on {} returned {}: {}", base, status, created);
        created["id"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("no id in {}", created))
    }
}

pub fn token_for(user_id: i32) -> String {
    generate_jwt(&Claims::new(user_id, 1), SECRET).expect("sign test token")
}

pub fn posgraduate() -> Value {
    serde_json::json!({
        "title": "Posgraduate",
        "school": "Lambton College",
        "month_start": 9,
        "year_start": 2023,
        "month_end": 6,
        "year_end": 2025,
        "percentage": 0.95,
        "location": "Canada, Toronto"
    })
}

/// Every mounted resource, by URL segment
pub const RESOURCES: [&str; 5] = ["items", "educations", "experiences", "skills", "tags"];

/// A valid create payload for the resource mounted at `/api/v1/{resource}`
pub fn sample(resource: &str) -> Value {
    match resource {
        "items" => serde_json::json!({ "title": "Portfolio", "description": "site" }),
        "educations" => posgraduate(),
        "experiences" => serde_json::json!({
            "title": "Backend Developer",
            "company": "Acme",
            "location": "Remote",
            "month_start": 1,
            "year_start": 2021,
            "month_end": 12,
            "year_end": 2023
        }),
        "skills" => serde_json::json!({ "name": "Rust" }),
        "tags" => serde_json::json!({ "name": "Backend" }),
        other => panic!("no sample payload for {}", other),
    }
}

fn user(id: i32, email: &str, is_active: bool, is_superuser: bool) -> User {
    User {
        id,
        email: email.to_string(),
        hashed_password: "$2b$12$not-a-real-hash".to_string(),
        is_active,
        is_superuser,
        full_name: Some(format!("User {}", id)),
    }
}
