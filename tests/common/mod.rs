#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use formwright::config::{Config, StorageBackend};
use formwright::persistence::memory::MemoryTables;
use formwright::state::SharedState;

pub const BASE_URL: &str = "http://forms.test";

/// A running test server backed by in-memory tables.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    pub tables: Arc<MemoryTables>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn patch(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("patch request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Create a draft, return its JSON.
    pub async fn create_draft(&self, name: &str) -> Value {
        let (body, status) = self.post("/api/v1/drafts", &json!({ "name": name })).await;
        assert_eq!(status, StatusCode::OK, "create draft failed: {body}");
        body
    }

    /// Add a field to a draft and apply `patch` to it. Returns the field JSON.
    pub async fn add_field(&self, form_id: &str, patch: Value) -> Value {
        let (field, status) = self
            .post(&format!("/api/v1/drafts/{form_id}/fields"), &json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "add field failed: {field}");
        let field_id = field["id"].as_str().unwrap();

        let (field, status) = self
            .patch(&format!("/api/v1/drafts/{form_id}/fields/{field_id}"), &patch)
            .await;
        assert_eq!(status, StatusCode::OK, "change field failed: {field}");
        field
    }

    /// Save a draft, return (body, status).
    pub async fn save(&self, form_id: &str) -> (Value, StatusCode) {
        self.post(&format!("/api/v1/drafts/{form_id}/save"), &json!({}))
            .await
    }

    /// Create and save a form with the given field labels, all text fields.
    pub async fn publish(&self, name: &str, labels: &[&str]) -> (String, Vec<String>) {
        let draft = self.create_draft(name).await;
        let form_id = draft["id"].as_str().unwrap().to_string();
        let mut field_ids = Vec::new();
        for label in labels {
            let field = self
                .add_field(&form_id, json!({ "type": "text", "label": label }))
                .await;
            field_ids.push(field["id"].as_str().unwrap().to_string());
        }
        let (body, status) = self.save(&form_id).await;
        assert_eq!(status, StatusCode::OK, "save failed: {body}");
        (form_id, field_ids)
    }

    /// Start a fill session, return the session view.
    pub async fn start_session(&self, form_id: &str) -> Value {
        let (body, status) = self
            .post(&format!("/api/v1/forms/{form_id}/sessions"), &json!({}))
            .await;
        assert_eq!(status, StatusCode::OK, "start session failed: {body}");
        body
    }
}

pub fn test_config() -> Config {
    Config {
        storage: StorageBackend::Memory,
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: BASE_URL.to_string(),
        max_body_size: 65_536,
        session_ttl: Duration::from_secs(3600),
        log_level: "warn".to_string(),
    }
}

/// Spawn the app on a random port.
pub async fn spawn_app() -> TestApp {
    let tables = Arc::new(MemoryTables::new());
    let (app, state) = formwright::build_app(tables.clone(), test_config());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        state,
        tables,
    }
}
