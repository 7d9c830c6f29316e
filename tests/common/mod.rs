#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use staff_api::auth::password::MIN_COST;
use staff_api::auth::PasswordHasher;
use staff_api::config::AppConfig;
use staff_api::database::models::Credential;
use staff_api::database::{CredentialStore, MemoryStore};
use staff_api::AppState;

pub const ALICE_PASSWORD: &str = "correct-pw";
pub const BOB_PASSWORD: &str = "bob-pw";

pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub config: AppConfig,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /token and return the raw response.
    pub async fn login(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?)
    }

    /// Log in and return the access token, failing the test on any non-200.
    pub async fn token(&self, username: &str, password: &str) -> Result<String> {
        let res = self.login(username, password).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["access_token"]
            .as_str()
            .map(str::to_string)
            .context("no access_token in login response")
    }

    pub async fn alice_token(&self) -> Result<String> {
        self.token("alice", ALICE_PASSWORD).await
    }

    pub async fn bob_token(&self) -> Result<String> {
        self.token("bob", BOB_PASSWORD).await
    }
}

/// Start the API on an ephemeral port over a fresh in-memory store holding
/// `alice` (read/write) and `bob` (read only).
pub async fn spawn_server() -> Result<TestServer> {
    let mut config = AppConfig::development();
    config.security.password_hash_cost = MIN_COST;

    let store = Arc::new(MemoryStore::new());
    let hasher = PasswordHasher::new(MIN_COST)?;

    let mut alice = Credential::new(1, "alice", hasher.hash(ALICE_PASSWORD)?);
    alice.privilege = 2;
    alice.full_name = Some("Alice Admin".to_string());
    CredentialStore::insert(store.as_ref(), &alice).await?;

    let bob = Credential::new(2, "bob", hasher.hash(BOB_PASSWORD)?);
    CredentialStore::insert(store.as_ref(), &bob).await?;

    let state = AppState::new(config.clone(), store.clone(), store)?;
    let app = staff_api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        client: Client::new(),
        config,
    })
}
