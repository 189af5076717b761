#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use darulabror_api::testing::{seed_admin, test_config, MemoryStore, TestBackend};
use darulabror_api::types::Role;
use reqwest::StatusCode;
use serde_json::{json, Value};

pub const CDN: &str = "https://cdn.test";
pub const PASSWORD: &str = "secret123";

/// The real router on a free port, backed by in-memory repositories.
pub struct TestApp {
    pub base_url: String,
    pub backend: TestBackend,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(MemoryStore::configured(CDN)).await
    }

    pub async fn spawn_with(store: MemoryStore) -> Result<Self> {
        let backend = TestBackend::new(store);
        let app = darulabror_api::app(backend.state(test_config()));

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let test_app = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            backend,
            client: reqwest::Client::new(),
        };
        test_app.wait_ready(Duration::from_secs(5)).await?;
        Ok(test_app)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Seeds an active account and logs in through the API.
    pub async fn token_for(&self, email: &str, role: Role) -> Result<String> {
        seed_admin(&*self.backend.admins, email, PASSWORD, role, true).await;
        self.login(email, PASSWORD).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response without token")
    }
}

/// A registration body that passes validation
pub fn registration_body(email: &str, nisn: &str) -> Value {
    json!({
        "student_type": "new",
        "gender": "male",
        "email": email,
        "full_name": "Muhammad Rizki",
        "phone": "081234567890",
        "place_of_birth": "Garut",
        "date_of_birth": "2011-05-12",
        "address": "Jl. Raya Garut No. 10",
        "origin_school": "SDN 2 Garut",
        "nisn": nisn,
        "father_name": "Hasan Basri",
        "father_occupation": "Trader",
        "phone_father": "081234567891",
        "date_of_birth_father": "1979-02-10",
        "mother_name": "Siti Fatimah",
        "mother_occupation": "Tailor",
        "phone_mother": "081234567892",
        "date_of_birth_mother": "1982-08-21"
    })
}
