#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::{ApplicationSettings, JwtSettings, Platform};
use chirpy::startup::run;
use chirpy::store::InMemoryStore;
use serde_json::{json, Value};

pub const PASSWORD: &str = "SecurePass123";

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub jwt: JwtSettings,
    pub client: reqwest::Client,
}

pub fn spawn_app() -> TestApp {
    spawn_app_on(Platform::Dev)
}

pub fn spawn_app_on(platform: Platform) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryStore::new());
    let jwt = JwtSettings {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 60 * 24 * 3600,
    };
    let application = ApplicationSettings {
        host: "127.0.0.1".to_string(),
        port,
        platform,
        static_dir: "./public".to_string(),
    };

    let server = run(
        listener,
        store.clone(),
        store.clone(),
        store.clone(),
        jwt.clone(),
        application,
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        jwt,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register and log in; returns the login body
    pub async fn logged_in_user(&self, email: &str) -> Value {
        let response = self.create_user(email, PASSWORD).await;
        assert_eq!(201, response.status().as_u16());

        let response = self.login(email, PASSWORD).await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn create_chirp(&self, access_token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(access_token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
