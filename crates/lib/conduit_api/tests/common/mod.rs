//! Shared fixtures: an in-memory store seeded with jake and a router over it.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use conduit_api::config::ApiConfig;
use conduit_api::{AppState, router};
use conduit_core::auth::jwt::TokenService;
use conduit_core::auth::keys::SigningKey;
use conduit_core::auth::password::{PasswordScheme, hash_password};
use conduit_core::models::auth::CredentialRecord;
use conduit_core::store::MemoryCredentialStore;

pub const SECRET: &str = "test-secret";
pub const JAKE_ID: &str = "0b9a4a6c-6f1e-4c3c-9d0a-1f2e3d4c5b6a";
pub const JAKE_EMAIL: &str = "jake@jake.jake";
pub const JAKE_PASSWORD: &str = "jakejake";

pub struct TestApp {
    pub store: Arc<MemoryCredentialStore>,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(ApiConfig {
            jwt_secret: Some(SECRET.into()),
            ..ApiConfig::default()
        })
        .await
    }

    pub async fn with_config(config: ApiConfig) -> Self {
        let store = Arc::new(MemoryCredentialStore::new());
        store.insert(jake(config.password_scheme)).await;

        let tokens = TokenService::new(&SigningKey::from_secret(SECRET).unwrap());
        let state = AppState::new(store.clone(), tokens, config);
        Self { store, state }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }
}

pub fn jake(scheme: PasswordScheme) -> CredentialRecord {
    let stored = hash_password(scheme, JAKE_PASSWORD).unwrap();
    CredentialRecord {
        id: JAKE_ID.into(),
        email: JAKE_EMAIL.into(),
        username: "jake".into(),
        bio: Some("I work at statefarm".into()),
        image: None,
        password_hash: stored.hash,
        password_salt: stored.salt,
    }
}

pub fn login_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/users/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn login_body(email: &str, password: &str) -> String {
    serde_json::json!({ "user": { "email": email, "password": password } }).to_string()
}

pub fn user_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/user");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("parse JSON")
}
