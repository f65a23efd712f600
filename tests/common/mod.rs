// SPDX-License-Identifier: MIT
// Copyright 2026 EventsHub contributors

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use eventshub::config::Config;
use eventshub::db::FirestoreDb;
use eventshub::routes::create_router;
use eventshub::services::IdentityVerifier;
use eventshub::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-shared-secret";
pub const TEST_PROJECT: &str = "test-project";

/// Create a test app with the in-memory database and the shared-secret
/// identity verifier. Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = FirestoreDb::new_mock();
    let identity_verifier = Arc::new(IdentityVerifier::new_with_shared_secret(
        TEST_PROJECT,
        TEST_SECRET,
    ));

    let state = Arc::new(AppState {
        config,
        db,
        identity_verifier,
    });

    (create_router(state.clone()), state)
}

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    iss: String,
    aud: String,
    exp: usize,
    iat: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Mint an identity assertion the shared-secret verifier accepts.
#[allow(dead_code)]
pub fn mint_token(subject_id: &str, email: Option<&str>, name: Option<&str>) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = TestClaims {
        sub: subject_id.to_string(),
        iss: format!("https://securetoken.google.com/{TEST_PROJECT}"),
        aud: TEST_PROJECT.to_string(),
        exp: now + 3600,
        iat: now,
        email: email.map(str::to_string),
        name: name.map(str::to_string),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Fire a request at the app. Body is optional JSON.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sync an account so a User record exists for the token's subject.
#[allow(dead_code)]
pub async fn sync_account(app: &axum::Router, token: &str) -> serde_json::Value {
    let response = send(app, "POST", "/api/auth/sync", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
