// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests: a throwaway RSA signing key, the matching
//! JWKS, token builders, and a ready-to-use [`AppState`].

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::api::router;
use crate::auth::{JwksManager, TokenVerifier};
use crate::config::AuthSettings;
use crate::state::AppState;
use crate::storage::CastingDatabase;

pub const DOMAIN: &str = "casting.test.auth0.com";
pub const ISSUER: &str = "https://casting.test.auth0.com/";
pub const AUDIENCE: &str = "casting-agency";
pub const KID: &str = "casting-test-key-1";

/// Never reachable; tests must be served from the installed key set.
const JWKS_URL: &str = "http://127.0.0.1:9/.well-known/jwks.json";

const PRIVATE_KEY_PEM: &str = include_str!("test_rsa_private.pem");

/// Base64url modulus of the public half of `test_rsa_private.pem`.
const MODULUS: &str = "tAyZy37taV3WAc8gN1xwf-Rqz-BSz_Y8xzc9eg-yEQ-Vv8oOfryk_LVwllKgv2ctpuGpfWf99a9TtRRe9c8Vh-MUrZu9Di0WbpLsdRXtK17M6jB_DfPt601n8r5TxUBxkmgRajk9kYJHW1wOPLk3hhO-islMJcTbDe1xMnLfrnPRVpnW4yD6EkR3h6eR4TOahkLhmIYwYRYjMxeAjMJU_PWPuy2nQbEBC-GyEzrTy35DbwIr3ZkVaio2vTyMh5gi6ls4u89xV7DpOlAAN3rgtToLqQLUfoicsQXCkCb_oKSh13sE6oh21mnH9GGulrhZ84GI0M5_uXyYrp5qYB5N_Q";

pub const CASTING_ASSISTANT: &[&str] = &["view:actors", "view:movies"];

pub const CASTING_DIRECTOR: &[&str] = &[
    "view:actors",
    "view:movies",
    "create:actors",
    "edit:actors",
    "delete:actors",
    "edit:movies",
];

pub const EXECUTIVE_PRODUCER: &[&str] = &[
    "view:actors",
    "view:movies",
    "create:actors",
    "edit:actors",
    "delete:actors",
    "create:movies",
    "edit:movies",
    "delete:movies",
];

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

pub fn jwks_json() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": KID,
            "n": MODULUS,
            "e": "AQAB"
        }]
    })
}

pub fn jwk_set() -> JwkSet {
    serde_json::from_value(jwks_json()).unwrap()
}

pub fn settings() -> AuthSettings {
    let mut settings =
        AuthSettings::for_domain(DOMAIN, AUDIENCE, vec![Algorithm::RS256]).unwrap();
    settings.jwks_url = JWKS_URL.to_string();
    settings
}

pub async fn verifier() -> TokenVerifier {
    let settings = settings();
    let jwks = JwksManager::new(&settings.jwks_url, std::time::Duration::from_secs(2)).unwrap();
    jwks.install(&jwk_set()).await;
    TokenVerifier::with_jwks(&settings, jwks)
}

pub async fn app_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = CastingDatabase::open(&dir.path().join("casting.redb")).unwrap();
    (AppState::new(db, verifier().await), dir)
}

/// Valid, unexpired claims granting `permissions`.
pub fn claims(permissions: &[&str]) -> Value {
    let issued = now();
    json!({
        "iss": ISSUER,
        "sub": "auth0|casting-assistant",
        "aud": AUDIENCE,
        "iat": issued,
        "exp": issued + 3600,
        "permissions": permissions,
    })
}

/// RS256-sign `claims` with the test key.
pub fn sign(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_owned);
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

pub fn token(permissions: &[&str]) -> String {
    sign(&claims(permissions), Some(KID))
}

pub fn bearer(permissions: &[&str]) -> String {
    format!("Bearer {}", token(permissions))
}

/// Drive one request through the full router.
///
/// `permissions` of `None` sends no `Authorization` header. Returns the
/// status and the JSON body (`Value::Null` when the body is not JSON).
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    permissions: Option<&[&str]>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(permissions) = permissions {
        request = request.header(header::AUTHORIZATION, bearer(permissions));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
