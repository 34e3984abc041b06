// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor gating a handler on a permission.
//!
//! Put `Authorized<P>` first in a handler's arguments so the check runs
//! before any path or body extraction:
//!
//! ```rust,ignore
//! async fn list_actors(
//!     _auth: Authorized<ViewActors>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<ActorListResponse>, ApiError> {
//!     // only reached with a verified token granting `view:actors`
//! }
//! ```

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{bearer_token, check_permissions, AuthError, Claims, Permission};
use crate::state::AppState;

/// Verified claims of a request whose token grants permission `P`.
pub struct Authorized<P: Permission> {
    pub claims: Claims,
    _permission: PhantomData<fn() -> P>,
}

impl<P: Permission> Authorized<P> {
    pub fn subject(&self) -> &str {
        self.claims.sub.as_deref().unwrap_or("unknown")
    }
}

impl<P: Permission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let verified = match bearer_token(parts.headers.get(AUTHORIZATION)) {
            Ok(token) => state.verifier.verify(token).await,
            Err(e) => Err(e),
        };
        let claims = verified.inspect_err(|e| log_rejection(e, P::NAME))?;

        check_permissions(P::NAME, Some(&claims)).inspect_err(|e| {
            tracing::info!(
                reason = e.error_code(),
                subject = claims.sub.as_deref().unwrap_or("unknown"),
                permission = P::NAME,
                "Permission denied"
            );
        })?;

        Ok(Authorized {
            claims,
            _permission: PhantomData,
        })
    }
}

/// Token failures log at warn, header problems at debug.
fn log_rejection(error: &AuthError, permission: &str) {
    if error.is_verification_failure() {
        tracing::warn!(
            reason = error.error_code(),
            error = %error,
            permission,
            "Token verification failed"
        );
    } else {
        tracing::debug!(
            reason = error.error_code(),
            permission,
            "Rejected authorization header"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CreateMovies, ViewActors};
    use crate::test_support;
    use axum::http::Request;

    fn parts_with(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/actors");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn requires_auth_header() {
        let (state, _dir) = test_support::app_state().await;
        let mut parts = parts_with(None);

        let result = Authorized::<ViewActors>::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn rejects_non_bearer_scheme() {
        let (state, _dir) = test_support::app_state().await;
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));

        let result = Authorized::<ViewActors>::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn forged_token_is_a_verification_failure() {
        let (state, _dir) = test_support::app_state().await;
        let mut parts = parts_with(Some("Bearer not.a.jwt"));

        let error = Authorized::<ViewActors>::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(error.is_verification_failure());

        let mut parts = parts_with(Some("Token abc"));
        let error = Authorized::<ViewActors>::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(!error.is_verification_failure());
    }

    #[tokio::test]
    async fn grants_with_required_permission() {
        let (state, _dir) = test_support::app_state().await;
        let header = test_support::bearer(test_support::CASTING_ASSISTANT);
        let mut parts = parts_with(Some(&header));

        let auth = Authorized::<ViewActors>::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(auth.subject(), "auth0|casting-assistant");
    }

    #[tokio::test]
    async fn denies_without_required_permission() {
        let (state, _dir) = test_support::app_state().await;
        let header = test_support::bearer(test_support::CASTING_DIRECTOR);
        let mut parts = parts_with(Some(&header));

        let result = Authorized::<CreateMovies>::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn token_without_permissions_claim_is_invalid_claims() {
        let (state, _dir) = test_support::app_state().await;
        let mut claims = test_support::claims(&[]);
        claims.as_object_mut().unwrap().remove("permissions");
        let header = format!(
            "Bearer {}",
            test_support::sign(&claims, Some(test_support::KID))
        );
        let mut parts = parts_with(Some(&header));

        let result = Authorized::<ViewActors>::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidClaims)));
    }
}
