// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::envelope;

/// Message returned to clients for every token verification failure.
pub const GENERIC_VERIFICATION_MESSAGE: &str = "Unable to verify the access token.";

/// Authentication error type.
///
/// Verification failures keep their specific reason for logs
/// ([`AuthError::error_code`], `Display`) but are rendered to clients as a
/// single generic 401 so a caller cannot probe which check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("authorization header is missing")]
    MissingAuthHeader,
    /// Header is not `Bearer <token>`
    #[error("authorization header is not a bearer token")]
    InvalidAuthHeader,

    #[error("token is malformed")]
    MalformedToken,
    #[error("token header has no key id")]
    MissingKeyId,
    #[error("token algorithm is not accepted")]
    UnsupportedAlgorithm,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    TokenExpired,
    #[error("token is not yet valid")]
    TokenNotYetValid,
    #[error("token issuer is invalid")]
    InvalidIssuer,
    #[error("token audience is invalid")]
    InvalidAudience,
    /// No key in the JWKS matches the token's `kid`
    #[error("no matching key found in JWKS")]
    NoMatchingKey,
    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(String),

    /// Claims were not available to the permission check
    #[error("token payload is missing")]
    InvalidPayload,
    /// Claims carry no `permissions` entry
    #[error("token has no permissions claim")]
    InvalidClaims,
    /// Required permission is not granted
    #[error("permission not granted")]
    Unauthorized,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "authorization_header_missing",
            AuthError::InvalidAuthHeader => "invalid_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::UnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::NoMatchingKey => "no_matching_key",
            AuthError::JwksFetch(_) => "jwks_fetch_error",
            AuthError::InvalidPayload => "invalid_payload",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::Unauthorized => "unauthorized",
        }
    }

    /// Whether this error came from the signature verifier.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::MissingKeyId
                | AuthError::UnsupportedAlgorithm
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::TokenNotYetValid
                | AuthError::InvalidIssuer
                | AuthError::InvalidAudience
                | AuthError::NoMatchingKey
                | AuthError::JwksFetch(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidPayload | AuthError::InvalidClaims => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Description shown to clients.
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "Authorization header is expected.",
            AuthError::InvalidAuthHeader => "Authorization header must be Bearer token.",
            AuthError::InvalidPayload => "Payload is None or invalid.",
            AuthError::InvalidClaims => "Permissions not included in JWT.",
            AuthError::Unauthorized => "Permission not found.",
            _ => GENERIC_VERIFICATION_MESSAGE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        envelope(self.status_code(), self.description())
    }
}
