// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction from the `Authorization` header.

use axum::http::HeaderValue;

use super::AuthError;

/// Return the token part of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively and the header must contain
/// exactly two whitespace-separated parts.
pub fn bearer_token(value: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = value.ok_or(AuthError::MissingAuthHeader)?;
    if value.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let raw = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;

    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}
