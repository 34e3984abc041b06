// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims decoded from an Auth0 access token.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Claims of a verified access token.
///
/// Auth0 puts RBAC grants in a top-level `permissions` array when "Add
/// Permissions in the Access Token" is enabled for the API. Registered
/// claims are validated by `jsonwebtoken` before this struct is built; they
/// are kept here for logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (Auth0 user or client id)
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub iss: Option<String>,

    /// Audience, a string or an array of strings
    #[serde(default)]
    pub aud: Option<serde_json::Value>,

    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default)]
    pub iat: Option<i64>,

    /// Granted permission strings, e.g. `view:actors`
    #[serde(default)]
    pub permissions: Option<Vec<String>>,

    /// Any other claims
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}
