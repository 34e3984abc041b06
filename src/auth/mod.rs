// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Auth0 access token authentication and permission-based authorization.
//!
//! ## Auth Flow
//!
//! 1. The client obtains an access token for the API audience from Auth0
//! 2. The client sends `Authorization: Bearer <access token>`
//! 3. The server:
//!    - Extracts the bearer token from the header
//!    - Looks up the signing key by `kid` in the tenant JWKS
//!    - Verifies signature, expiry, issuer and audience
//!    - Checks the `permissions` claim for the endpoint's permission
//!
//! ## Security
//!
//! - Every resource endpoint requires a permission; health and docs do not
//! - Only algorithms named in configuration are accepted
//! - JWKS is cached with TTL and refetched on unknown `kid`
//! - Clock skew tolerance is 60 seconds
//! - Verification failures share one client-facing message; the specific
//!   cause is logged

pub mod claims;
pub mod error;
pub mod extractor;
pub mod header;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use claims::Claims;
pub use error::AuthError;
pub use extractor::Authorized;
pub use header::bearer_token;
pub use jwks::JwksManager;
pub use permissions::{
    check_permissions, CreateActors, CreateMovies, DeleteActors, DeleteMovies, EditActors,
    EditMovies, Permission, ViewActors, ViewMovies,
};
pub use verifier::TokenVerifier;
