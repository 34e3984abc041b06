// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Casting Agency - Actors and Movies API
//!
//! This crate serves a small CRUD API for a casting agency's actors and
//! movies. Every resource endpoint is gated on a permission carried in an
//! Auth0-issued access token.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication and authorization (Auth0 JWT)
//! - `config` - Environment configuration
//! - `storage` - Persistent store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;
