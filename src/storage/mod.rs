// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for actors and movies in a single redb file.
//!
//! ## Relations
//!
//! ```text
//! movies(id, title, release_date)
//! actors(id, name, age, gender, movie_id -> movies.id | null)
//! ```
//!
//! The actor → movie reference is enforced on write: inserting or updating an
//! actor with an unknown `movie_id` fails, and deleting a movie clears
//! `movie_id` on its actors.

pub mod database;
pub mod repository;

pub use database::{CastingDatabase, StoreError, StoreResult};
pub use repository::{ActorRepository, MovieRepository};
