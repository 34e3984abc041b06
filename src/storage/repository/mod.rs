// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the casting database.
//!
//! Each repository borrows the [`CastingDatabase`](super::CastingDatabase)
//! and runs every operation in its own redb transaction.

pub mod actors;
pub mod movies;

pub use actors::ActorRepository;
pub use movies::MovieRepository;
