// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::storage::{ActorRepository, CastingDatabase, MovieRepository};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<CastingDatabase>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(db: CastingDatabase, verifier: TokenVerifier) -> Self {
        Self {
            db: Arc::new(db),
            verifier: Arc::new(verifier),
        }
    }

    pub fn actors(&self) -> ActorRepository<'_> {
        ActorRepository::new(&self.db)
    }

    pub fn movies(&self) -> MovieRepository<'_> {
        MovieRepository::new(&self.db)
    }
}
