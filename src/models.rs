// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Records persisted by the store ([`Actor`], [`Movie`]), the request bodies
//! accepted by the create/update endpoints, and the success envelopes
//! returned by the handlers. Every response carries `success: true`; errors
//! use [`crate::error::ErrorBody`].
//!
//! Request bodies deserialize every field as optional so that a missing
//! mandatory field is reported as a 422 by validation rather than rejected
//! by the JSON layer.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

/// Gender stored when a create request does not supply one.
pub const DEFAULT_GENDER: &str = "Other";

// =============================================================================
// Records
// =============================================================================

/// An actor, optionally cast in a movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Movie this actor is cast in, if any. Always refers to an existing movie.
    pub movie_id: Option<u64>,
}

/// A movie.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    /// Release date (`YYYY-MM-DD`).
    pub release_date: NaiveDate,
}

/// Validated fields of an actor about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub movie_id: Option<u64>,
}

impl NewActor {
    pub fn into_actor(self, id: u64) -> Actor {
        Actor {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            movie_id: self.movie_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDate,
}

impl NewMovie {
    pub fn into_movie(self, id: u64) -> Movie {
        Movie {
            id,
            title: self.title,
            release_date: self.release_date,
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Body of `POST /actors`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateActorRequest {
    /// Required.
    pub name: Option<String>,
    /// Required, non-zero.
    pub age: Option<u32>,
    /// Defaults to `"Other"`.
    pub gender: Option<String>,
    pub movie_id: Option<u64>,
}

impl CreateActorRequest {
    pub fn validate(self) -> Result<NewActor, ApiError> {
        let name = self.name.filter(|n| !n.trim().is_empty());
        let age = self.age.filter(|a| *a > 0);

        let (Some(name), Some(age)) = (name, age) else {
            return Err(ApiError::unprocessable("Name and age are required."));
        };

        Ok(NewActor {
            name,
            age,
            gender: self.gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            movie_id: self.movie_id,
        })
    }
}

/// Body of `PATCH /actors/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// `null` removes the actor from its movie; absent leaves it unchanged.
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<u64>)]
    pub movie_id: Option<Option<u64>>,
}

impl UpdateActorRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApiError::unprocessable("Name cannot be empty."));
        }
        if self.age == Some(0) {
            return Err(ApiError::unprocessable("Age must be greater than zero."));
        }
        Ok(())
    }

    /// Overwrite the supplied fields of `actor`.
    pub fn apply(self, actor: &mut Actor) {
        if let Some(name) = self.name {
            actor.name = name;
        }
        if let Some(age) = self.age {
            actor.age = age;
        }
        if let Some(gender) = self.gender {
            actor.gender = gender;
        }
        if let Some(movie_id) = self.movie_id {
            actor.movie_id = movie_id;
        }
    }
}

/// Body of `POST /movies`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    /// Required.
    pub title: Option<String>,
    /// Required (`YYYY-MM-DD`).
    pub release_date: Option<NaiveDate>,
}

impl CreateMovieRequest {
    pub fn validate(self) -> Result<NewMovie, ApiError> {
        let title = self.title.filter(|t| !t.trim().is_empty());

        let (Some(title), Some(release_date)) = (title, self.release_date) else {
            return Err(ApiError::unprocessable("Title and release date are required."));
        };

        Ok(NewMovie {
            title,
            release_date,
        })
    }
}

/// Body of `PATCH /movies/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl UpdateMovieRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ApiError::unprocessable("Title cannot be empty."));
        }
        Ok(())
    }

    pub fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(release_date) = self.release_date {
            movie.release_date = release_date;
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorListResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieListResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub success: bool,
    /// Identifier of the new record.
    pub created: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorUpdatedResponse {
    pub success: bool,
    pub updated: u64,
    pub actor: Actor,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieUpdatedResponse {
    pub success: bool,
    pub updated: u64,
    pub movie: Movie,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: u64,
}
