// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Movie repository.
//!
//! Deleting a movie un-casts every actor that referenced it within the same
//! write transaction, so `Actor::movie_id` never dangles.

use redb::ReadableTable;

use crate::models::{Actor, Movie, NewMovie};
use crate::storage::database::{
    decode, encode, next_id, CastingDatabase, StoreError, StoreResult, ACTORS, MOVIES,
};

pub struct MovieRepository<'a> {
    db: &'a CastingDatabase,
}

impl<'a> MovieRepository<'a> {
    pub fn new(db: &'a CastingDatabase) -> Self {
        Self { db }
    }

    /// All movies, ordered by id.
    pub fn list(&self) -> StoreResult<Vec<Movie>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MOVIES)?;

        let mut movies = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            movies.push(decode(value.value())?);
        }
        Ok(movies)
    }

    pub fn get(&self, movie_id: u64) -> StoreResult<Movie> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MOVIES)?;
        let movie = table
            .get(movie_id)?
            .map(|value| decode(value.value()))
            .transpose()?;
        movie.ok_or_else(|| not_found(movie_id))
    }

    pub fn create(&self, new_movie: NewMovie) -> StoreResult<Movie> {
        let write_txn = self.db.begin_write()?;
        let movie = {
            let movie = new_movie.into_movie(next_id(&write_txn, "movies")?);
            let mut table = write_txn.open_table(MOVIES)?;
            table.insert(movie.id, encode(&movie)?.as_slice())?;
            movie
        };
        write_txn.commit()?;
        Ok(movie)
    }

    /// Load, modify, and store a movie in one transaction.
    pub fn update(&self, movie_id: u64, change: impl FnOnce(&mut Movie)) -> StoreResult<Movie> {
        let write_txn = self.db.begin_write()?;
        let movie = {
            let mut table = write_txn.open_table(MOVIES)?;

            let existing_bytes = {
                let existing = table.get(movie_id)?.ok_or_else(|| not_found(movie_id))?;
                existing.value().to_vec()
            };

            let mut movie: Movie = decode(&existing_bytes)?;
            change(&mut movie);
            movie.id = movie_id;

            table.insert(movie_id, encode(&movie)?.as_slice())?;
            movie
        };
        write_txn.commit()?;
        Ok(movie)
    }

    /// Delete a movie. Returns the number of actors that were un-cast.
    pub fn delete(&self, movie_id: u64) -> StoreResult<usize> {
        let write_txn = self.db.begin_write()?;
        let released = {
            let mut movies = write_txn.open_table(MOVIES)?;
            if movies.remove(movie_id)?.is_none() {
                return Err(not_found(movie_id));
            }

            let mut actors = write_txn.open_table(ACTORS)?;
            let mut cast = Vec::new();
            for entry in actors.iter()? {
                let (_, value) = entry?;
                let actor: Actor = decode(value.value())?;
                if actor.movie_id == Some(movie_id) {
                    cast.push(actor);
                }
            }

            let released = cast.len();
            for mut actor in cast {
                actor.movie_id = None;
                actors.insert(actor.id, encode(&actor)?.as_slice())?;
            }
            released
        };
        write_txn.commit()?;
        Ok(released)
    }
}

fn not_found(movie_id: u64) -> StoreError {
    StoreError::NotFound(format!("Movie with id {movie_id}"))
}
