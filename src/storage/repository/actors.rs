// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Actor repository.
//!
//! An actor's `movie_id` is checked against the movies table inside the same
//! write transaction that stores the actor.

use redb::{ReadableTable, WriteTransaction};

use crate::models::{Actor, NewActor};
use crate::storage::database::{
    decode, encode, next_id, CastingDatabase, StoreError, StoreResult, ACTORS, MOVIES,
};

pub struct ActorRepository<'a> {
    db: &'a CastingDatabase,
}

impl<'a> ActorRepository<'a> {
    pub fn new(db: &'a CastingDatabase) -> Self {
        Self { db }
    }

    /// All actors, ordered by id.
    pub fn list(&self) -> StoreResult<Vec<Actor>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTORS)?;

        let mut actors = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            actors.push(decode(value.value())?);
        }
        Ok(actors)
    }

    pub fn get(&self, actor_id: u64) -> StoreResult<Actor> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTORS)?;
        let actor = table
            .get(actor_id)?
            .map(|value| decode(value.value()))
            .transpose()?;
        actor.ok_or_else(|| not_found(actor_id))
    }

    /// Insert a new actor.
    ///
    /// Fails with [`StoreError::MissingReference`] if `movie_id` names a
    /// movie that does not exist; nothing is written in that case.
    pub fn create(&self, new_actor: NewActor) -> StoreResult<Actor> {
        let write_txn = self.db.begin_write()?;
        ensure_movie_exists(&write_txn, new_actor.movie_id)?;

        let actor = {
            let actor = new_actor.into_actor(next_id(&write_txn, "actors")?);
            let mut table = write_txn.open_table(ACTORS)?;
            table.insert(actor.id, encode(&actor)?.as_slice())?;
            actor
        };
        write_txn.commit()?;
        Ok(actor)
    }

    /// Load, modify, and store an actor in one transaction.
    pub fn update(&self, actor_id: u64, change: impl FnOnce(&mut Actor)) -> StoreResult<Actor> {
        let write_txn = self.db.begin_write()?;

        let existing_bytes = {
            let table = write_txn.open_table(ACTORS)?;
            let existing = table.get(actor_id)?.ok_or_else(|| not_found(actor_id))?;
            existing.value().to_vec()
        };

        let mut actor: Actor = decode(&existing_bytes)?;
        let previous_movie = actor.movie_id;
        change(&mut actor);
        actor.id = actor_id;

        if actor.movie_id != previous_movie {
            ensure_movie_exists(&write_txn, actor.movie_id)?;
        }

        {
            let mut table = write_txn.open_table(ACTORS)?;
            table.insert(actor_id, encode(&actor)?.as_slice())?;
        }
        write_txn.commit()?;
        Ok(actor)
    }

    pub fn delete(&self, actor_id: u64) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ACTORS)?;
            if table.remove(actor_id)?.is_none() {
                return Err(not_found(actor_id));
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn ensure_movie_exists(write_txn: &WriteTransaction, movie_id: Option<u64>) -> StoreResult<()> {
    let Some(movie_id) = movie_id else {
        return Ok(());
    };

    let movies = write_txn.open_table(MOVIES)?;
    let found = movies.get(movie_id)?.is_some();
    if found {
        Ok(())
    } else {
        Err(StoreError::MissingReference(format!(
            "Movie with id {movie_id}"
        )))
    }
}

fn not_found(actor_id: u64) -> StoreError {
    StoreError::NotFound(format!("Actor with id {actor_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMovie;
    use crate::storage::database::temp_db;
    use crate::storage::MovieRepository;
    use chrono::NaiveDate;

    fn new_actor(name: &str, movie_id: Option<u64>) -> NewActor {
        NewActor {
            name: name.to_string(),
            age: 25,
            gender: "Other".to_string(),
            movie_id,
        }
    }

    fn seed_movie(db: &CastingDatabase) -> u64 {
        MovieRepository::new(db)
            .create(NewMovie {
                title: "With you".into(),
                release_date: NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(),
            })
            .unwrap()
            .id
    }

    #[test]
    fn create_and_get_actor() {
        let (db, _dir) = temp_db();
        let movie_id = seed_movie(&db);
        let repo = ActorRepository::new(&db);

        let actor = repo.create(new_actor("Sanh Tuan", Some(movie_id))).unwrap();
        assert_eq!(actor.id, 1);
        assert_eq!(repo.get(actor.id).unwrap(), actor);
    }

    #[test]
    fn create_with_unknown_movie_writes_nothing() {
        let (db, _dir) = temp_db();
        let repo = ActorRepository::new(&db);

        let result = repo.create(new_actor("Ghost", Some(99)));
        assert!(matches!(result, Err(StoreError::MissingReference(_))));
        assert!(repo.list().unwrap().is_empty());

        // The aborted transaction must not have consumed an id either.
        let actor = repo.create(new_actor("Real", None)).unwrap();
        assert_eq!(actor.id, 1);
    }

    #[test]
    fn update_applies_change_and_checks_movie() {
        let (db, _dir) = temp_db();
        let movie_id = seed_movie(&db);
        let repo = ActorRepository::new(&db);
        let actor = repo.create(new_actor("Sanh Tuan", None)).unwrap();

        let updated = repo.update(actor.id, |a| a.movie_id = Some(movie_id)).unwrap();
        assert_eq!(updated.movie_id, Some(movie_id));

        let result = repo.update(actor.id, |a| a.movie_id = Some(500));
        assert!(matches!(result, Err(StoreError::MissingReference(_))));
        assert_eq!(repo.get(actor.id).unwrap().movie_id, Some(movie_id));
    }

    #[test]
    fn update_is_idempotent() {
        let (db, _dir) = temp_db();
        let repo = ActorRepository::new(&db);
        let actor = repo.create(new_actor("Sanh Tuan", None)).unwrap();

        let first = repo.update(actor.id, |a| a.age = 30).unwrap();
        let second = repo.update(actor.id, |a| a.age = 30).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn delete_then_delete_again_is_not_found() {
        let (db, _dir) = temp_db();
        let repo = ActorRepository::new(&db);
        let actor = repo.create(new_actor("Sanh Tuan", None)).unwrap();

        repo.delete(actor.id).unwrap();
        assert!(matches!(repo.get(actor.id), Err(StoreError::NotFound(_))));
        assert!(matches!(repo.delete(actor.id), Err(StoreError::NotFound(_))));
    }
}
