// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded casting database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `actors`: actor id → serialized Actor (JSON bytes)
//! - `movies`: movie id → serialized Movie (JSON bytes)
//! - `sequences`: table name → last allocated id
//!
//! Ids start at 1 and are never reused, even after the record is deleted.

use std::path::Path;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

pub(crate) const ACTORS: TableDefinition<u64, &[u8]> = TableDefinition::new("actors");

pub(crate) const MOVIES: TableDefinition<u64, &[u8]> = TableDefinition::new("movies");

/// Id allocator: table name → last id handed out.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    /// A foreign key points at a record that does not exist.
    #[error("missing reference: {0}")]
    MissingReference(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// CastingDatabase
// =============================================================================

pub struct CastingDatabase {
    db: Database,
}

impl CastingDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACTORS)?;
            let _ = write_txn.open_table(MOVIES)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    pub(crate) fn begin_read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    /// Cheap liveness probe: opens a read transaction and both record tables.
    pub fn check(&self) -> StoreResult<()> {
        let read_txn = self.begin_read()?;
        let _ = read_txn.open_table(ACTORS)?;
        let _ = read_txn.open_table(MOVIES)?;
        Ok(())
    }
}

// =============================================================================
// Helpers shared by the repositories
// =============================================================================

/// Allocate the next id for `table` inside an open write transaction.
pub(crate) fn next_id(write_txn: &WriteTransaction, table: &str) -> StoreResult<u64> {
    let mut sequences = write_txn.open_table(SEQUENCES)?;
    let last = sequences.get(table)?.map(|v| v.value()).unwrap_or(0);
    let next = last + 1;
    sequences.insert(table, next)?;
    Ok(next)
}

pub(crate) fn encode<T: Serialize>(record: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(record)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
pub(crate) fn temp_db() -> (CastingDatabase, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = CastingDatabase::open(&dir.path().join("casting.redb")).unwrap();
    (db, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_tables() {
        let (db, _dir) = temp_db();
        db.check().unwrap();
    }

    #[test]
    fn ids_are_allocated_per_table() {
        let (db, _dir) = temp_db();

        let write_txn = db.begin_write().unwrap();
        assert_eq!(next_id(&write_txn, "actors").unwrap(), 1);
        assert_eq!(next_id(&write_txn, "actors").unwrap(), 2);
        assert_eq!(next_id(&write_txn, "movies").unwrap(), 1);
        write_txn.commit().unwrap();

        let write_txn = db.begin_write().unwrap();
        assert_eq!(next_id(&write_txn, "actors").unwrap(), 3);
    }

    #[test]
    fn reopening_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("casting.redb");

        {
            let db = CastingDatabase::open(&path).unwrap();
            let write_txn = db.begin_write().unwrap();
            next_id(&write_txn, "movies").unwrap();
            write_txn.commit().unwrap();
        }

        let db = CastingDatabase::open(&path).unwrap();
        let write_txn = db.begin_write().unwrap();
        assert_eq!(next_id(&write_txn, "movies").unwrap(), 2);
    }
}
