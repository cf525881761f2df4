//! redb-based storage layer for durable entities
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `restaurants` | `id` | `Restaurant` | Tenant roots |
//! | `staff` | `id` | `Staff` | Staff accounts |
//! | `categories` | `id` | `Category` | Menu categories |
//! | `menu_items` | `id` | `MenuItem` | Menu items |
//! | `qr_tokens` | `digest` | `QrToken` | Table QR tokens |
//! | `orders` | `id` | `Order` | Orders (active + settled) |
//! | `counters` | name | `u64` | Receipt number counters |
//!
//! Values are JSON-serialized model structs. Queries are full-table scans
//! filtered in memory - datasets are bounded by single-restaurant volumes.
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns, using
//! copy-on-write with atomic pointer swap. The database file is always in a
//! consistent state even across power loss.

mod catalog;
pub(crate) mod orders;
mod restaurants;
mod seed;
mod staff;
mod tokens;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub(crate) const RESTAURANTS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("restaurants");
pub(crate) const STAFF_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("staff");
pub(crate) const CATEGORIES_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("categories");
pub(crate) const MENU_ITEMS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("menu_items");
pub(crate) const QR_TOKENS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("qr_tokens");
pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
pub(crate) const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Domain-rule rejection surfaced through a storage transaction.
    /// Aborts the transaction and unwraps back to the original error.
    #[error("{0}")]
    Domain(shared::AppError),
}

impl From<shared::AppError> for StoreError {
    fn from(e: shared::AppError) -> Self {
        StoreError::Domain(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for shared::AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => shared::AppError::not_found(what),
            StoreError::Conflict(what) => shared::AppError::conflict(what),
            StoreError::Domain(err) => err,
            other => shared::AppError::database(other.to_string()),
        }
    }
}

/// Embedded entity store backed by redb
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish()
    }
}

impl Store {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (tests and ephemeral deployments)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Create all tables so later reads never hit TableDoesNotExist
    fn init_tables(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(RESTAURANTS_TABLE)?;
            let _ = write_txn.open_table(STAFF_TABLE)?;
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
            let _ = write_txn.open_table(QR_TOKENS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Generic JSON-value helpers ==========

    /// Insert or replace an entity
    pub(crate) fn put<T: Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        value: &T,
    ) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut t = write_txn.open_table(table)?;
            t.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get an entity by key
    pub(crate) fn get<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> StoreResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        match t.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Remove an entity by key, returning whether it existed
    pub(crate) fn remove(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut t = write_txn.open_table(table)?;
            t.remove(key)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    /// Scan a whole table, keeping entities matching the filter
    pub(crate) fn scan<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        mut filter: impl FnMut(&T) -> bool,
    ) -> StoreResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        let mut out = Vec::new();
        for entry in t.iter()? {
            let (_, value) = entry?;
            let item: T = serde_json::from_slice(value.value())?;
            if filter(&item) {
                out.push(item);
            }
        }
        Ok(out)
    }

    /// Read-modify-write within a single transaction
    ///
    /// `mutate` receives the current entity; returning Err aborts without
    /// committing. redb serializes writers, so the update is atomic.
    pub(crate) fn update<T, F>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        mutate: F,
    ) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> StoreResult<()>,
    {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut t = write_txn.open_table(table)?;
            let mut entity: T = match t.get(key)? {
                Some(guard) => serde_json::from_slice(guard.value())?,
                None => return Err(StoreError::NotFound(key.to_string())),
            };
            mutate(&mut entity)?;
            let bytes = serde_json::to_vec(&entity)?;
            t.insert(key, bytes.as_slice())?;
            entity
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Increment a named counter and return the new value
    pub(crate) fn increment_counter(&self, name: &str) -> StoreResult<u64> {
        let write_txn = self.db.begin_write()?;
        let next = {
            let mut t = write_txn.open_table(COUNTERS_TABLE)?;
            let current = t.get(name)?.map(|g| g.value()).unwrap_or(0);
            let next = current + 1;
            t.insert(name, next)?;
            next
        };
        write_txn.commit()?;
        Ok(next)
    }
}
