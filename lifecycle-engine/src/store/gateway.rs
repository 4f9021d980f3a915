//! redb-based persistence gateway
//!
//! Collections are stored whole: one JSON blob per collection name in a
//! single `collections` table. Every save runs in its own redb write
//! transaction, so a later load observes either the previous blob or the new
//! one, never a partial write.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: commits are
//! persistent as soon as `commit()` returns, using copy-on-write with an
//! atomic pointer swap. The database file is always in a consistent state.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::{AppError, ErrorCode};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table holding one JSON blob per collection: key = collection name
const COLLECTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
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

    #[error("Gateway error: {0}")]
    Gateway(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let code = match &err {
            StorageError::Serialization(_) => ErrorCode::SerializationFailed,
            _ => ErrorCode::PersistenceFailed,
        };
        tracing::error!(error = %err, error_code = ?code, "Storage error occurred");
        AppError::with_message(code, err.to_string())
    }
}

/// Durable collection blob storage
///
/// The engine requires only that `save` is atomic: no partial write may be
/// visible to a subsequent `load`. Whether the backing store is a file, an
/// embedded database, or something remote is the implementation's business.
pub trait PersistenceGateway: Send + Sync {
    /// Load a collection blob; `None` if the collection was never saved
    fn load(&self, collection: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Atomically replace a collection blob
    fn save(&self, collection: &str, bytes: &[u8]) -> StorageResult<()>;
}

/// Persistence gateway backed by redb
#[derive(Clone)]
pub struct RedbGateway {
    db: Arc<Database>,
}

impl RedbGateway {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(COLLECTIONS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl PersistenceGateway for RedbGateway {
    fn load(&self, collection: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COLLECTIONS_TABLE)?;
        Ok(table.get(collection)?.map(|guard| guard.value().to_vec()))
    }

    fn save(&self, collection: &str, bytes: &[u8]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COLLECTIONS_TABLE)?;
            table.insert(collection, bytes)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
