//! Persistence layer
//!
//! - **gateway**: the [`PersistenceGateway`] trait (collection blob load/save)
//!   and its redb-backed implementation
//! - **ledger**: typed collection access with per-kind mutual exclusion

mod gateway;
mod ledger;

pub use gateway::{PersistenceGateway, RedbGateway, StorageError, StorageResult};
pub use ledger::{LedgerStore, Persisted};
