//! Ledger store - typed collection access with per-kind locking
//!
//! Each entity kind maps to one persisted collection. Writers must hold the
//! kind's mutex for the whole read-validate-mutate-persist section; readers
//! take no lock and rely on the gateway's atomic save for a consistent
//! snapshot.

use super::gateway::{PersistenceGateway, RedbGateway, StorageResult};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    Coupon, Dispute, EntityKind, Order, Payout, Project, Proposal, Report, Review, SupportTicket,
};
use std::path::Path;
use std::sync::Arc;

/// Binds an entity type to its collection
pub trait Persisted: Serialize + DeserializeOwned {
    const KIND: EntityKind;
}

impl Persisted for Coupon {
    const KIND: EntityKind = EntityKind::Coupon;
}
impl Persisted for Order {
    const KIND: EntityKind = EntityKind::Order;
}
impl Persisted for Payout {
    const KIND: EntityKind = EntityKind::Payout;
}
impl Persisted for Dispute {
    const KIND: EntityKind = EntityKind::Dispute;
}
impl Persisted for Report {
    const KIND: EntityKind = EntityKind::Report;
}
impl Persisted for SupportTicket {
    const KIND: EntityKind = EntityKind::SupportTicket;
}
impl Persisted for Project {
    const KIND: EntityKind = EntityKind::Project;
}
impl Persisted for Proposal {
    const KIND: EntityKind = EntityKind::Proposal;
}
impl Persisted for Review {
    const KIND: EntityKind = EntityKind::Review;
}

const KIND_COUNT: usize = EntityKind::ALL.len();

/// Collection store with one mutex per entity kind
///
/// `Clone` is cheap; the gateway and locks are `Arc`-shared, so clones guard
/// the same collections.
#[derive(Clone)]
pub struct LedgerStore {
    gateway: Arc<dyn PersistenceGateway>,
    locks: Arc<[Mutex<()>; KIND_COUNT]>,
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore").finish()
    }
}

impl LedgerStore {
    /// Open or create a redb-backed store at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::with_gateway(Arc::new(RedbGateway::open(path)?)))
    }

    /// Open an in-memory redb-backed store (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::with_gateway(Arc::new(RedbGateway::open_in_memory()?)))
    }

    /// Build a store over an arbitrary persistence gateway
    pub fn with_gateway(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            locks: Arc::new(std::array::from_fn(|_| Mutex::new(()))),
        }
    }

    /// Read a collection snapshot; an unsaved collection reads as empty
    pub fn read<T: Persisted>(&self) -> StorageResult<Vec<T>> {
        match self.gateway.load(T::KIND.collection_name())? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Atomically replace a collection
    ///
    /// The caller must hold the kind's lock when this write is part of a
    /// read-modify-write cycle.
    pub fn write<T: Persisted>(&self, items: &[T]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(items)?;
        self.gateway.save(T::KIND.collection_name(), &bytes)
    }

    /// Acquire the given kinds' locks in canonical order
    ///
    /// Deduplicates and sorts so that every caller acquires in the same
    /// order regardless of how the kinds were listed.
    pub fn lock_kinds(&self, kinds: &[EntityKind]) -> Vec<MutexGuard<'_, ()>> {
        let mut sorted: Vec<EntityKind> = kinds.to_vec();
        sorted.sort();
        sorted.dedup();
        sorted
            .into_iter()
            .map(|kind| self.locks[kind as usize].lock())
            .collect()
    }
}
