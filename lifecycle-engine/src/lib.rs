//! Marketplace lifecycle engine
//!
//! The engine owns the status-transition state machines for marketplace
//! entities (orders, payouts, disputes, reports, support tickets, projects,
//! proposals, reviews, coupons) over durable key-value persistence:
//!
//! - **store**: persistence gateway and the collection-per-kind ledger store
//! - **validator**: field constraints, transition adjacency tables, role gates
//! - **coupon**: discount math and redemption validity
//! - **lifecycle**: command actions and the engine that runs them
//! - **reconciler**: derived views (balances, statements, totals)
//! - **api**: the thin command surface external callers use
//!
//! # Command Flow
//!
//! ```text
//! Command → MarketplaceApi → LifecycleEngine → Event(s)
//!                                  ↓
//!                          LedgerStore (redb)
//!                                  ↓
//!                          Broadcast to subscribers
//! ```
//!
//! The engine is synchronous: a command acquires its entity-kind locks,
//! re-reads current state, validates, mutates, persists, and releases. All
//! failures surface as [`shared::AppError`] values; recoverable errors never
//! leave partial state behind.

pub mod api;
pub mod config;
pub mod coupon;
pub mod lifecycle;
pub mod reconciler;
pub mod store;
pub mod validator;

// Re-exports
pub use api::MarketplaceApi;
pub use config::EngineConfig;
pub use lifecycle::LifecycleEngine;
pub use reconciler::{PlatformOverview, Reconciler, SellerStatement};
pub use store::{LedgerStore, PersistenceGateway, RedbGateway, StorageError};

// Re-export shared types for convenience
pub use shared::{
    AppError, AppResult, Command, CommandPayload, EntityKind, ErrorCategory, ErrorCode, EventType,
    LifecycleEvent, Role,
};
