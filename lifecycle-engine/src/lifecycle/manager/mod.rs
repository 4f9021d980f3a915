//! LifecycleEngine - command processing and event emission
//!
//! This module handles:
//! - Command validation (fields, then state under lock)
//! - Per-kind lock acquisition in canonical order
//! - Action execution and atomic collection persistence
//! - Event broadcasting (after commit)
//!
//! # Command Flow
//!
//! ```text
//! execute(cmd)
//!     ├─ 1. Field validation (pure)
//!     ├─ 2. Reserve command_id (atomic duplicate check)
//!     ├─ 3. Acquire written kinds' locks (canonical order)
//!     ├─ 4. Stage collections, run action (check-then-act)
//!     ├─ 5. Persist dirty collections (coupons first, compensated)
//!     ├─ 6. Broadcast event(s)
//!     └─ 7. Return events
//! ```
//!
//! Steps 1-4 never write; a failure there leaves the store byte-identical
//! and releases the reserved command id so the caller may retry.

use crate::config::EngineConfig;
use crate::lifecycle::actions::{CommandAction, write_kinds};
use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::store::{LedgerStore, StorageResult};
use dashmap::DashMap;
use shared::models::Order;
use shared::{AppError, AppResult, Command, ErrorCode, LifecycleEvent};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Lifecycle engine for command processing
///
/// The `epoch` field is a unique identifier generated on each startup;
/// observers can use it to detect engine restarts.
pub struct LifecycleEngine {
    store: LedgerStore,
    config: EngineConfig,
    event_tx: broadcast::Sender<LifecycleEvent>,
    /// Idempotency guard: command ids processed by this engine instance
    processed_commands: Arc<DashMap<String, ()>>,
    epoch: String,
}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl LifecycleEngine {
    /// Create an engine over an existing store
    pub fn new(store: LedgerStore, config: EngineConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = shared::util::new_id();
        tracing::info!(epoch = %epoch, "LifecycleEngine started with new epoch");
        Self {
            store,
            config,
            event_tx,
            processed_commands: Arc::new(DashMap::new()),
            epoch,
        }
    }

    /// Open or create a redb-backed engine at the given path
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> StorageResult<Self> {
        Ok(Self::new(LedgerStore::open(path)?, config))
    }

    /// Get the engine epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying store
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Execute a command and return the emitted events
    ///
    /// Events are broadcast only after the commit succeeds, so subscribers
    /// never observe a transition that was rolled back.
    pub fn execute(&self, cmd: Command) -> AppResult<Vec<LifecycleEvent>> {
        match self.process_command(cmd) {
            Ok(events) => {
                for event in &events {
                    if self.event_tx.send(event.clone()).is_err() {
                        // No active receivers
                        break;
                    }
                }
                Ok(events)
            }
            Err(err) => {
                tracing::debug!(code = %err.code, error = %err, "Command failed");
                Err(err)
            }
        }
    }

    fn process_command(&self, cmd: Command) -> AppResult<Vec<LifecycleEvent>> {
        tracing::debug!(
            command_id = %cmd.command_id,
            command = cmd.payload.name(),
            actor = %cmd.actor_id,
            "Processing command"
        );

        // 1. Field validation (pure, before any state is read)
        crate::validator::validate_payload(&cmd.payload)?;

        // 2. Reserve the command id. `insert` makes the check atomic under
        //    concurrent resubmission; a failed command releases the id so the
        //    caller may retry it.
        if self
            .processed_commands
            .insert(cmd.command_id.clone(), ())
            .is_some()
        {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Err(AppError::conflict(
                ErrorCode::DuplicateCommand,
                format!("Command {} has already been processed", cmd.command_id),
            ));
        }

        match self.apply(&cmd) {
            Ok(events) => {
                tracing::info!(
                    command_id = %cmd.command_id,
                    command = cmd.payload.name(),
                    event_count = events.len(),
                    "Command processed"
                );
                Ok(events)
            }
            Err(err) => {
                self.processed_commands.remove(&cmd.command_id);
                Err(err)
            }
        }
    }

    fn apply(&self, cmd: &Command) -> AppResult<Vec<LifecycleEvent>> {
        // 3. Acquire the written kinds' locks; held until return
        let kinds = write_kinds(&cmd.payload);
        let _guards = self.store.lock_kinds(&kinds);

        // 4. Stage collections and execute the action
        let mut ctx = CommandContext::new(&self.store, &self.config);
        let metadata = CommandMetadata::from(cmd);
        let action = CommandAction::from(cmd);
        let events = action.execute(&mut ctx, &metadata)?;

        // 5. Persist dirty collections (coupons first; a failed later save
        //    rolls the staged coupon redemption back)
        ctx.commit()?;

        Ok(events)
    }

    // ========== Query helpers ==========

    /// Look up one order by id
    pub fn order(&self, id: &str) -> AppResult<Option<Order>> {
        let orders: Vec<Order> = self.store.read()?;
        Ok(orders.into_iter().find(|o| o.id == id))
    }
}

impl Clone for LifecycleEngine {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            event_tx: self.event_tx.clone(),
            processed_commands: self.processed_commands.clone(),
            epoch: self.epoch.clone(),
        }
    }
}
