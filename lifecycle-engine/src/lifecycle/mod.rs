//! Lifecycle module
//!
//! - **traits**: command context, metadata, and the `CommandHandler` trait
//! - **actions**: one handler per command
//! - **manager**: the `LifecycleEngine` that validates, locks, runs actions,
//!   persists, and broadcasts events

pub mod actions;
pub mod manager;
pub mod traits;

// Re-exports
pub use manager::LifecycleEngine;
pub use traits::{CommandContext, CommandHandler, CommandMetadata};
