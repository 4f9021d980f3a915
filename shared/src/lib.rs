//! Shared types for the marketplace lifecycle engine
//!
//! Common vocabulary used by the engine and any transport layer on top of it:
//! entity models with their status enums, the command/event types, and the
//! unified error module.

pub mod error;
pub mod lifecycle;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use lifecycle::{Command, CommandPayload, EventType, LifecycleEvent, Role};
pub use models::EntityKind;
