//! Pure validation
//!
//! Side-effect-free checks, split by concern:
//! - **fields**: command payload constraints (amounts, ranges, text lengths)
//! - **transitions**: per-kind status adjacency tables, role and ownership gates
//!
//! Everything here runs strictly before any mutation; a validator failure
//! never leaves partial state behind.

pub mod fields;
pub mod transitions;

pub use fields::validate_payload;
pub use transitions::{ensure_admin, ensure_owner, ensure_role};
