//! In-memory repositories for records and equipment.
//!
//! # Responsibility
//! - Own the mutable record tree and equipment list.
//! - Enforce positional-index and selection-cap contracts.
//!
//! # Invariants
//! - Repositories never touch persistence; the session service flushes
//!   after every committed mutation.
//! - Failed operations leave repository state unchanged.

pub mod equipment_repo;
pub mod record_repo;
