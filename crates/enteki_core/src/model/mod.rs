//! Record domain model for archery sessions.
//!
//! # Responsibility
//! - Define the canonical shapes shared by the record store, the calendar
//!   and the persistence codecs.
//!
//! # Invariants
//! - A shot's score is derived from its coordinates when it is created and
//!   never edited afterwards.
//! - A stand never selects more than `MAX_SELECTED_EQUIPMENT` items.
//! - `DateKey` text is always zero-padded `YYYY-MM-DD`.

pub mod equipment;
pub mod record_key;
pub mod shot;
pub mod stand;
