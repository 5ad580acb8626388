//! Journal domain model.
//!
//! # Invariants
//! - At most one entry per date in the persisted list.
//! - Entries are replaced whole, never patched in place.

pub mod entry;
pub mod theme;
