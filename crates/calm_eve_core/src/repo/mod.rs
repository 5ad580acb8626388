//! Entry persistence contracts.
//!
//! # Responsibility
//! - Read and write the whole entry list as one stored value.
//! - Keep the storage encoding out of the services.
//!
//! # Invariants
//! - `save` replaces the stored list in one write.
//! - `load` never fails on malformed stored data; it yields an empty list.

pub mod entry_repo;
