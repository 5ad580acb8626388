//! Offline worker: versioned asset cache and per-request fetch strategy.
//!
//! # Responsibility
//! - Precache the asset manifest into the bucket named by the cache version.
//! - Delete every other bucket on activation.
//! - Serve own-origin requests cache-first and cross-origin requests
//!   network-first with a cache fallback.
//!
//! # Invariants
//! - Exactly one bucket is current per version string.
//! - Install is all-or-nothing; one unreachable asset fails it.
//! - Requests are decided independently; overlapping cache writes for one
//!   key resolve as last-write-wins.

mod cache;
mod controller;
mod network;
mod request;

pub use cache::{CacheStorage, MemoryCacheStorage};
pub use controller::{
    CacheController, CacheError, CacheResult, FetchError, ResponseSource, Served, WorkerState,
};
pub use network::{Network, NetworkError};
pub use request::{cache_key, origin_of, resolve_locator, Method, Request, Response};
