//! Core logic for Calm Eve, an offline-first mood journal.
//! This crate owns entry persistence, theme resolution, backup/restore and
//! the offline worker's cache strategy; hosts supply storage, clock, OS
//! scheme, network and rendering through traits.

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod offline;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use app::{handle_event, AppEvent, AppState, Dispatcher, Effect, Host, Transition};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CacheConfig, CoreConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::entry::{date_key, Entry, Mood};
pub use model::theme::{EffectiveTheme, ThemePreference};
pub use offline::{
    CacheController, CacheError, CacheStorage, FetchError, MemoryCacheStorage, Method, Network,
    NetworkError, Request, Response, ResponseSource, Served, WorkerState,
};
pub use repo::entry_repo::{EntryRepository, KvEntryRepository};
pub use service::backup_service::{
    BackupCoordinator, BackupError, ImportSummary, RestoreMode, Restored, Snapshot,
};
pub use service::entry_store::{compute_streak, record_today, EntryStore, SaveOutcome};
pub use service::install_service::{InstallCoordinator, InstallOutcome, InstallPrompt};
pub use service::mood::{encouragement_for, score_for};
pub use service::theme_service::{
    color_for, resolve_effective, stored_preference, StaticScheme, SystemScheme,
    ThemeApplication, ThemeResolver,
};
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError};
pub use view::{journal_view, JournalView, MoodChart, RecentCard, Renderer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
