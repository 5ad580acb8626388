//! Runtime configuration for the journal core and its offline worker.
//!
//! Values come from `Default` and may be overridden from the environment.
//! Blank environment values are ignored.

use crate::logging::default_log_level;
use std::path::PathBuf;

const ENV_LOG_LEVEL: &str = "CALM_EVE_LOG_LEVEL";
const ENV_LOG_DIR: &str = "CALM_EVE_LOG_DIR";
const ENV_DB_PATH: &str = "CALM_EVE_DB_PATH";
const ENV_CACHE_VERSION: &str = "CALM_EVE_CACHE_VERSION";
const ENV_SCOPE: &str = "CALM_EVE_SCOPE";

/// Bump on every release of the own-origin assets.
pub const DEFAULT_CACHE_VERSION: &str = "mood-cache-v7";
pub const DEFAULT_SCOPE: &str = "http://localhost:8080/";
pub const CHART_LIBRARY_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";
pub const DEFAULT_DB_FILE: &str = "calm_eve.sqlite3";

/// Asset locators precached at install time.
pub const DEFAULT_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./app.js",
    "./manifest.webmanifest",
    CHART_LIBRARY_URL,
];

/// Offline worker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Name of the one current cache bucket.
    pub version: String,
    /// Absolute URL the worker controls; relative locators resolve against it.
    pub scope: String,
    pub assets: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CACHE_VERSION.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            assets: DEFAULT_ASSETS.iter().map(|asset| asset.to_string()).collect(),
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: String,
    /// File logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub db_path: PathBuf,
    pub cache: CacheConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            cache: CacheConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Applies overrides from `lookup`, skipping absent or blank values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = read(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(version) = read(ENV_CACHE_VERSION) {
            self.cache.version = version;
        }
        if let Some(scope) = read(ENV_SCOPE) {
            self.cache.scope = scope;
        }
    }
}
