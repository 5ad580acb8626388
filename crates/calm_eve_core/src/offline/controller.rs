//! Worker lifecycle and fetch strategy.

use super::cache::CacheStorage;
use super::network::{Network, NetworkError};
use super::request::{origin_of, resolve_locator, Request, Response};
use crate::config::CacheConfig;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A manifest asset could not be fetched at install time.
    AssetFetch {
        locator: String,
        source: NetworkError,
    },
    /// A manifest asset answered with a non-2xx status at install time.
    AssetStatus { locator: String, status: u16 },
    /// The scope or a locator is not a resolvable URL.
    InvalidUrl(String),
    InvalidTransition {
        from: WorkerState,
        event: &'static str,
    },
    Storage(String),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AssetFetch { locator, source } => {
                write!(f, "cannot precache `{locator}`: {}", source.reason)
            }
            Self::AssetStatus { locator, status } => {
                write!(f, "cannot precache `{locator}`: status {status}")
            }
            Self::InvalidUrl(value) => write!(f, "not a resolvable url: `{value}`"),
            Self::InvalidTransition { from, event } => {
                write!(f, "worker in state {from:?} cannot handle `{event}`")
            }
            Self::Storage(reason) => write!(f, "cache storage failed: {reason}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AssetFetch { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fetch handler failure visible to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Own-origin miss and the network failed.
    Network(NetworkError),
    /// Cross-origin network failure with nothing cached.
    NoCachedFallback(NetworkError),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(err) => write!(f, "{err}"),
            Self::NoCachedFallback(err) => write!(f, "{err}; no cached copy available"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(err) | Self::NoCachedFallback(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Install failed; the platform retries with a fresh worker.
    Redundant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
}

/// Response chosen by the fetch handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub response: Response,
    pub source: ResponseSource,
}

impl Served {
    fn from_cache(response: Response) -> Self {
        Self {
            response,
            source: ResponseSource::Cache,
        }
    }

    fn from_network(response: Response) -> Self {
        Self {
            response,
            source: ResponseSource::Network,
        }
    }
}

/// Offline worker for one cache version.
pub struct CacheController<S: CacheStorage, N: Network> {
    config: CacheConfig,
    origin: String,
    storage: S,
    network: N,
    state: WorkerState,
    skip_waiting: bool,
    clients_claimed: bool,
}

impl<S: CacheStorage, N: Network> CacheController<S, N> {
    /// Creates a worker controlling `config.scope`.
    ///
    /// # Errors
    /// - `InvalidUrl` when the scope has no origin.
    pub fn new(config: CacheConfig, storage: S, network: N) -> CacheResult<Self> {
        let origin =
            origin_of(&config.scope).ok_or_else(|| CacheError::InvalidUrl(config.scope.clone()))?;
        Ok(Self {
            config,
            origin,
            storage,
            network,
            state: WorkerState::Parsed,
            skip_waiting: false,
            clients_claimed: false,
        })
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether install asked to replace the previous worker immediately.
    pub fn skips_waiting(&self) -> bool {
        self.skip_waiting
    }

    /// Whether activation took control of already-open pages.
    pub fn claims_clients(&self) -> bool {
        self.clients_claimed
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Precaches every manifest asset into the current bucket.
    ///
    /// Nothing is written unless all assets fetch with a 2xx status.
    ///
    /// # Errors
    /// - `AssetFetch` or `AssetStatus` for the first unreachable or non-2xx
    ///   asset; the worker becomes `Redundant`.
    pub fn install(&mut self) -> CacheResult<()> {
        self.transition(WorkerState::Parsed, WorkerState::Installing, "install")?;
        self.skip_waiting = true;
        info!(
            "event=worker_install module=offline status=start version={} assets={}",
            self.config.version,
            self.config.assets.len()
        );

        match self.precache() {
            Ok(count) => {
                self.state = WorkerState::Installed;
                info!(
                    "event=worker_install module=offline status=ok version={} cached={count}",
                    self.config.version
                );
                Ok(())
            }
            Err(err) => {
                self.state = WorkerState::Redundant;
                error!(
                    "event=worker_install module=offline status=error version={} error={err}",
                    self.config.version
                );
                Err(err)
            }
        }
    }

    /// Deletes every bucket but the current one and claims open pages.
    ///
    /// Returns the deleted bucket names.
    ///
    /// # Errors
    /// - `Storage` when listing or deleting buckets fails; the worker becomes
    ///   `Redundant` and never claims clients.
    pub fn activate(&mut self) -> CacheResult<Vec<String>> {
        self.transition(WorkerState::Installed, WorkerState::Activating, "activate")?;

        match self.delete_stale() {
            Ok(stale) => {
                self.state = WorkerState::Activated;
                self.clients_claimed = true;
                info!(
                    "event=worker_activate module=offline status=ok version={} deleted={}",
                    self.config.version,
                    stale.len()
                );
                Ok(stale)
            }
            Err(err) => {
                self.state = WorkerState::Redundant;
                error!(
                    "event=worker_activate module=offline status=error version={} error={err}",
                    self.config.version
                );
                Err(err)
            }
        }
    }

    /// Decides the response for one intercepted request.
    ///
    /// Before activation requests go straight to the network.
    pub fn handle_fetch(&self, request: &Request) -> Result<Served, FetchError> {
        if self.state != WorkerState::Activated {
            return self
                .network
                .fetch(request)
                .map(Served::from_network)
                .map_err(FetchError::Network);
        }

        if self.is_own_origin(&request.url) {
            self.cache_first(request)
        } else {
            self.network_first(request)
        }
    }

    fn is_own_origin(&self, url: &str) -> bool {
        origin_of(url).is_some_and(|origin| origin == self.origin)
    }

    fn cache_first(&self, request: &Request) -> Result<Served, FetchError> {
        if request.is_cacheable() {
            if let Some(cached) = self.lookup(&request.url) {
                debug!("event=worker_fetch module=offline strategy=cache_first source=cache");
                return Ok(Served::from_cache(cached));
            }
        }
        self.network
            .fetch(request)
            .map(Served::from_network)
            .map_err(FetchError::Network)
    }

    fn network_first(&self, request: &Request) -> Result<Served, FetchError> {
        match self.network.fetch(request) {
            Ok(response) => {
                if request.is_cacheable() {
                    if let Err(err) =
                        self.storage
                            .put(&self.config.version, &request.url, response.clone())
                    {
                        warn!(
                            "event=worker_cache_put module=offline status=error error={err}"
                        );
                    }
                }
                Ok(Served::from_network(response))
            }
            Err(err) => {
                let cached = request
                    .is_cacheable()
                    .then(|| self.lookup(&request.url))
                    .flatten();
                match cached {
                    Some(cached) => {
                        debug!(
                            "event=worker_fetch module=offline strategy=network_first source=cache_fallback"
                        );
                        Ok(Served::from_cache(cached))
                    }
                    None => {
                        warn!(
                            "event=worker_fetch module=offline strategy=network_first status=error error_code=no_fallback"
                        );
                        Err(FetchError::NoCachedFallback(err))
                    }
                }
            }
        }
    }

    fn lookup(&self, url: &str) -> Option<Response> {
        match self.storage.match_any(url) {
            Ok(hit) => hit,
            Err(err) => {
                warn!("event=worker_cache_match module=offline status=error error={err}");
                None
            }
        }
    }

    fn delete_stale(&self) -> CacheResult<Vec<String>> {
        let stale: Vec<String> = self
            .storage
            .keys()?
            .into_iter()
            .filter(|name| *name != self.config.version)
            .collect();
        for name in &stale {
            self.storage.delete(name)?;
        }
        Ok(stale)
    }

    fn precache(&self) -> CacheResult<usize> {
        let mut fetched = Vec::with_capacity(self.config.assets.len());
        for locator in &self.config.assets {
            let url = resolve_locator(&self.config.scope, locator)
                .ok_or_else(|| CacheError::InvalidUrl(locator.clone()))?;
            let response = self
                .network
                .fetch(&Request::get(url.clone()))
                .map_err(|source| CacheError::AssetFetch {
                    locator: locator.clone(),
                    source,
                })?;
            if !response.is_ok() {
                return Err(CacheError::AssetStatus {
                    locator: locator.clone(),
                    status: response.status,
                });
            }
            fetched.push((url, response));
        }

        let count = fetched.len();
        self.storage.open(&self.config.version)?;
        self.storage.put_all(&self.config.version, fetched)?;
        Ok(count)
    }

    fn transition(
        &mut self,
        expected: WorkerState,
        next: WorkerState,
        event: &'static str,
    ) -> CacheResult<()> {
        if self.state != expected {
            return Err(CacheError::InvalidTransition {
                from: self.state,
                event,
            });
        }
        self.state = next;
        Ok(())
    }
}
