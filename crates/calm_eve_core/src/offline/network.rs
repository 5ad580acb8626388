use super::request::{Request, Response};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Network request failed before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkError {
    pub url: String,
    pub reason: String,
}

impl NetworkError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl Display for NetworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "network request to `{}` failed: {}", self.url, self.reason)
    }
}

impl Error for NetworkError {}

/// Platform fetch. Implementations are shared across concurrent requests.
pub trait Network: Send + Sync {
    /// Resolves with any HTTP status; only transport failures are errors.
    fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}
