//! Requests, responses and URL helpers for the offline worker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub method: Method,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
        }
    }

    /// Only `GET` requests are looked up in or written to the cache.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::Get
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `scheme://authority` of an absolute URL, lower-cased.
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return None;
    }
    Some(format!("{scheme}://{authority}").to_ascii_lowercase())
}

/// Resolves a manifest locator against the worker scope.
///
/// Absolute URLs pass through, `/x` is origin-relative and anything else
/// (`./`, `./x`, `x`) is relative to the scope directory.
pub fn resolve_locator(scope: &str, locator: &str) -> Option<String> {
    if locator.contains("://") {
        return Some(locator.to_string());
    }
    let origin = origin_of(scope)?;
    if locator.starts_with('/') {
        return Some(format!("{origin}{locator}"));
    }

    let path = &scope[scope.find("://")? + 3..];
    let path = path.find('/').map_or("/", |index| &path[index..]);
    let path = path.split(['?', '#']).next().unwrap_or("/");
    let dir = &path[..path.rfind('/').map_or(0, |index| index + 1)];
    let relative = locator.strip_prefix("./").unwrap_or(locator);
    Some(format!("{origin}{dir}{relative}"))
}

/// Cache key for a URL: the URL without its fragment.
pub fn cache_key(url: &str) -> &str {
    url.split('#').next().unwrap_or(url)
}
