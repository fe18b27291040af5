use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// How an element is looked up while waiting for a page to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Class(String),
    Tag(String),
    Css(String),
}

impl Locator {
    pub fn class(name: impl Into<String>) -> Self {
        Locator::Class(name.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Locator::Tag(name.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn to_css(&self) -> String {
        match self {
            Locator::Class(name) => format!(".{name}"),
            Locator::Tag(name) => name.clone(),
            Locator::Css(selector) => selector.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Class(name) => write!(f, "class {name}"),
            Locator::Tag(name) => write!(f, "tag <{name}>"),
            Locator::Css(selector) => write!(f, "selector {selector}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },
    #[error("element not found: {0}")]
    NotFound(String),
    #[error("stale element: {0}")]
    Stale(String),
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("browser protocol error: {0}")]
    Protocol(String),
}

impl BrowserError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. })
    }

    /// Failures worth retrying a click for.
    pub fn is_transient(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. } | BrowserError::Stale(_))
    }
}

/// A single controllable browser tab.
///
/// Calls mutate shared page state, so a session is driven by one caller at a time.
#[async_trait::async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Blocks until `locator` matches an element or `timeout` elapses
    /// (`BrowserError::Timeout`).
    async fn wait_for(&mut self, locator: &Locator, timeout: Duration)
        -> Result<(), BrowserError>;

    /// Rendered HTML of the current page.
    async fn page_source(&mut self) -> Result<String, BrowserError>;

    /// Class attribute of the parent of the first element matching `selector`.
    /// `Ok(None)` when no element matches.
    async fn parent_class(&mut self, selector: &str) -> Result<Option<String>, BrowserError>;

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;
}
