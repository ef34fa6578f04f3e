//! Browser automation capability.
//!
//! The portal code only talks to the [`Session`] and [`Element`] traits, so the
//! scroll loop and form driving can run against Chrome in production and a
//! scripted fake in tests.

pub mod chrome;
pub mod environment;
pub mod errors;

pub use chrome::ChromeSession;
pub use errors::{BrowserError, EnvironmentError};

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

pub type Result<T, E = BrowserError> = std::result::Result<T, E>;

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    Css(String),
    Tag(String),
    XPath(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// CSS equivalent, if one exists.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Id(id) => Some(format!("[id=\"{}\"]", id.replace('"', "\\\""))),
            Self::Css(selector) => Some(selector.clone()),
            Self::Tag(name) => Some(name.clone()),
            Self::XPath(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Css(selector) => write!(f, "css={selector}"),
            Self::Tag(name) => write!(f, "tag={name}"),
            Self::XPath(expr) => write!(f, "xpath={expr}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    Present,
    Clickable,
}

impl WaitCondition {
    fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Clickable => "clickable",
        }
    }
}

/// A handle to a rendered DOM element.
#[async_trait]
pub trait Element: Send + Sync + Sized {
    /// Descendants of this element matching `locator`.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>>;

    async fn inner_html(&self) -> Result<String>;

    /// Rendered text content.
    async fn text(&self) -> Result<String>;

    /// Assign `value` from script and dispatch `input`/`change`, bypassing
    /// widgets that swallow keystrokes.
    async fn set_value(&self, value: &str) -> Result<()>;

    async fn clear_and_type(&self, text: &str) -> Result<()>;

    /// Pick the `<option>` whose visible text equals `text`.
    async fn select_by_visible_text(&self, text: &str) -> Result<()>;

    async fn click(&self) -> Result<()>;

    /// Displayed and not disabled.
    async fn is_clickable(&self) -> Result<bool>;

    async fn scroll_top(&self) -> Result<i64>;

    async fn scroll_by(&self, dy: i64) -> Result<()>;
}

/// One browser session (one page).
#[async_trait]
pub trait Session: Send + Sync {
    type Element: Element;

    async fn goto(&self, url: &str) -> Result<()>;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>>;

    /// Release the browser. Safe to call more than once.
    async fn close(&mut self) -> Result<()>;
}

/// First element matching `locator`.
pub async fn find_one<S: Session>(session: &S, locator: &Locator) -> Result<S::Element> {
    session
        .find_all(locator)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| BrowserError::NotFound(locator.to_string()))
}

/// Poll until an element matching `locator` satisfies `condition`, or `timeout` elapses.
///
/// Lookup errors while polling count as "not yet"; the last one is dropped in
/// favour of a [`BrowserError::Timeout`].
pub async fn wait_for<S: Session>(
    session: &S,
    locator: &Locator,
    condition: WaitCondition,
    timeout: Duration,
    poll: Duration,
) -> Result<S::Element> {
    let deadline = Instant::now() + timeout;

    loop {
        match session.find_all(locator).await {
            Ok(elements) => {
                if let Some(element) = elements.into_iter().next() {
                    let ready = match condition {
                        WaitCondition::Present => true,
                        WaitCondition::Clickable => element.is_clickable().await.unwrap_or(false),
                    };
                    if ready {
                        return Ok(element);
                    }
                }
            }
            Err(e) => trace!(%locator, error = %e, "lookup failed while waiting"),
        }

        if Instant::now() >= deadline {
            return Err(BrowserError::Timeout {
                locator: locator.to_string(),
                condition: condition.as_str(),
                waited: timeout,
            });
        }
        tokio::time::sleep(poll).await;
    }
}
