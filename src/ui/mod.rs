// src/ui/mod.rs
//! The UI capability the collation core runs against.
//!
//! The core never touches a browser directly. It asks a [`Ui`] to find
//! elements, read their rendered text, and click them. Handles are opaque and
//! may go stale whenever the page re-renders; every operation on a stale
//! handle reports [`UiError::Stale`].
//!
//! Backends:
//! - [`mock::MockPage`]: in-memory pivot page (tests, benches, dry runs)
//! - `chrome::ChromeUi`: real browser via `headless_chrome` (feature `chrome`)

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod mock;

#[cfg(feature = "chrome")]
pub mod chrome;

/// How an element is located. Interpreted by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    Css(String),
    XPath(String),
    ClassName(String),
}

impl Selector {
    pub fn css(s: &str) -> Self { Selector::Css(s!(s)) }
    pub fn xpath(s: &str) -> Self { Selector::XPath(s!(s)) }
    pub fn class(s: &str) -> Self { Selector::ClassName(s!(s)) }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(s) => write!(f, "css `{s}`"),
            Selector::XPath(s) => write!(f, "xpath `{s}`"),
            Selector::ClassName(s) => write!(f, "class `{s}`"),
        }
    }
}

/// Where a lookup starts: the whole document or below a known element.
#[derive(Debug)]
pub enum Scope<'a, H> {
    Document,
    Within(&'a H),
}

impl<H> Clone for Scope<'_, H> {
    fn clone(&self) -> Self { *self }
}
impl<H> Copy for Scope<'_, H> {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("timed out waiting for {0}")]
    Timeout(String),
    #[error("stale element reference")]
    Stale,
    #[error("{0}")]
    Backend(String),
}

pub type UiResult<T> = Result<T, UiError>;

/// Blocking wait-then-act access to one live page.
///
/// All calls take `&mut self`: the collation driver is the page's only
/// writer and never issues two interactions at once.
pub trait Ui {
    type Handle: Clone + fmt::Debug;

    /// Wait until at least one element matches, then return all matches in
    /// document order.
    fn wait_for_all(
        &mut self,
        scope: Scope<'_, Self::Handle>,
        selector: &Selector,
        timeout: Duration,
    ) -> UiResult<Vec<Self::Handle>>;

    /// Wait until an element matches and return the first one.
    fn wait_for_one(
        &mut self,
        scope: Scope<'_, Self::Handle>,
        selector: &Selector,
        timeout: Duration,
    ) -> UiResult<Self::Handle> {
        self.wait_for_all(scope, selector, timeout)?
            .into_iter()
            .next()
            .ok_or_else(|| UiError::Timeout(selector.to_string()))
    }

    /// Rendered text of the element, lines separated by `\n`.
    fn read_text(&mut self, handle: &Self::Handle) -> UiResult<String>;

    fn click(&mut self, handle: &Self::Handle) -> UiResult<()>;
}
