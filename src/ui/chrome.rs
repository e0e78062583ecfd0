// src/ui/chrome.rs
//! Real browser backend over `headless_chrome`.
//!
//! Handles are DOM node ids. Every call re-materializes the element from its
//! id, so a node the page has since replaced surfaces as [`UiError::Stale`].
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::DOM::NodeId;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};

use super::{Scope, Selector, Ui, UiError, UiResult};
use crate::config::consts::POLL_INTERVAL;
use crate::error::{CollateError, Result};

// Messages Chrome uses for nodes that left the document.
const STALE_MARKERS: &[&str] = &[
    "No node with given id",
    "Could not find node",
    "Node is detached",
    "Cannot find context with specified id",
];

pub struct ChromeUi {
    // Dropping the browser closes it; keep it alive as long as the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeUi {
    /// Start a browser and open `url` in a fresh tab.
    pub fn launch(url: &str, headless: bool, timeout: Duration) -> Result<Self> {
        let opts = LaunchOptions::default_builder()
            .headless(headless)
            .idle_browser_timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| CollateError::Browser(e.to_string()))?;

        let browser = Browser::new(opts).map_err(browser_err)?;
        let tab = browser.new_tab().map_err(browser_err)?;
        tab.set_default_timeout(timeout);
        tab.navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map_err(browser_err)?;

        logf!(%url, headless, "browser ready");
        Ok(Self { _browser: browser, tab })
    }

    pub fn tab(&self) -> &Arc<Tab> { &self.tab }

    fn element(&self, id: NodeId) -> UiResult<Element<'_>> {
        Element::new(&self.tab, id).map_err(classify)
    }

    /// One non-waiting lookup. Nothing found is `Ok(vec![])`.
    fn query(&self, scope: Scope<'_, NodeId>, selector: &Selector) -> UiResult<Vec<NodeId>> {
        let found = match scope {
            Scope::Document => match selector {
                Selector::Css(q) => self.tab.find_elements(q),
                Selector::XPath(q) => self.tab.find_elements_by_xpath(q),
                Selector::ClassName(c) => self.tab.find_elements(&join!(".", c)),
            }
            .map(node_ids),
            Scope::Within(id) => {
                let root = self.element(*id)?;
                // Child elements borrow `root`; keep only their ids.
                match selector {
                    Selector::Css(q) => root.find_elements(q),
                    Selector::XPath(q) => root.find_elements_by_xpath(q),
                    Selector::ClassName(c) => root.find_elements(&join!(".", c)),
                }
                .map(node_ids)
            }
        };

        match found {
            Ok(ids) => Ok(ids),
            Err(e) => match classify(e) {
                UiError::Stale => Err(UiError::Stale),
                // "no element found" and friends: keep polling
                _ => Ok(Vec::new()),
            },
        }
    }
}

impl Ui for ChromeUi {
    type Handle = NodeId;

    fn wait_for_all(
        &mut self,
        scope: Scope<'_, NodeId>,
        selector: &Selector,
        timeout: Duration,
    ) -> UiResult<Vec<NodeId>> {
        let deadline = Instant::now() + timeout;
        loop {
            let ids = self.query(scope, selector)?;
            if !ids.is_empty() {
                return Ok(ids);
            }
            if Instant::now() >= deadline {
                logd!(%selector, "wait timed out");
                return Err(UiError::Timeout(selector.to_string()));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn read_text(&mut self, handle: &NodeId) -> UiResult<String> {
        self.element(*handle)?.get_inner_text().map_err(classify)
    }

    fn click(&mut self, handle: &NodeId) -> UiResult<()> {
        self.element(*handle)?.click().map(|_| ()).map_err(classify)
    }
}

fn node_ids(els: Vec<Element<'_>>) -> Vec<NodeId> {
    els.into_iter().map(|e| e.node_id).collect()
}

fn classify(e: impl std::fmt::Display) -> UiError {
    let msg = e.to_string();
    if STALE_MARKERS.iter().any(|m| msg.contains(m)) {
        UiError::Stale
    } else {
        UiError::Backend(msg)
    }
}

fn browser_err(e: impl std::fmt::Display) -> CollateError {
    CollateError::Browser(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_nodes_read_as_stale() {
        assert_eq!(classify("No node with given id found"), UiError::Stale);
        assert_eq!(classify("Node is detached from document"), UiError::Stale);
        assert!(matches!(classify("Websocket closed"), UiError::Backend(_)));
    }
}
