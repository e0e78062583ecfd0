// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::sites::PageType;
use crate::ui::UiError;

pub type Result<T, E = CollateError> = std::result::Result<T, E>;

/// Everything a collation run can fail with.
///
/// Only [`CollateError::StaleReference`] is recovered from (by checkpoint and
/// resume); every other variant aborts the run.
#[derive(Debug, Error)]
pub enum CollateError {
    /// A requested axis name is not offered by one of the menus.
    #[error("axis name {0:?} could not be found")]
    UnknownAxis(String),

    /// Selection asked for an option the menu does not have. Pre-flight
    /// validation makes this unreachable in a normal run.
    #[error("menu {menu} has no option named {name:?}")]
    OptionNotFound { menu: usize, name: String },

    #[error("timed out waiting for {0}")]
    ElementTimeout(String),

    #[error("stale element reference")]
    StaleReference,

    #[error("row text {0:?} does not end in a count")]
    RowParse(String),

    #[error("URL is not recognized: {0}")]
    UnknownSite(String),

    #[error("URL is not supported ({kind}): {url}")]
    UnsupportedSite { url: String, kind: PageType },

    #[error("cannot write a file to the folder {}", .0.display())]
    OutputNotWritable(PathBuf),

    #[error("gave up after {0} resumed attempts")]
    ResumeLimit(usize),

    #[error("malformed dataset: {0}")]
    Malformed(String),

    #[error("browser: {0}")]
    Browser(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<UiError> for CollateError {
    fn from(e: UiError) -> Self {
        match e {
            UiError::Timeout(what) => CollateError::ElementTimeout(what),
            UiError::Stale => CollateError::StaleReference,
            UiError::Backend(msg) => CollateError::Browser(msg),
        }
    }
}

impl CollateError {
    /// Whether the driver may checkpoint and resume after this failure.
    pub fn is_resumable(&self) -> bool {
        matches!(self, CollateError::StaleReference)
    }
}
