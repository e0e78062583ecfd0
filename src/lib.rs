// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod progress;
pub mod ui;

pub mod layout;
pub mod page;

pub mod collate;
pub mod dataset;
pub mod normalize;

pub mod csv;
pub mod file;
pub mod engine;

#[cfg(feature = "cli")]
pub mod cli;

pub use engine::{CollationEngine, RunSummary};
pub use error::{CollateError, Result};
