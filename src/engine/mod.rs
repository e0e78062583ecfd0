// src/engine/mod.rs
pub mod engine;
pub mod types;

pub use engine::CollationEngine;
pub use types::RunSummary;
