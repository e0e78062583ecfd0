// src/engine/types.rs
use std::path::PathBuf;

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Absolute path of the exported file.
    pub output: PathBuf,
    /// Normalized (t1, t2) rows written.
    pub rows: usize,
    /// Data columns written, `Total` included.
    pub columns: usize,
    /// Checkpoint/resume cycles the traversal needed.
    pub resumes: usize,
}
