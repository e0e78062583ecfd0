// src/progress.rs
/// Lightweight progress reporting used by the long-running traversal.
/// Frontends (CLI, tests) implement this to surface status to users.
pub trait Progress {
    /// Called at the start of each traversal attempt with the number of
    /// table-1 rows left to visit.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one table-1 row has been fully harvested.
    fn item_done(&mut self, _name: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
