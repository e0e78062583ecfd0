// src/config/consts.rs
use std::time::Duration;

// UI waits (one bound for every wait in a run)
pub const TIMEOUT: Duration = Duration::from_secs(10);
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

// Local store
pub const STORE_DIR: &str = ".store";
pub const CHECKPOINT_SUBDIR: &str = "checkpoints";
pub const CHECKPOINT_PREFIX: &str = "data-up-to";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "dataset";

// Settings
pub const SETTINGS_FILE: &str = "collate.cfg";

// Progress labels
pub const LABEL_LIMIT: usize = 24;
pub const LABEL_WIDTH: usize = 25;
