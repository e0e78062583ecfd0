// src/collate/checkpoint.rs
//! Partial results saved when a traversal is interrupted.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::consts::CHECKPOINT_PREFIX;
use crate::core::sanitize::sanitize_filename;
use crate::dataset::Dataset;
use crate::error::Result;

/// Where the next attempt picks up: table-1 row `t1`, and within it
/// table-2 row `t2` (from the start of table 2 when `None`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub t1: usize,
    pub t2: Option<usize>,
}

impl Resume {
    pub fn at(t1: usize, t2: Option<usize>) -> Self { Self { t1, t2 } }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub data: Dataset,
    pub resume: Resume,
}

/// Directory of checkpoint files.
#[derive(Clone, Debug)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    /// `data-up-to_T1-<t1>[_T2-<t2>].json`, or `data-up-to_start.json` when
    /// the interruption came before any table-1 row.
    pub fn path_for(&self, t1: Option<&str>, t2: Option<&str>) -> PathBuf {
        let mut name = s!(CHECKPOINT_PREFIX);
        match t1 {
            Some(t1) => {
                name.push_str(&join!("_T1-", &sanitize_filename(t1, "row")));
                if let Some(t2) = t2 {
                    name.push_str(&join!("_T2-", &sanitize_filename(t2, "row")));
                }
            }
            None => name.push_str("_start"),
        }
        name.push_str(".json");
        self.dir.join(name)
    }

    /// Write synchronously; the file is complete when this returns.
    pub fn save(&self, checkpoint: &Checkpoint, t1: Option<&str>, t2: Option<&str>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(t1, t2);
        let mut out = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut out, checkpoint)?;
        out.flush()?;
        out.get_ref().sync_all()?;
        logf!(path = %path.display(), t1 = checkpoint.resume.t1, t2 = ?checkpoint.resume.t2, "checkpoint saved");
        Ok(path)
    }

    pub fn load(&self, path: &Path) -> Result<Checkpoint> {
        let file = File::open(path)?;
        let checkpoint: Checkpoint = serde_json::from_reader(BufReader::new(file))?;
        logf!(path = %path.display(), t1 = checkpoint.resume.t1, t2 = ?checkpoint.resume.t2, "checkpoint loaded");
        Ok(checkpoint)
    }

    /// Delete a consumed checkpoint. Failure is only worth a warning.
    pub fn discard(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => logd!(path = %path.display(), "checkpoint deleted"),
            Err(e) => logw!(
                "checkpoint could not be deleted: {} ({e}); please delete it manually after the run",
                path.display()
            ),
        }
    }
}
