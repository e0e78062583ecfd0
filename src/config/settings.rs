// src/config/settings.rs
//! `key=value` settings file with run defaults. Command-line flags win.
use std::{fs, path::{Path, PathBuf}, time::Duration};

use super::consts::*;
use super::options::{default_checkpoint_dir, ExportFormat};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub headless: bool,
    pub format: Option<ExportFormat>,
    pub checkpoint_dir: PathBuf,
    pub timeout: Duration,
    pub max_resumes: Option<usize>,
    pub log_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            headless: false,
            format: None,
            checkpoint_dir: default_checkpoint_dir(),
            timeout: TIMEOUT,
            max_resumes: None,
            log_dir: PathBuf::from(STORE_DIR),
        }
    }
}

pub fn load(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(text) => parse(&text),
        Err(_) => Settings::default(),
    }
}

pub fn parse(text: &str) -> Settings {
    let mut cfg = Settings::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let Some(eq) = line.find('=') else { continue };
        let key = line[..eq].trim();
        let val = line[eq+1..].trim();
        match key {
            "headless" => cfg.headless = val == "1" || val.eq_ignore_ascii_case("true"),
            "format" => cfg.format = val.parse().ok(),
            "checkpoint_dir" => cfg.checkpoint_dir = PathBuf::from(val),
            "timeout_secs" => {
                if let Ok(secs) = val.parse::<u64>() { cfg.timeout = Duration::from_secs(secs); }
            }
            "max_resumes" => cfg.max_resumes = val.parse().ok(),
            "log_dir" => cfg.log_dir = PathBuf::from(val),
            other => logw!("settings: ignoring unknown key {other:?}"),
        }
    }
    cfg
}
