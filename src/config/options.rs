// src/config/options.rs
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::consts::*;
use crate::layout::{Selectors, Variant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }

    /// `.tsv` (any case) means TSV; everything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => ExportFormat::Tsv,
            _ => ExportFormat::Csv,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(format!("Unknown format: {other}")),
        }
    }
}

/// Everything one collation run needs besides the live page.
#[derive(Clone, Debug)]
pub struct RunOptions {
    pub url: String,
    /// Axis names for table 1, 2, 3 (left to right).
    pub axes: [String; 3],
    pub out: PathBuf,
    /// `None` = decide from the output extension.
    pub format: Option<ExportFormat>,
    pub headless: bool,
    /// Forces the layout variant (required for URLs missing from the registry).
    pub layout: Option<Variant>,
    /// Replaces the default locators of the chosen variant.
    pub selectors: Option<Selectors>,
    pub checkpoint_dir: PathBuf,
    pub timeout: Duration,
    /// `None` = retry stale references for as long as it takes.
    pub max_resumes: Option<usize>,
    /// Continue from a checkpoint written by an earlier process.
    pub resume_from: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(url: &str, axes: [&str; 3], out: impl Into<PathBuf>) -> Self {
        Self {
            url: s!(url),
            axes: axes.map(String::from),
            out: out.into(),
            format: None,
            headless: false,
            layout: None,
            selectors: None,
            checkpoint_dir: default_checkpoint_dir(),
            timeout: TIMEOUT,
            max_resumes: None,
            resume_from: None,
        }
    }

    pub fn export_format(&self) -> ExportFormat {
        self.format.unwrap_or_else(|| ExportFormat::from_path(&self.out))
    }
}

pub fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from(STORE_DIR).join(CHECKPOINT_SUBDIR)
}

pub fn default_out_path(format: ExportFormat) -> PathBuf {
    PathBuf::from(DEFAULT_OUT_DIR).join(join!(DEFAULT_FILE, ".", format.ext()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension_unless_set() {
        let mut opts = RunOptions::new("u", ["a", "b", "c"], "out/asylum.TSV");
        assert_eq!(opts.export_format(), ExportFormat::Tsv);
        opts.format = Some(ExportFormat::Csv);
        assert_eq!(opts.export_format(), ExportFormat::Csv);
        opts.out = PathBuf::from("out/asylum.data");
        opts.format = None;
        assert_eq!(opts.export_format(), ExportFormat::Csv);
    }

    #[test]
    fn default_out_path_uses_format_extension() {
        assert!(default_out_path(ExportFormat::Tsv).to_string_lossy().ends_with("dataset.tsv"));
    }
}
