// src/cli.rs
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};

use crate::config::consts::{LABEL_LIMIT, LABEL_WIDTH, SETTINGS_FILE};
use crate::config::options::{default_out_path, ExportFormat, RunOptions};
use crate::config::settings::{self, Settings};
use crate::config::sites::SITES;
use crate::core::sanitize::shorten;
use crate::engine::CollationEngine;
use crate::layout::Variant;
use crate::page::AXES;
use crate::progress::Progress;
use crate::ui::chrome::ChromeUi;

/// Collate a three-axis cross-tabulation out of a TRAC pivot dashboard.
#[derive(Parser, Debug)]
#[command(name = "trac_collate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dashboard URL
    #[arg(required_unless_present = "list_sites")]
    pub url: Option<String>,

    /// Axis name; give it three times, for table 1, 2 and 3 in order
    #[arg(short, long = "axis", value_name = "NAME")]
    pub axes: Vec<String>,

    /// Output file (or folder, ending in a separator)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// csv or tsv (default: from the output extension)
    #[arg(long)]
    pub format: Option<ExportFormat>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// object or link; required for pages missing from the site list
    #[arg(long)]
    pub layout: Option<Variant>,

    /// Folder for checkpoint files
    #[arg(long)]
    pub checkpoints: Option<PathBuf>,

    /// Continue from a checkpoint file left by an earlier run
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Give up after this many stale-element resumes
    #[arg(long)]
    pub max_resumes: Option<usize>,

    /// Seconds to wait for any one element
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Settings file with run defaults
    #[arg(long, default_value = SETTINGS_FILE)]
    pub config: PathBuf,

    /// Print the known dashboards and exit
    #[arg(long)]
    pub list_sites: bool,
}

impl Args {
    /// Merge flags over the settings file. Flags win.
    pub fn to_options(&self, cfg: &Settings) -> Result<RunOptions> {
        let url = self.url.as_deref().ok_or_else(|| eyre!("a dashboard URL is required"))?;
        let axes: [&str; AXES] = match self.axes.as_slice() {
            [a, b, c] => [a.as_str(), b.as_str(), c.as_str()],
            other => return Err(eyre!("expected {AXES} --axis values, got {}", other.len())),
        };

        let format = self.format.or(cfg.format);
        let out = match &self.out {
            Some(p) => p.clone(),
            None => default_out_path(format.unwrap_or(ExportFormat::Csv)),
        };

        let mut opts = RunOptions::new(url, axes, out);
        opts.format = format;
        opts.headless = self.headless || cfg.headless;
        opts.layout = self.layout;
        opts.checkpoint_dir = self.checkpoints.clone().unwrap_or_else(|| cfg.checkpoint_dir.clone());
        opts.timeout = self.timeout.map(Duration::from_secs).unwrap_or(cfg.timeout);
        opts.max_resumes = self.max_resumes.or(cfg.max_resumes);
        opts.resume_from = self.resume.clone();
        Ok(opts)
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let cfg = settings::load(&args.config);
    crate::log::init(&cfg.log_dir)?;

    if args.list_sites {
        for (url, kind) in SITES {
            println!("{:<16}{:<9}{}", kind.label(), format!("{:?}", kind.support()), url);
        }
        return Ok(());
    }

    let opts = args.to_options(&cfg)?;
    let engine = CollationEngine::new(opts.clone())?;
    eprintln!("Collating {} from {} ({} layout)", opts.axes.join(" × "), opts.url, engine.variant());

    let mut ui = ChromeUi::launch(&opts.url, opts.headless, opts.timeout)?;
    let mut progress = ConsoleProgress::default();
    match engine.run(&mut ui, Some(&mut progress)) {
        Ok(summary) => {
            eprintln!(
                "Wrote {} rows × {} columns to {} ({} resumes)",
                summary.rows,
                summary.columns,
                summary.output.display(),
                summary.resumes
            );
            Ok(())
        }
        Err(e) => {
            loge!(error = %e, "run failed");
            Err(e.into())
        }
    }
}

/// Progress on one stderr status line, rewritten per finished table-1 row.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("\n{msg}");
    }

    fn item_done(&mut self, name: &str) {
        self.done += 1;
        let mut err = io::stderr().lock();
        let _ = write!(err, "\r  {} [{}/{}]", shorten(name, LABEL_LIMIT, LABEL_WIDTH), self.done, self.total);
        let _ = err.flush();
    }

    fn finish(&mut self) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["trac_collate"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn three_axes_in_order() {
        let a = args(&["https://x/", "--axis", "Month", "-a", "Nationality", "--axis", "Court"]);
        let opts = a.to_options(&Settings::default()).unwrap();
        assert_eq!(opts.axes, [s!("Month"), s!("Nationality"), s!("Court")]);
    }

    #[test]
    fn wrong_axis_count_is_an_error() {
        let a = args(&["https://x/", "--axis", "Month"]);
        assert!(a.to_options(&Settings::default()).is_err());
    }

    #[test]
    fn flags_win_over_settings() {
        let cfg = settings::parse("timeout_secs=30\nmax_resumes=2\nformat=tsv\n");
        let a = args(&["https://x/", "-a", "A", "-a", "B", "-a", "C", "--timeout", "5"]);
        let opts = a.to_options(&cfg).unwrap();
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert_eq!(opts.max_resumes, Some(2));
        assert_eq!(opts.export_format(), ExportFormat::Tsv);
        assert!(opts.out.to_string_lossy().ends_with("dataset.tsv"));
    }

    #[test]
    fn list_sites_needs_no_url() {
        assert!(args(&["--list-sites"]).list_sites);
        assert!(Args::try_parse_from(["trac_collate"]).is_err());
    }
}
