// src/engine/engine.rs
use std::path::{Path, PathBuf};

use crate::collate::{CheckpointStore, Collator};
use crate::config::options::{ExportFormat, RunOptions};
use crate::config::sites;
use crate::engine::types::RunSummary;
use crate::error::Result;
use crate::file;
use crate::layout::{layout_for, Selectors, Variant};
use crate::normalize::normalize;
use crate::progress::{NullProgress, Progress};
use crate::ui::Ui;

/// One configured collation run: page → dataset → file.
///
/// Construction does every check that needs no browser (output folder,
/// site registry) so a bad run fails before a window opens.
#[derive(Debug)]
pub struct CollationEngine {
    opts: RunOptions,
    out: PathBuf,
    format: ExportFormat,
    selectors: Selectors,
}

impl CollationEngine {
    pub fn new(opts: RunOptions) -> Result<Self> {
        let format = opts.export_format();
        let out = file::resolve_out_path(&opts.out, &join!(crate::config::consts::DEFAULT_FILE, ".", format.ext()))?;
        if let Some(parent) = out.parent() {
            file::check_writable(parent)?;
        }

        let forced = opts.layout.or_else(|| opts.selectors.as_ref().map(Selectors::variant));
        let variant = sites::resolve_variant(&opts.url, forced)?;
        let selectors = match &opts.selectors {
            Some(sel) if sel.variant() == variant => sel.clone(),
            _ => Selectors::for_variant(variant),
        };

        logf!(url = %opts.url, %variant, out = %out.display(), "engine ready");
        Ok(Self { opts, out, format, selectors })
    }

    pub fn options(&self) -> &RunOptions { &self.opts }
    pub fn output(&self) -> &Path { &self.out }
    pub fn format(&self) -> ExportFormat { self.format }
    pub fn variant(&self) -> Variant { self.selectors.variant() }

    /// Drive `ui` (already showing the page) through the whole pipeline.
    ///
    /// Nothing is written unless the traversal completes.
    pub fn run<U: Ui>(&self, ui: &mut U, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
        let layout = layout_for::<U>(self.selectors.clone(), self.opts.timeout);
        let store = CheckpointStore::new(&self.opts.checkpoint_dir);
        let mut collator = Collator::new(ui, layout, self.opts.axes.clone(), store)
            .with_max_resumes(self.opts.max_resumes);

        let mut quiet = NullProgress;
        let progress: &mut dyn Progress = match progress {
            Some(p) => p,
            None => &mut quiet,
        };
        let data = collator.collect(self.opts.resume_from.as_deref(), Some(progress))?;
        let resumes = collator.resumes();

        let [axis1, axis2, _] = &self.opts.axes;
        let normalized = normalize(&data, axis1, axis2);
        let output = file::export_dataset(&normalized, &self.out, self.format)?;

        Ok(RunSummary {
            output,
            rows: normalized.len(),
            columns: normalized.columns.len(),
            resumes,
        })
    }
}
