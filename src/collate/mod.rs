// src/collate/mod.rs
//! Exhaustive table-1 × table-2 traversal with checkpoint/resume.
//!
//! ```text
//! Idle ─select_axes→ AxesSelected ─collect→ Traversing ─→ Completed
//!                                              ↑   │
//!                                              │   └─stale→ CheckpointSaved
//!                                              └───────resume─────┘
//! ```
//!
//! A traversal attempt returns a [`Pass`]: either the complete dataset or
//! the path of a checkpoint written at the row pair where a stale reference
//! hit. The outer loop in [`Collator::collect`] reloads that checkpoint and
//! starts a new attempt from the recorded position. Rows are addressed by
//! position only, so tables are always walked in presentation order.

use std::path::{Path, PathBuf};

use crate::dataset::{pair_count, Dataset};
use crate::error::{CollateError, Result};
use crate::layout::Layout;
use crate::page::{validate_axes, AxisMenu, TableModel};
use crate::progress::Progress;
use crate::ui::Ui;

pub mod checkpoint;

pub use checkpoint::{Checkpoint, CheckpointStore, Resume};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AxesSelected,
    Traversing,
    CheckpointSaved,
    Completed,
}

/// Outcome of one traversal attempt.
#[derive(Debug)]
pub enum Pass {
    Complete(Dataset),
    Interrupted(PathBuf),
}

/// Drives one live pivot page from axis selection to a full dataset.
pub struct Collator<'a, U: Ui> {
    ui: &'a mut U,
    layout: Box<dyn Layout<U>>,
    axes: [String; 3],
    checkpoints: CheckpointStore,
    max_resumes: Option<usize>,
    resumes: usize,
    phase: Phase,
}

impl<'a, U: Ui> Collator<'a, U> {
    pub fn new(ui: &'a mut U, layout: Box<dyn Layout<U>>, axes: [String; 3], checkpoints: CheckpointStore) -> Self {
        Self { ui, layout, axes, checkpoints, max_resumes: None, resumes: 0, phase: Phase::Idle }
    }

    /// Give up with [`CollateError::ResumeLimit`] after this many resumes.
    pub fn with_max_resumes(mut self, max: Option<usize>) -> Self {
        self.max_resumes = max;
        self
    }

    pub fn phase(&self) -> Phase { self.phase }

    /// Resumed attempts so far.
    pub fn resumes(&self) -> usize { self.resumes }

    fn enter(&mut self, phase: Phase) {
        logd!(from = ?self.phase, to = ?phase, "collator phase");
        self.phase = phase;
    }

    /// Check every axis name against every menu, then pick axis `i` in
    /// menu `i`. Nothing is selected unless all names check out.
    pub fn select_axes(&mut self) -> Result<()> {
        let mut menus = AxisMenu::resolve_all(&mut *self.ui, &*self.layout)?;
        validate_axes(&menus, &self.axes)?;

        for (menu, axis) in menus.iter_mut().zip(&self.axes) {
            if let Err(e) = menu.select_by_name(&mut *self.ui, &*self.layout, axis) {
                if let CollateError::OptionNotFound { .. } = e {
                    loge!("option {axis:?} vanished from menu {} after validation", menu.index());
                }
                return Err(e);
            }
            logf!(menu = menu.index(), axis = %axis, "axis selected");
        }
        self.enter(Phase::AxesSelected);
        Ok(())
    }

    /// Traverse until one attempt completes.
    ///
    /// `resume_from` continues from a checkpoint file left by an earlier
    /// process. Axes are selected first if that has not happened yet.
    pub fn collect(
        &mut self,
        resume_from: Option<&Path>,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<Dataset> {
        if self.phase == Phase::Idle {
            self.select_axes()?;
        }

        let mut pending: Option<PathBuf> = resume_from.map(Path::to_path_buf);
        loop {
            let (data, resume) = match pending.take() {
                Some(path) => {
                    let cp = self.checkpoints.load(&path)?;
                    self.checkpoints.discard(&path);
                    (cp.data, Some(cp.resume))
                }
                None => (Dataset::new(), None),
            };

            self.enter(Phase::Traversing);
            match self.traverse(data, resume, progress.as_deref_mut())? {
                Pass::Complete(data) => {
                    self.enter(Phase::Completed);
                    logf!(t1 = data.len(), pairs = pair_count(&data), resumes = self.resumes, "traversal complete");
                    if let Some(p) = progress.as_deref_mut() {
                        p.finish();
                    }
                    return Ok(data);
                }
                Pass::Interrupted(path) => {
                    self.enter(Phase::CheckpointSaved);
                    if let Some(max) = self.max_resumes {
                        if self.resumes >= max {
                            loge!("stale references persist after {max} resumes; checkpoint kept at {}", path.display());
                            if let Some(p) = progress.as_deref_mut() {
                                p.finish();
                            }
                            return Err(CollateError::ResumeLimit(max));
                        }
                    }
                    self.resumes += 1;
                    pending = Some(path);
                }
            }
        }
    }

    /// One attempt over table 1 × table 2, starting at `resume`.
    ///
    /// Table-1 rows before `resume.t1` were finished by an earlier attempt
    /// and are skipped. `resume.t2` only applies to the table-1 row it was
    /// recorded for; every other table-1 row starts table 2 from the top.
    pub fn traverse(
        &mut self,
        mut data: Dataset,
        resume: Option<Resume>,
        mut progress: Option<&mut (dyn Progress + '_)>,
    ) -> Result<Pass> {
        let [t1, t2, t3] = TableModel::all();
        let start = resume.unwrap_or_default();

        let Some(t1_rows) = recoverable(t1.current_rows(&mut *self.ui, &*self.layout))? else {
            return self.interrupt(data, start, None, None, progress);
        };
        if let Some(p) = progress.as_deref_mut() {
            p.begin(t1_rows.len().saturating_sub(start.t1));
        }

        for (i, row1) in t1_rows.iter().enumerate().skip(start.t1) {
            // Keep whatever a resumed checkpoint already holds for this row.
            data.entry(row1.name.clone()).or_default();
            let t2_start = match resume {
                Some(r) if r.t1 == i => r.t2.unwrap_or(0),
                _ => 0,
            };
            let here = Resume::at(i, (t2_start > 0).then_some(t2_start));

            if recoverable(row1.click(&mut *self.ui, &*self.layout))?.is_none() {
                return self.interrupt(data, here, Some(&row1.name), None, progress);
            }
            let Some(t2_rows) = recoverable(t2.current_rows(&mut *self.ui, &*self.layout))? else {
                return self.interrupt(data, here, Some(&row1.name), None, progress);
            };

            for (j, row2) in t2_rows.iter().enumerate().skip(t2_start) {
                if recoverable(row2.click(&mut *self.ui, &*self.layout))?.is_none() {
                    return self.interrupt(data, Resume::at(i, Some(j)), Some(&row1.name), Some(&row2.name), progress);
                }
                let Some(t3_rows) = recoverable(t3.current_rows(&mut *self.ui, &*self.layout))? else {
                    return self.interrupt(data, Resume::at(i, Some(j)), Some(&row1.name), Some(&row2.name), progress);
                };
                // Table 3 is read whole in one step, so replacing is safe.
                let leaves = t3_rows.into_iter().map(|r| (r.name, r.value)).collect();
                data.entry(row1.name.clone()).or_default().insert(row2.name.clone(), leaves);
            }

            logd!(t1 = %row1.name, t2_rows = t2_rows.len(), "table-1 row done");
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(&row1.name);
            }
        }
        Ok(Pass::Complete(data))
    }

    fn interrupt(
        &mut self,
        data: Dataset,
        resume: Resume,
        t1: Option<&str>,
        t2: Option<&str>,
        progress: Option<&mut (dyn Progress + '_)>,
    ) -> Result<Pass> {
        let checkpoint = Checkpoint { data, resume };
        let path = self.checkpoints.save(&checkpoint, t1, t2)?;
        let at = match (t1, t2) {
            (Some(a), Some(b)) => format!("T1={a:?} T2={b:?}"),
            (Some(a), None) => format!("T1={a:?}"),
            _ => s!("start of table 1"),
        };
        let msg = format!(
            "Encountered a stale reference at {at}. Data saved to {}; restarting from this row.",
            path.display()
        );
        logw!("{msg}");
        if let Some(p) = progress {
            p.log(&msg);
        }
        Ok(Pass::Interrupted(path))
    }
}

/// `Ok(None)` for a stale reference, the value or the fatal error otherwise.
fn recoverable<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_resumable() => Ok(None),
        Err(e) => Err(e),
    }
}
