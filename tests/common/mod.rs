// tests/common/mod.rs
#![allow(dead_code)]
use std::time::Duration;

use trac_collate::collate::{CheckpointStore, Collator};
use trac_collate::layout::{layout_for, Selectors, Variant};
use trac_collate::progress::Progress;
use trac_collate::ui::mock::{MockPage, PivotFixture};

pub const AXES: [&str; 3] = ["Month", "Nationality", "Decision"];
pub const T: Duration = Duration::from_millis(1);

/// Two table-1 rows; `B` has no `X` under it, so (B, X) only appears after
/// normalizing.
pub fn fixture() -> PivotFixture {
    PivotFixture::new(&["Month", "Nationality", "Decision", "Court"])
        .row1("A", 10)
        .row1("B", 4)
        .row2("A", "X", 6)
        .row2("A", "Y", 4)
        .row2("B", "Y", 4)
        .row3("A", "X", "Granted", 5)
        .row3("A", "X", "Denied", 1)
        .row3("A", "Y", "Granted", 4)
        .row3("B", "Y", "Denied", 4)
}

pub fn axes() -> [String; 3] {
    AXES.map(String::from)
}

pub fn collator<'a>(page: &'a mut MockPage, variant: Variant, checkpoints: &std::path::Path) -> Collator<'a, MockPage> {
    let layout = layout_for::<MockPage>(Selectors::for_variant(variant), T);
    Collator::new(page, layout, axes(), CheckpointStore::new(checkpoints))
}

/// Remembers every status line.
#[derive(Default)]
pub struct Recorder {
    pub lines: Vec<String>,
    pub done: Vec<String>,
    pub finished: bool,
}

impl Progress for Recorder {
    fn log(&mut self, msg: &str) { self.lines.push(msg.to_string()); }
    fn item_done(&mut self, name: &str) { self.done.push(name.to_string()); }
    fn finish(&mut self) { self.finished = true; }
}
