// tests/collate_flow.rs
mod common;

use std::fs;

use trac_collate::collate::{Checkpoint, CheckpointStore, Phase, Resume};
use trac_collate::dataset::{pair_count, Dataset};
use trac_collate::error::CollateError;
use trac_collate::layout::Variant;
use trac_collate::ui::mock::MockPage;

use common::*;

fn leaves(pairs: &[(&str, i64)]) -> trac_collate::dataset::Leaves {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn expected() -> Dataset {
    let mut d = Dataset::new();
    d.entry("A".into()).or_default().insert("X".into(), leaves(&[("Granted", 5), ("Denied", 1)]));
    d.entry("A".into()).or_default().insert("Y".into(), leaves(&[("Granted", 4)]));
    d.entry("B".into()).or_default().insert("Y".into(), leaves(&[("Denied", 4)]));
    d
}

fn table2_visits(page: &MockPage) -> usize {
    page.visits().iter().filter(|(t, _)| *t == 1).count()
}

#[test]
fn both_layouts_collect_the_same_dataset() {
    for variant in [Variant::Object, Variant::Link] {
        let dir = tempfile::tempdir().unwrap();
        let mut page = MockPage::with_variant(fixture(), variant);
        let mut c = collator(&mut page, variant, dir.path());
        let data = c.collect(None, None).unwrap();
        assert_eq!(c.phase(), Phase::Completed);
        assert_eq!(c.resumes(), 0);
        assert_eq!(data, expected(), "{variant}");
        assert_eq!(pair_count(&data), 3);
    }
}

#[test]
fn unknown_axis_fails_before_any_click() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = MockPage::with_variant(fixture(), Variant::Link);
    let layout = trac_collate::layout::layout_for::<MockPage>(
        trac_collate::layout::Selectors::for_variant(Variant::Link),
        T,
    );
    let axes = ["Month".to_string(), "Judge".to_string(), "Decision".to_string()];
    let mut c = trac_collate::collate::Collator::new(&mut page, layout, axes, CheckpointStore::new(dir.path()));

    let err = c.select_axes().unwrap_err();
    assert!(matches!(err, CollateError::UnknownAxis(ref name) if name == "Judge"));
    assert_eq!(c.phase(), Phase::Idle);
    drop(c);
    assert_eq!(page.clicks(), 0);
    assert!(page.chosen_axes().iter().all(Option::is_none));
}

#[test]
fn unknown_axis_leaves_object_menus_unchosen() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = MockPage::with_variant(fixture(), Variant::Object);
    let layout = trac_collate::layout::layout_for::<MockPage>(
        trac_collate::layout::Selectors::for_variant(Variant::Object),
        T,
    );
    let axes = ["Month".to_string(), "Nationality".to_string(), "Judge".to_string()];
    let mut c = trac_collate::collate::Collator::new(&mut page, layout, axes, CheckpointStore::new(dir.path()));
    assert!(matches!(c.select_axes(), Err(CollateError::UnknownAxis(_))));
    drop(c);
    assert!(page.chosen_axes().iter().all(Option::is_none));
}

#[test]
fn stale_table1_row_resumes_without_losing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = MockPage::with_variant(fixture(), Variant::Object);
    page.inject_stale(0, "B", 1);

    let mut progress = Recorder::default();
    let mut c = collator(&mut page, Variant::Object, dir.path());
    let data = c.collect(None, Some(&mut progress)).unwrap();
    assert_eq!(c.resumes(), 1);
    drop(c);

    assert_eq!(data, expected());
    assert_eq!(table2_visits(&page), 3);
    assert_eq!(progress.lines.len(), 1);
    assert!(progress.lines[0].contains("stale reference"));
    assert!(progress.lines[0].contains("T1=\"B\""));
    assert_eq!(progress.done, vec!["A", "B"]);
    assert!(progress.finished);

    // Checkpoints are consumed on resume.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn stale_table2_row_resumes_at_that_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = MockPage::with_variant(fixture(), Variant::Link);
    page.inject_stale(1, "Y", 2);

    let mut c = collator(&mut page, Variant::Link, dir.path());
    let data = c.collect(None, None).unwrap();
    assert_eq!(c.resumes(), 2);
    drop(c);

    assert_eq!(data, expected());
    // X under A is not picked again after the resumes.
    assert_eq!(table2_visits(&page), 3);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn persistent_staleness_hits_the_resume_limit() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = MockPage::with_variant(fixture(), Variant::Link);
    page.inject_stale(0, "A", 100);

    let mut c = collator(&mut page, Variant::Link, dir.path()).with_max_resumes(Some(2));
    let err = c.collect(None, None).unwrap_err();
    assert!(matches!(err, CollateError::ResumeLimit(2)));
    assert_eq!(c.phase(), Phase::CheckpointSaved);

    // The last checkpoint stays for a later --resume.
    let left: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(left.len(), 1);
}

#[test]
fn resume_from_an_earlier_checkpoint_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = CheckpointStore::new(dir.path());

    let mut partial = Dataset::new();
    partial.insert("A".into(), expected()["A"].clone());
    let path = store
        .save(&Checkpoint { data: partial, resume: Resume::at(1, None) }, Some("B"), None)
        .unwrap();

    let mut page = MockPage::with_variant(fixture(), Variant::Object);
    let mut c = collator(&mut page, Variant::Object, dir.path());
    let data = c.collect(Some(&path), None).unwrap();
    drop(c);

    assert_eq!(data, expected());
    assert!(!page.visits().iter().any(|(t, name)| *t == 0 && name == "A"));
    assert!(!path.exists());
}

fn harvest_count(page: &MockPage) -> usize {
    page.harvests().len()
}

fn harvests_are_unique(page: &MockPage) -> bool {
    let mut seen = page.harvests().to_vec();
    seen.sort();
    seen.dedup();
    seen.len() == page.harvests().len()
}

#[test]
fn table1_row_with_empty_table2_becomes_a_zero_row() {
    let fixture = trac_collate::ui::mock::PivotFixture::new(&AXES)
        .row1("A", 10)
        .row1("B", 5)
        .row2("A", "X", 10)
        .row3("A", "X", "M", 3)
        .row3("A", "X", "N", 7);

    for variant in [Variant::Object, Variant::Link] {
        let dir = tempfile::tempdir().unwrap();
        let mut page = MockPage::with_variant(fixture.clone(), variant);
        let mut c = collator(&mut page, variant, dir.path());
        let data = c.collect(None, None).unwrap();

        let mut raw = Dataset::new();
        raw.entry("A".into()).or_default().insert("X".into(), leaves(&[("M", 3), ("N", 7)]));
        raw.insert("B".into(), Default::default());
        assert_eq!(data, raw, "{variant}");

        let n = trac_collate::normalize::normalize(&data, AXES[0], AXES[1]);
        assert_eq!(n.columns, vec!["M", "N", "Total"]);
        assert_eq!(n.len(), 2);
        assert_eq!(n.row("A", "X").unwrap().cells, vec![3, 7, 10]);
        assert_eq!(n.row("B", "X").unwrap().cells, vec![0, 0, 0]);
    }
}

#[test]
fn stale_while_reading_table3_resumes_at_that_pair() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = MockPage::with_variant(fixture(), Variant::Object);
    page.inject_stale_read(2, "Y", 1);

    let mut c = collator(&mut page, Variant::Object, dir.path());
    let data = c.collect(None, None).unwrap();
    assert_eq!(c.resumes(), 1);
    drop(c);

    assert_eq!(data, expected());
    assert_eq!(harvest_count(&page), 3);
    assert!(harvests_are_unique(&page));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn stale_while_reading_table2_or_table1_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = MockPage::with_variant(fixture(), Variant::Link);
    page.inject_stale_read(0, "", 1);
    page.inject_stale_read(1, "B", 1);

    let mut progress = Recorder::default();
    let mut c = collator(&mut page, Variant::Link, dir.path());
    let data = c.collect(None, Some(&mut progress)).unwrap();
    assert_eq!(c.resumes(), 2);
    drop(c);

    assert_eq!(data, expected());
    assert_eq!(harvest_count(&page), 3);
    assert!(harvests_are_unique(&page));
    assert!(progress.lines[0].contains("start of table 1"));
    assert!(progress.lines[1].contains("T1=\"B\""));
}

#[test]
fn table1_stale_inside_a_resumed_row_keeps_the_table2_position() {
    let dir = tempfile::tempdir().unwrap();
    let store = CheckpointStore::new(dir.path());

    // A previous attempt finished (A, X) and stopped at (A, Y).
    let mut partial = Dataset::new();
    partial.entry("A".into()).or_default().insert("X".into(), expected()["A"]["X"].clone());
    let path = store
        .save(&Checkpoint { data: partial, resume: Resume::at(0, Some(1)) }, Some("A"), Some("Y"))
        .unwrap();

    let mut page = MockPage::with_variant(fixture(), Variant::Link);
    page.inject_stale(0, "A", 1);

    let mut c = collator(&mut page, Variant::Link, dir.path());
    let data = c.collect(Some(&path), None).unwrap();
    assert_eq!(c.resumes(), 1);
    drop(c);

    assert_eq!(data, expected());
    // (A, X) came from the checkpoint and is never read again.
    let pairs: Vec<(&str, &str)> = page.harvests().iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    assert_eq!(pairs, vec![("A", "Y"), ("B", "Y")]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
