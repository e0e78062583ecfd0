// benches/normalize.rs
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion, black_box};

use trac_collate::collate::{CheckpointStore, Collator};
use trac_collate::dataset::Dataset;
use trac_collate::layout::{layout_for, Selectors, Variant};
use trac_collate::normalize::normalize;
use trac_collate::ui::mock::{MockPage, PivotFixture};

// Sparse on purpose: every third (t1, t2) pair is missing.
fn sample(t1: usize, t2: usize, t3: usize) -> Dataset {
    let mut data = Dataset::new();
    for i in 0..t1 {
        let inner = data.entry(format!("month {i:03}")).or_default();
        for j in (0..t2).filter(|j| (i + j) % 3 != 0) {
            let leaves = inner.entry(format!("country {j:03}")).or_default();
            for k in 0..t3 {
                leaves.insert(format!("court {k:03}"), (i * j + k) as i64);
            }
        }
    }
    data
}

fn fixture(t1: usize, t2: usize, t3: usize) -> PivotFixture {
    let mut f = PivotFixture::new(&["Month", "Nationality", "Court"]);
    for i in 0..t1 {
        let a = format!("m{i}");
        f = f.row1(&a, 1);
        for j in 0..t2 {
            let b = format!("n{j}");
            f = f.row2(&a, &b, 1);
            for k in 0..t3 {
                f = f.row3(&a, &b, &format!("c{k}"), 1);
            }
        }
    }
    f
}

fn bench_normalize(c: &mut Criterion) {
    let data = sample(120, 80, 40);
    c.bench_function("normalize_120x80x40", |b| {
        b.iter(|| {
            let n = normalize(black_box(&data), "Month", "Nationality");
            black_box(n.len())
        })
    });
}

fn bench_traverse(c: &mut Criterion) {
    let dir = std::env::temp_dir().join("trac_collate_bench");
    let axes = ["Month", "Nationality", "Court"].map(String::from);

    c.bench_function("traverse_mock_20x20x10", |b| {
        b.iter(|| {
            let mut page = MockPage::with_variant(fixture(20, 20, 10), Variant::Link);
            let layout = layout_for::<MockPage>(Selectors::for_variant(Variant::Link), Duration::from_millis(1));
            let mut collator = Collator::new(&mut page, layout, axes.clone(), CheckpointStore::new(&dir));
            let data = collator.collect(None, None).unwrap();
            black_box(data.len())
        })
    });
}

criterion_group!(benches, bench_normalize, bench_traverse);
criterion_main!(benches);
