// src/normalize.rs
//! Dense, sorted, totaled form of a collected [`Dataset`].

use std::collections::BTreeSet;

use crate::dataset::{Dataset, Leaves};

pub const TOTAL: &str = "Total";

/// One (t1, t2) line of a normalized dataset. `cells` lines up with
/// [`NormalizedDataset::columns`], `Total` last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedRow {
    pub t1: String,
    pub t2: String,
    pub cells: Vec<i64>,
}

impl NormalizedRow {
    pub fn total(&self) -> i64 {
        self.cells.last().copied().unwrap_or(0)
    }
}

/// Rectangular table indexed by (axis-1, axis-2).
///
/// Invariants: one row per element of T1 × T2 (both as observed), rows in
/// (t1, t2) order, data columns sorted with `Total` appended last, no
/// missing cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedDataset {
    pub index_names: [String; 2],
    pub columns: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedDataset {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn row(&self, t1: &str, t2: &str) -> Option<&NormalizedRow> {
        self.rows.iter().find(|r| r.t1 == t1 && r.t2 == t2)
    }

    /// Cell at (t1, t2, column), `Total` included.
    pub fn value(&self, t1: &str, t2: &str, column: &str) -> Option<i64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.row(t1, t2).map(|r| r.cells[col])
    }

    /// Back to nested form, `Total` included as an ordinary leaf.
    pub fn to_dataset(&self) -> Dataset {
        let mut data = Dataset::new();
        for row in &self.rows {
            let leaves: Leaves = self.columns.iter().cloned().zip(row.cells.iter().copied()).collect();
            data.entry(row.t1.clone()).or_default().insert(row.t2.clone(), leaves);
        }
        data
    }
}

/// Reindex to the full T1 × T2 product, fill gaps with 0, sort rows and
/// columns, append `Total`, and name the index levels.
///
/// A `Total` leaf already present in the input is recomputed rather than
/// summed, so normalizing a normalized dataset changes nothing.
pub fn normalize(data: &Dataset, axis1: &str, axis2: &str) -> NormalizedDataset {
    let t1_names: BTreeSet<&String> = data.keys().collect();
    let t2_names: BTreeSet<&String> = data.values().flat_map(|inner| inner.keys()).collect();
    let data_columns: BTreeSet<&String> = data
        .values()
        .flat_map(|inner| inner.values())
        .flat_map(|leaves| leaves.keys())
        .filter(|k| k.as_str() != TOTAL)
        .collect();

    let mut rows = Vec::with_capacity(t1_names.len() * t2_names.len());
    for t1 in &t1_names {
        for t2 in &t2_names {
            let leaves = data.get(*t1).and_then(|inner| inner.get(*t2));
            let mut cells: Vec<i64> = data_columns
                .iter()
                .map(|c| leaves.and_then(|l| l.get(*c)).copied().unwrap_or(0))
                .collect();
            let total: i64 = cells.iter().sum();
            cells.push(total);
            rows.push(NormalizedRow { t1: (*t1).clone(), t2: (*t2).clone(), cells });
        }
    }

    let mut columns: Vec<String> = data_columns.into_iter().cloned().collect();
    columns.push(s!(TOTAL));

    NormalizedDataset { index_names: [s!(axis1), s!(axis2)], columns, rows }
}
