// src/dataset.rs
//! The raw result of a traversal, before normalization.
//!
//! `dataset[t1][t2][t3] = count`. A (t1, t2) pair that produced no table-3
//! rows is kept as an empty map; a t1 row whose table 2 was empty is kept as
//! an empty map too. Both survive to normalization as all-zero rows.

use std::collections::BTreeMap;

pub type Leaves = BTreeMap<String, i64>;
pub type Dataset = BTreeMap<String, BTreeMap<String, Leaves>>;

/// Number of (t1, t2) pairs recorded.
pub fn pair_count(data: &Dataset) -> usize {
    data.values().map(BTreeMap::len).sum()
}
