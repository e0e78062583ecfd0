// src/layout/mod.rs
//! Structural variants of the pivot dashboards.
//!
//! The dashboards come in two shapes that behave the same to a reader but
//! differ in how they are driven:
//!
//! - **object**: listbox buttons whose options only exist while open (and go
//!   stale on every reopen); tables of `div` rows clicked directly.
//! - **link**: `<select>` menus whose `<option>` children stay valid; HTML
//!   tables whose rows are driven through an anchor inside the row.
//!
//! Each variant implements [`Layout`]. One layout is picked per run and the
//! rest of the crate only talks to the trait.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::page::menu::{AxisMenu, AxisOption};
use crate::ui::Ui;

pub mod link;
pub mod object;

pub use link::{LinkLayout, LinkSelectors};
pub use object::{ObjectLayout, ObjectSelectors};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Object,
    Link,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Variant::Object => "object", Variant::Link => "link" })
    }
}

impl FromStr for Variant {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "object" => Ok(Variant::Object),
            "link" => Ok(Variant::Link),
            other => Err(format!("Unknown layout: {other}")),
        }
    }
}

/// Which row elements of a table carry no data line.
///
/// A table renders structural rows (headers, the "All" aggregate) ahead of
/// its data rows. The element list is therefore longer than the list of
/// meaningful text lines, and the extra elements have to be dropped from the
/// front before the two lists are paired up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowSkip {
    /// Drop `elements - lines` from the front.
    #[default]
    Surplus,
    /// Drop exactly this many from the front.
    Leading(usize),
}

impl RowSkip {
    pub fn apply<H>(&self, mut elements: Vec<H>, lines: usize) -> Vec<H> {
        let n = match *self {
            RowSkip::Surplus => elements.len().saturating_sub(lines),
            RowSkip::Leading(n) => n.min(elements.len()),
        };
        elements.drain(..n);
        if elements.len() != lines {
            logw!(elements = elements.len(), lines, "row elements and text lines disagree after skip");
        }
        elements
    }
}

/// Site-specific element locators for one variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selectors {
    Object(ObjectSelectors),
    Link(LinkSelectors),
}

impl Selectors {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Object => Selectors::Object(ObjectSelectors::default()),
            Variant::Link => Selectors::Link(LinkSelectors::default()),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Selectors::Object(_) => Variant::Object,
            Selectors::Link(_) => Variant::Link,
        }
    }
}

/// Variant-specific mechanics of menus, tables, and rows.
///
/// Every method reads the page afresh; nothing here caches handles across a
/// navigation.
pub trait Layout<U: Ui> {
    fn variant(&self) -> Variant;

    /// The axis menus in page order.
    fn menus(&self, ui: &mut U) -> Result<Vec<U::Handle>>;

    /// Read the options a menu offers, in presentation order.
    fn resolve_options(&self, ui: &mut U, menu: &U::Handle) -> Result<Vec<AxisOption<U::Handle>>>;

    /// Open `menu` and pick the option called `name`.
    fn select_option(&self, ui: &mut U, menu: &mut AxisMenu<U::Handle>, name: &str) -> Result<()>;

    /// The linked tables in page order.
    fn tables(&self, ui: &mut U) -> Result<Vec<U::Handle>>;

    /// Every row-level element of `table`, structural rows included.
    fn row_elements(&self, ui: &mut U, table: &U::Handle) -> Result<Vec<U::Handle>>;

    fn row_skip(&self) -> RowSkip;

    /// Drill into the next table through this row.
    fn click_row(&self, ui: &mut U, row: &U::Handle) -> Result<()>;
}

/// Build the layout for a selector set.
pub fn layout_for<U: Ui>(selectors: Selectors, timeout: Duration) -> Box<dyn Layout<U>> {
    match selectors {
        Selectors::Object(sel) => Box::new(ObjectLayout::new(sel, timeout)),
        Selectors::Link(sel) => Box::new(LinkLayout::new(sel, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surplus_drops_leading_extras() {
        let kept = RowSkip::Surplus.apply(vec!["hdr", "all", "a", "b"], 2);
        assert_eq!(kept, vec!["a", "b"]);
    }

    #[test]
    fn surplus_keeps_all_when_counts_match() {
        let kept = RowSkip::Surplus.apply(vec!["a", "b"], 2);
        assert_eq!(kept, vec!["a", "b"]);
    }

    #[test]
    fn leading_is_explicit_and_clamped() {
        assert_eq!(RowSkip::Leading(1).apply(vec!["hdr", "a", "b"], 2), vec!["a", "b"]);
        assert!(RowSkip::Leading(9).apply(vec!["hdr"], 0).is_empty());
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Object".parse::<Variant>().unwrap(), Variant::Object);
        assert_eq!(" link ".parse::<Variant>().unwrap(), Variant::Link);
        assert!("map".parse::<Variant>().is_err());
    }
}
