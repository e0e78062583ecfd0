// src/page/mod.rs
//! Page-level entities: axis menus, linked tables, and their rows.
//!
//! Everything here is ephemeral. Rows and options hold UI handles that die
//! with the next navigation, so callers re-read them whenever they re-enter a
//! table's context.

pub mod menu;
pub mod table;

pub use menu::{AxisMenu, AxisOption, validate_axes};
pub use table::{Row, TableModel, is_meaningful, parse_row_text};

/// Number of linked tables (and axis menus) on a pivot page.
pub const AXES: usize = 3;
