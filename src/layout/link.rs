// src/layout/link.rs
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Layout, RowSkip, Variant};
use crate::core::sanitize::normalize_ws;
use crate::error::Result;
use crate::page::menu::{AxisMenu, AxisOption};
use crate::ui::{Scope, Selector, Ui};

/// Locators for the `<select>`/HTML-table dashboards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSelectors {
    pub menu: Selector,
    pub option: Selector,
    pub table: Selector,
    pub row: Selector,
    /// The anchor inside a row that actually navigates.
    pub row_anchor: Selector,
    pub row_skip: RowSkip,
}

impl Default for LinkSelectors {
    fn default() -> Self {
        Self {
            menu: Selector::xpath("//select[starts-with(@id, 'dimension_pick')]"),
            option: Selector::xpath(".//option"),
            table: Selector::class("Table"),
            row: Selector::xpath(".//tr"),
            row_anchor: Selector::xpath(".//td[@class='Data l']/a"),
            row_skip: RowSkip::Surplus,
        }
    }
}

pub struct LinkLayout {
    sel: LinkSelectors,
    timeout: Duration,
}

impl LinkLayout {
    pub fn new(sel: LinkSelectors, timeout: Duration) -> Self {
        Self { sel, timeout }
    }
}

impl<U: Ui> Layout<U> for LinkLayout {
    fn variant(&self) -> Variant { Variant::Link }

    fn menus(&self, ui: &mut U) -> Result<Vec<U::Handle>> {
        Ok(ui.wait_for_all(Scope::Document, &self.sel.menu, self.timeout)?)
    }

    fn resolve_options(&self, ui: &mut U, menu: &U::Handle) -> Result<Vec<AxisOption<U::Handle>>> {
        let handles = ui.wait_for_all(Scope::Within(menu), &self.sel.option, self.timeout)?;
        let mut options = Vec::with_capacity(handles.len());
        for h in handles {
            let name = normalize_ws(&ui.read_text(&h)?);
            options.push(AxisOption::new(name, h));
        }
        Ok(options)
    }

    // Options live inside the `<select>` and survive reopening; the widget
    // still has to be opened before it takes a choice.
    fn select_option(&self, ui: &mut U, menu: &mut AxisMenu<U::Handle>, name: &str) -> Result<()> {
        ui.click(menu.handle())?;
        let option = menu.find(name)?;
        ui.click(option.handle())?;
        Ok(())
    }

    fn tables(&self, ui: &mut U) -> Result<Vec<U::Handle>> {
        Ok(ui.wait_for_all(Scope::Document, &self.sel.table, self.timeout)?)
    }

    fn row_elements(&self, ui: &mut U, table: &U::Handle) -> Result<Vec<U::Handle>> {
        Ok(ui.wait_for_all(Scope::Within(table), &self.sel.row, self.timeout)?)
    }

    fn row_skip(&self) -> RowSkip { self.sel.row_skip }

    // The row container itself swallows clicks.
    fn click_row(&self, ui: &mut U, row: &U::Handle) -> Result<()> {
        let anchor = ui.wait_for_one(Scope::Within(row), &self.sel.row_anchor, self.timeout)?;
        Ok(ui.click(&anchor)?)
    }
}
