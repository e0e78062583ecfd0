// src/layout/object.rs
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Layout, RowSkip, Variant};
use crate::core::sanitize::normalize_ws;
use crate::error::Result;
use crate::page::menu::{AxisMenu, AxisOption};
use crate::ui::{Scope, Selector, Ui};

/// Locators for the listbox/`div`-table dashboards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSelectors {
    pub menu: Selector,
    /// Popup holding the options; only present while a menu is open.
    pub listbox: Selector,
    pub option: Selector,
    pub table: Selector,
    pub row: Selector,
    pub row_skip: RowSkip,
}

impl Default for ObjectSelectors {
    fn default() -> Self {
        Self {
            menu: Selector::xpath("//button[starts-with(@id, 'headlessui-listbox-button')]"),
            listbox: Selector::xpath("//ul[starts-with(@id, 'headlessui-listbox-options')]"),
            option: Selector::xpath(".//*[@role='option']/li/span"),
            table: Selector::class("table-fixed"),
            row: Selector::class("flex-row"),
            row_skip: RowSkip::Surplus,
        }
    }
}

pub struct ObjectLayout {
    sel: ObjectSelectors,
    timeout: Duration,
}

impl ObjectLayout {
    pub fn new(sel: ObjectSelectors, timeout: Duration) -> Self {
        Self { sel, timeout }
    }
}

impl<U: Ui> Layout<U> for ObjectLayout {
    fn variant(&self) -> Variant { Variant::Object }

    fn menus(&self, ui: &mut U) -> Result<Vec<U::Handle>> {
        Ok(ui.wait_for_all(Scope::Document, &self.sel.menu, self.timeout)?)
    }

    // The listbox is not inside the button and only materializes once the
    // button is clicked, so reading options always opens the menu.
    fn resolve_options(&self, ui: &mut U, menu: &U::Handle) -> Result<Vec<AxisOption<U::Handle>>> {
        ui.click(menu)?;
        let listbox = ui.wait_for_one(Scope::Document, &self.sel.listbox, self.timeout)?;
        let handles = ui.wait_for_all(Scope::Within(&listbox), &self.sel.option, self.timeout)?;
        let mut options = Vec::with_capacity(handles.len());
        for h in handles {
            let name = normalize_ws(&ui.read_text(&h)?);
            options.push(AxisOption::new(name, h));
        }
        Ok(options)
    }

    // Option handles from any earlier opening are stale by now; reopening
    // re-reads them.
    fn select_option(&self, ui: &mut U, menu: &mut AxisMenu<U::Handle>, name: &str) -> Result<()> {
        let fresh = self.resolve_options(ui, menu.handle())?;
        menu.replace_options(fresh);
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

    fn click_row(&self, ui: &mut U, row: &U::Handle) -> Result<()> {
        Ok(ui.click(row)?)
    }
}
