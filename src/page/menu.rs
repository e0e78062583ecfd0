// src/page/menu.rs
use crate::error::{CollateError, Result};
use crate::layout::Layout;
use crate::page::AXES;
use crate::ui::Ui;

/// One selectable entry of an axis menu.
#[derive(Clone, Debug)]
pub struct AxisOption<H> {
    pub name: String,
    handle: H,
}

impl<H> AxisOption<H> {
    pub fn new(name: String, handle: H) -> Self { Self { name, handle } }
    pub fn handle(&self) -> &H { &self.handle }
}

/// One of the three drop-downs that pick the dimension shown in a table.
#[derive(Clone, Debug)]
pub struct AxisMenu<H> {
    index: usize,
    handle: H,
    options: Vec<AxisOption<H>>,
}

impl<H: Clone> AxisMenu<H> {
    /// Find the page's menus and read what each one offers.
    pub fn resolve_all<U>(ui: &mut U, layout: &dyn Layout<U>) -> Result<Vec<AxisMenu<H>>>
    where
        U: Ui<Handle = H>,
    {
        let handles = layout.menus(ui)?;
        if handles.len() < AXES {
            return Err(CollateError::ElementTimeout(format!(
                "{AXES} axis menus (found {})", handles.len()
            )));
        }
        let mut menus = Vec::with_capacity(AXES);
        for (index, handle) in handles.into_iter().take(AXES).enumerate() {
            let options = layout.resolve_options(ui, &handle)?;
            logd!(menu = index, options = options.len(), "resolved axis menu");
            menus.push(AxisMenu { index, handle, options });
        }
        Ok(menus)
    }

    pub fn index(&self) -> usize { self.index }
    pub fn handle(&self) -> &H { &self.handle }
    pub fn options(&self) -> &[AxisOption<H>] { &self.options }

    pub fn option_names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    /// Exact-name lookup among the options read last.
    pub fn find(&self, name: &str) -> Result<&AxisOption<H>> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| CollateError::OptionNotFound { menu: self.index, name: s!(name) })
    }

    pub(crate) fn replace_options(&mut self, options: Vec<AxisOption<H>>) {
        self.options = options;
    }

    pub fn select_by_name<U>(&mut self, ui: &mut U, layout: &dyn Layout<U>, name: &str) -> Result<()>
    where
        U: Ui<Handle = H>,
    {
        layout.select_option(ui, self, name)
    }
}

/// Every requested axis must be offered by every menu. Checked before the
/// first selection so a typo never leaves the page half-configured.
pub fn validate_axes<H: Clone>(menus: &[AxisMenu<H>], axes: &[String]) -> Result<()> {
    for menu in menus {
        for axis in axes {
            if !menu.has_option(axis) {
                logd!(menu = menu.index, offered = ?menu.option_names(), "axis {axis:?} not offered");
                return Err(CollateError::UnknownAxis(axis.clone()));
            }
        }
    }
    Ok(())
}
