// src/page/table.rs
use crate::error::{CollateError, Result};
use crate::layout::Layout;
use crate::ui::Ui;

/// Markers of aggregate lines that are not data rows.
const AGGREGATE_MARKERS: [&str; 2] = ["All", "Total"];

/// One data line of a table: a category and its count.
#[derive(Clone, Debug)]
pub struct Row<H> {
    pub name: String,
    pub value: i64,
    handle: H,
}

impl<H> Row<H> {
    pub fn handle(&self) -> &H { &self.handle }

    /// Drill into the next table through this row.
    pub fn click<U>(&self, ui: &mut U, layout: &dyn Layout<U>) -> Result<()>
    where
        U: Ui<Handle = H>,
    {
        layout.click_row(ui, &self.handle)
    }
}

/// Position of one of the linked tables. Table 0 feeds 1, 1 feeds 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableModel {
    index: usize,
}

impl TableModel {
    pub const fn new(index: usize) -> Self { Self { index } }

    pub const fn all() -> [TableModel; 3] {
        [TableModel::new(0), TableModel::new(1), TableModel::new(2)]
    }

    pub fn index(&self) -> usize { self.index }

    /// Read this table's data rows as currently rendered.
    ///
    /// Always goes back to the page: the table element itself is located
    /// again, then its row elements and its text. Lines that are empty or
    /// aggregates are dropped, the surplus row elements are dropped from the
    /// front (see [`crate::layout::RowSkip`]), and the rest are paired up in
    /// order.
    pub fn current_rows<U: Ui>(&self, ui: &mut U, layout: &dyn Layout<U>) -> Result<Vec<Row<U::Handle>>> {
        let tables = layout.tables(ui)?;
        let table = tables.get(self.index).ok_or_else(|| {
            CollateError::ElementTimeout(format!("table {} (found {})", self.index + 1, tables.len()))
        })?;

        let elements = layout.row_elements(ui, table)?;
        let text = ui.read_text(table)?;
        let lines: Vec<&str> = text.lines().filter(|l| is_meaningful(l)).collect();
        let elements = layout.row_skip().apply(elements, lines.len());

        let mut rows = Vec::with_capacity(lines.len());
        for (handle, line) in elements.into_iter().zip(lines) {
            let (name, value) = parse_row_text(line)?;
            rows.push(Row { name, value, handle });
        }
        logd!(table = self.index + 1, rows = rows.len(), "read table rows");
        Ok(rows)
    }
}

/// A line is a data row unless it is blank or an aggregate.
pub fn is_meaningful(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && !AGGREGATE_MARKERS.iter().any(|m| t.contains(m))
}

/// Split `"Name with spaces 1,234"` on the last whitespace run into the name
/// and the count (thousands separators stripped).
pub fn parse_row_text(line: &str) -> Result<(String, i64)> {
    let t = line.trim();
    let split = t
        .rfind(char::is_whitespace)
        .ok_or_else(|| CollateError::RowParse(s!(line)))?;
    let name = t[..split].trim_end();
    let value = t[split..]
        .trim()
        .replace(',', "")
        .parse::<i64>()
        .map_err(|_| CollateError::RowParse(s!(line)))?;
    if name.is_empty() {
        return Err(CollateError::RowParse(s!(line)));
    }
    Ok((s!(name), value))
}
