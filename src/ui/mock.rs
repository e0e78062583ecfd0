// src/ui/mock.rs
//! In-memory pivot page.
//!
//! [`MockPage`] behaves like a live dashboard as far as the collation core
//! can tell: three menus, three linked tables, aggregate and structural rows
//! ahead of the data rows, and handles that go stale once the part of the
//! page they point into re-renders. Faults can be scripted per row to
//! exercise the checkpoint/resume path.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::layout::{LinkSelectors, ObjectSelectors, Selectors, Variant};
use crate::page::AXES;
use crate::ui::{Scope, Selector, Ui, UiError, UiResult};

type Leaves = Vec<(String, i64)>;

/// Contents of the pivot: table 1 rows, table 2 rows per table-1 row, and
/// table 3 rows per (table-1, table-2) pair.
#[derive(Clone, Debug, Default)]
pub struct PivotFixture {
    pub axes: Vec<String>,
    pub t1: Leaves,
    pub t2: BTreeMap<String, Leaves>,
    pub t3: BTreeMap<(String, String), Leaves>,
}

impl PivotFixture {
    /// A fixture whose menus all offer `axes`.
    pub fn new<S: AsRef<str>>(axes: &[S]) -> Self {
        Self { axes: axes.iter().map(|a| s!(a.as_ref())).collect(), ..Self::default() }
    }

    pub fn row1(mut self, name: &str, value: i64) -> Self {
        self.t1.push((s!(name), value));
        self
    }

    pub fn row2(mut self, t1: &str, name: &str, value: i64) -> Self {
        self.t2.entry(s!(t1)).or_default().push((s!(name), value));
        self
    }

    pub fn row3(mut self, t1: &str, t2: &str, name: &str, value: i64) -> Self {
        self.t3.entry((s!(t1), s!(t2))).or_default().push((s!(name), value));
        self
    }
}

/// Opaque handle into a [`MockPage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MockHandle(u64);

#[derive(Clone, Debug)]
enum Node {
    Menu(usize),
    Listbox,
    Option { menu: usize, name: String, generation: u64 },
    Table(usize),
    Structural { table: usize, generation: u64 },
    Row { table: usize, name: String, text: String, generation: u64 },
    Anchor { table: usize, name: String, generation: u64 },
}

#[derive(Clone, Debug)]
struct StaleFault {
    table: usize,
    name: String,
    remaining: usize,
}

// `under` is the row picked in the table before `table` ("" for table 0).
#[derive(Clone, Debug)]
struct ReadFault {
    table: usize,
    under: String,
    remaining: usize,
}

pub struct MockPage {
    selectors: Selectors,
    fixture: PivotFixture,
    chosen_axes: [Option<String>; AXES],
    open_menu: Option<usize>,
    picked: [Option<String>; 2],
    generations: [u64; AXES],
    menu_generation: u64,
    nodes: HashMap<u64, Node>,
    next_id: u64,
    clicks: usize,
    visits: Vec<(usize, String)>,
    harvests: Vec<(String, String)>,
    faults: Vec<StaleFault>,
    read_faults: Vec<ReadFault>,
}

impl MockPage {
    pub fn new(fixture: PivotFixture, selectors: Selectors) -> Self {
        Self {
            selectors,
            fixture,
            chosen_axes: Default::default(),
            open_menu: None,
            picked: Default::default(),
            generations: [0; AXES],
            menu_generation: 0,
            nodes: HashMap::new(),
            next_id: 0,
            clicks: 0,
            visits: Vec::new(),
            harvests: Vec::new(),
            faults: Vec::new(),
            read_faults: Vec::new(),
        }
    }

    /// Page using the default locators of `variant`.
    pub fn with_variant(fixture: PivotFixture, variant: Variant) -> Self {
        Self::new(fixture, Selectors::for_variant(variant))
    }

    /// The next `times` clicks on the row called `name` in table `table`
    /// (0-based) fail as stale, and re-render that table.
    pub fn inject_stale(&mut self, table: usize, name: &str, times: usize) {
        self.faults.push(StaleFault { table, name: s!(name), remaining: times });
    }

    /// The next `times` reads of table `table` shown for the row `under`
    /// (the pick in the previous table; `""` for table 0) fail as stale and
    /// re-render that table.
    pub fn inject_stale_read(&mut self, table: usize, under: &str, times: usize) {
        self.read_faults.push(ReadFault { table, under: s!(under), remaining: times });
    }

    /// Every click issued so far, failed ones included.
    pub fn clicks(&self) -> usize { self.clicks }

    /// Successful row navigations in order: (table index, row name).
    pub fn visits(&self) -> &[(usize, String)] { &self.visits }

    /// Successful reads of table 3, as the (table-1, table-2) pair shown.
    pub fn harvests(&self) -> &[(String, String)] { &self.harvests }

    pub fn chosen_axes(&self) -> &[Option<String>; AXES] { &self.chosen_axes }

    /* ---------------- Rendering ---------------- */

    fn alloc(&mut self, node: Node) -> MockHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, node);
        MockHandle(id)
    }

    fn node(&self, h: &MockHandle) -> UiResult<&Node> {
        let node = self.nodes.get(&h.0).ok_or(UiError::Stale)?;
        if self.is_live(node) { Ok(node) } else { Err(UiError::Stale) }
    }

    fn is_live(&self, node: &Node) -> bool {
        match node {
            Node::Option { generation, .. } => match self.selectors.variant() {
                Variant::Object => *generation == self.menu_generation && self.open_menu.is_some(),
                Variant::Link => true,
            },
            Node::Listbox => self.open_menu.is_some(),
            Node::Structural { table, generation }
            | Node::Row { table, generation, .. }
            | Node::Anchor { table, generation, .. } => *generation == self.generations[*table],
            Node::Menu(_) | Node::Table(_) => true,
        }
    }

    fn axes_chosen(&self) -> bool {
        self.chosen_axes.iter().all(Option::is_some)
    }

    fn table_rows(&self, table: usize) -> Leaves {
        if !self.axes_chosen() {
            return Vec::new();
        }
        let rows = match table {
            0 => Some(&self.fixture.t1),
            1 => self.picked[0].as_ref().and_then(|a| self.fixture.t2.get(a)),
            _ => match (&self.picked[0], &self.picked[1]) {
                (Some(a), Some(b)) => self.fixture.t3.get(&(a.clone(), b.clone())),
                _ => None,
            },
        };
        rows.cloned().unwrap_or_default()
    }

    fn table_text(&self, table: usize) -> String {
        let rows = self.table_rows(table);
        let total: i64 = rows.iter().map(|(_, v)| v).sum();
        let mut lines = vec![s!(), format!("All {}", with_commas(total))];
        lines.extend(rows.iter().map(|(n, v)| format!("{n} {}", with_commas(*v))));
        lines.join("\n")
    }

    fn read_table(&mut self, table: usize) -> UiResult<String> {
        let under = match table {
            0 => s!(),
            t => self.picked[t - 1].clone().unwrap_or_default(),
        };
        if let Some(fault) = self
            .read_faults
            .iter_mut()
            .find(|f| f.table == table && f.under == under && f.remaining > 0)
        {
            fault.remaining -= 1;
            self.rerender_from(table);
            return Err(UiError::Stale);
        }
        if table == AXES - 1 && self.axes_chosen() {
            if let (Some(a), Some(b)) = (&self.picked[0], &self.picked[1]) {
                self.harvests.push((a.clone(), b.clone()));
            }
        }
        Ok(self.table_text(table))
    }

    fn render_rows(&mut self, table: usize) -> Vec<MockHandle> {
        let generation = self.generations[table];
        let rows = self.table_rows(table);
        let total: i64 = rows.iter().map(|(_, v)| v).sum();
        let mut out = vec![
            self.alloc(Node::Structural { table, generation }),
            self.alloc(Node::Row {
                table,
                name: s!("All"),
                text: format!("All {}", with_commas(total)),
                generation,
            }),
        ];
        for (name, value) in rows {
            let text = format!("{name} {}", with_commas(value));
            out.push(self.alloc(Node::Row { table, name, text, generation }));
        }
        out
    }

    fn render_options(&mut self, menu: usize) -> Vec<MockHandle> {
        let generation = self.menu_generation;
        let names = self.fixture.axes.clone();
        names
            .into_iter()
            .map(|name| self.alloc(Node::Option { menu, name, generation }))
            .collect()
    }

    fn query(&mut self, scope: Scope<'_, MockHandle>, selector: &Selector) -> UiResult<Vec<MockHandle>> {
        let parent = match scope {
            Scope::Document => None,
            Scope::Within(h) => Some(self.node(h)?.clone()),
        };
        let found = match (self.selectors.clone(), parent) {
            (Selectors::Object(sel), None) => self.query_object_document(&sel, selector),
            (Selectors::Link(sel), None) => self.query_link_document(&sel, selector),
            (Selectors::Object(sel), Some(parent)) => match parent {
                Node::Listbox if *selector == sel.option => {
                    let menu = self.open_menu.unwrap_or(0);
                    self.render_options(menu)
                }
                Node::Table(t) if *selector == sel.row => self.render_rows(t),
                _ => Vec::new(),
            },
            (Selectors::Link(sel), Some(parent)) => match parent {
                Node::Menu(m) if *selector == sel.option => self.render_options(m),
                Node::Table(t) if *selector == sel.row => self.render_rows(t),
                Node::Row { table, name, generation, .. } if *selector == sel.row_anchor => {
                    vec![self.alloc(Node::Anchor { table, name, generation })]
                }
                _ => Vec::new(),
            },
        };
        Ok(found)
    }

    fn query_object_document(&mut self, sel: &ObjectSelectors, selector: &Selector) -> Vec<MockHandle> {
        if *selector == sel.menu {
            (0..AXES).map(|m| self.alloc(Node::Menu(m))).collect()
        } else if *selector == sel.listbox && self.open_menu.is_some() {
            vec![self.alloc(Node::Listbox)]
        } else if *selector == sel.table {
            (0..AXES).map(|t| self.alloc(Node::Table(t))).collect()
        } else {
            Vec::new()
        }
    }

    fn query_link_document(&mut self, sel: &LinkSelectors, selector: &Selector) -> Vec<MockHandle> {
        if *selector == sel.menu {
            (0..AXES).map(|m| self.alloc(Node::Menu(m))).collect()
        } else if *selector == sel.table {
            (0..AXES).map(|t| self.alloc(Node::Table(t))).collect()
        } else {
            Vec::new()
        }
    }

    /* ---------------- Navigation ---------------- */

    fn rerender_from(&mut self, table: usize) {
        for g in &mut self.generations[table..] {
            *g += 1;
        }
    }

    fn pick(&mut self, table: usize, name: String) -> UiResult<()> {
        if let Some(fault) = self
            .faults
            .iter_mut()
            .find(|f| f.table == table && f.name == name && f.remaining > 0)
        {
            fault.remaining -= 1;
            self.rerender_from(table);
            return Err(UiError::Stale);
        }
        if table + 1 < AXES {
            self.picked[table] = Some(name.clone());
            for p in &mut self.picked[table + 1..] {
                *p = None;
            }
            self.rerender_from(table + 1);
        }
        self.visits.push((table, name));
        Ok(())
    }
}

impl Ui for MockPage {
    type Handle = MockHandle;

    fn wait_for_all(
        &mut self,
        scope: Scope<'_, MockHandle>,
        selector: &Selector,
        _timeout: Duration,
    ) -> UiResult<Vec<MockHandle>> {
        let found = self.query(scope, selector)?;
        if found.is_empty() {
            return Err(UiError::Timeout(selector.to_string()));
        }
        Ok(found)
    }

    fn read_text(&mut self, handle: &MockHandle) -> UiResult<String> {
        let text = match self.node(handle)?.clone() {
            Node::Menu(m) => self.chosen_axes[m].clone().unwrap_or_default(),
            Node::Option { name, .. } => name,
            Node::Table(t) => return self.read_table(t),
            Node::Row { text, .. } => text,
            Node::Anchor { name, .. } => name,
            Node::Listbox | Node::Structural { .. } => s!(),
        };
        Ok(text)
    }

    fn click(&mut self, handle: &MockHandle) -> UiResult<()> {
        self.clicks += 1;
        let node = self.node(handle)?.clone();
        match (self.selectors.variant(), node) {
            (Variant::Object, Node::Menu(m)) => {
                self.open_menu = Some(m);
                self.menu_generation += 1;
            }
            (Variant::Link, Node::Menu(m)) => self.open_menu = Some(m),
            (_, Node::Option { menu, name, .. }) => {
                if self.open_menu != Some(menu) {
                    return Err(UiError::Backend(format!("menu {menu} is closed")));
                }
                self.chosen_axes[menu] = Some(name);
                self.open_menu = None;
                self.picked = Default::default();
                self.rerender_from(0);
            }
            (Variant::Object, Node::Row { table, name, .. }) if name != "All" => {
                self.pick(table, name)?;
            }
            (Variant::Link, Node::Anchor { table, name, .. }) => self.pick(table, name)?,
            // Link rows swallow clicks; aggregates and containers do nothing.
            _ => {}
        }
        Ok(())
    }
}

/// `1234567` → `"1,234,567"`, the way the dashboards print counts.
pub fn with_commas(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
