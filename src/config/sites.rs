// src/config/sites.rs
//! Known TRAC dashboards and how far each kind is supported.

use std::fmt;

use crate::error::{CollateError, Result};
use crate::layout::Variant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageType {
    ObjectWhole,
    LinkWhole,
    /// Year broken out into its own drop-down.
    ObjectBroken,
    LinkBroken,
    MapTable,
    TableOnly1,
    TableOnly2,
    TableTab,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Support {
    Full,
    /// Recognized, but the broken-out-year menus are not driven yet.
    Partial,
    None,
}

impl PageType {
    pub fn support(&self) -> Support {
        match self {
            PageType::ObjectWhole | PageType::LinkWhole => Support::Full,
            PageType::ObjectBroken | PageType::LinkBroken => Support::Partial,
            _ => Support::None,
        }
    }

    pub fn variant(&self) -> Option<Variant> {
        match self {
            PageType::ObjectWhole | PageType::ObjectBroken => Some(Variant::Object),
            PageType::LinkWhole | PageType::LinkBroken => Some(Variant::Link),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PageType::ObjectWhole => "object-whole",
            PageType::LinkWhole => "link-whole",
            PageType::ObjectBroken => "object-broken",
            PageType::LinkBroken => "link-broken",
            PageType::MapTable => "map-table",
            PageType::TableOnly1 => "table-only-1",
            PageType::TableOnly2 => "table-only-2",
            PageType::TableTab => "table-tab",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const SITES: &[(&str, PageType)] = &[
    ("https://trac.syr.edu/phptools/immigration/ntanew/", PageType::ObjectWhole),
    ("https://trac.syr.edu/phptools/immigration/closure/", PageType::ObjectWhole),
    ("https://trac.syr.edu/phptools/immigration/asyfile/", PageType::ObjectWhole),
    ("https://trac.syr.edu/phptools/immigration/asylum/", PageType::ObjectWhole),
    ("https://trac.syr.edu/phptools/immigration/mpp4/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/juvenile/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/mwc/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/cbparrest/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/cbpinadmiss/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/arrest/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/detainhistory/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/remove/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/removehistory/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/secure/", PageType::LinkWhole),
    ("https://trac.syr.edu/phptools/immigration/backlog/", PageType::ObjectBroken),
    ("https://trac.syr.edu/phptools/immigration/addressrep/", PageType::MapTable),
    ("https://trac.syr.edu/immigration/reports/judgereports/", PageType::TableOnly1),
    ("https://trac.syr.edu/phptools/immigration/asylumbl/", PageType::ObjectBroken),
    ("https://trac.syr.edu/phptools/immigration/bond/", PageType::TableTab),
    ("https://trac.syr.edu/phptools/immigration/detention/", PageType::LinkBroken),
    ("https://trac.syr.edu/immigration/detentionstats/facilities.html", PageType::TableOnly2),
    ("https://trac.syr.edu/immigration/detentionstats/atd_pop_table.html", PageType::TableOnly2),
];

/// Registry lookup. A missing trailing slash on directory-style URLs is
/// tolerated.
pub fn lookup(url: &str) -> Option<PageType> {
    let url = url.trim();
    SITES
        .iter()
        .find(|(u, _)| *u == url || (u.ends_with('/') && u.trim_end_matches('/') == url))
        .map(|(_, t)| *t)
}

/// Decide the layout variant for `url`.
///
/// Registered, fully supported pages use their own variant; registered pages
/// of any other kind are refused. Unregistered URLs need an explicit
/// `layout` choice.
pub fn resolve_variant(url: &str, layout: Option<Variant>) -> Result<Variant> {
    match lookup(url) {
        Some(kind) => match (kind.support(), kind.variant()) {
            (Support::Full, Some(v)) => Ok(layout.unwrap_or(v)),
            _ => Err(CollateError::UnsupportedSite { url: s!(url), kind }),
        },
        None => layout.ok_or_else(|| CollateError::UnknownSite(s!(url))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_pages_resolve_to_their_variant() {
        let v = resolve_variant("https://trac.syr.edu/phptools/immigration/asylum/", None).unwrap();
        assert_eq!(v, Variant::Object);
        let v = resolve_variant("https://trac.syr.edu/phptools/immigration/arrest", None).unwrap();
        assert_eq!(v, Variant::Link);
    }

    #[test]
    fn broken_out_year_pages_are_refused() {
        let err = resolve_variant("https://trac.syr.edu/phptools/immigration/backlog/", None).unwrap_err();
        assert!(matches!(err, CollateError::UnsupportedSite { kind: PageType::ObjectBroken, .. }));
        assert_eq!(PageType::LinkBroken.support(), Support::Partial);
    }

    #[test]
    fn table_only_pages_are_refused_even_with_override() {
        let url = "https://trac.syr.edu/immigration/detentionstats/facilities.html";
        assert!(resolve_variant(url, Some(Variant::Link)).is_err());
    }

    #[test]
    fn unknown_urls_need_a_layout() {
        let url = "https://example.org/pivot/";
        assert!(matches!(resolve_variant(url, None), Err(CollateError::UnknownSite(_))));
        assert_eq!(resolve_variant(url, Some(Variant::Link)).unwrap(), Variant::Link);
    }

    #[test]
    fn every_registered_url_is_distinct() {
        let mut urls: Vec<&str> = SITES.iter().map(|(u, _)| *u).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), SITES.len());
    }
}
