//! Navigation: one list of pages per component version.
//!
//! A module may declare its menu in `nav.adoc` as an AsciiDoc list of xrefs:
//!
//! ```asciidoc
//! * xref:index.adoc[Home]
//! ** xref:2024/k8s.adoc[]
//! * xref:ops:runbook.adoc[Runbook]
//! ```
//!
//! Nesting is flattened. An empty link text falls back to the page title.
//! Component versions without a `nav.adoc` list every page, sorted by URL.

use super::{MarkupConfig, NavigationBuilder};
use crate::{
    content::{ContentCatalog, ContentItem, Family},
    error::BuildResult,
    log,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub title: String,
    /// Site-absolute URL.
    pub url: String,
}

/// Navigation menus keyed by `<component>@<version>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationCatalog {
    pub menus: BTreeMap<String, Vec<NavEntry>>,
}

impl NavigationCatalog {
    pub fn get(&self, component: &str, version: &str) -> Option<&[NavEntry]> {
        self.menus
            .get(&menu_key(component, version))
            .map(Vec::as_slice)
    }
}

fn menu_key(component: &str, version: &str) -> String {
    format!("{component}@{version}")
}

/// Menus from `nav.adoc` files, or every page when a component version has none.
pub struct FlatNavigation;

impl NavigationBuilder for FlatNavigation {
    fn build(&self, catalog: &ContentCatalog, _markup: &MarkupConfig) -> BuildResult<NavigationCatalog> {
        let pages: HashMap<(&str, &str, &str, &str), &ContentItem> = catalog
            .pages()
            .map(|item| {
                let src = &item.src;
                ((src.component.as_str(), src.version.as_str(), src.module.as_str(), src.relative.as_str()), item)
            })
            .collect();

        let mut navigation = NavigationCatalog::default();
        for nav in catalog.files().iter().filter(|item| item.src.family == Family::Nav) {
            let entries = navigation
                .menus
                .entry(menu_key(&nav.src.component, &nav.src.version))
                .or_default();

            for (target, text) in String::from_utf8_lossy(&nav.contents).lines().filter_map(parse_nav_line) {
                let (module, relative) = match target.split_once(':') {
                    Some((module, relative)) => (module, relative),
                    None => (nav.src.module.as_str(), target),
                };
                let key = (nav.src.component.as_str(), nav.src.version.as_str(), module, relative);
                let Some(page) = pages.get(&key) else {
                    log!("nav"; "unresolved xref `{target}` in {}", nav.src.module);
                    continue;
                };
                let Some(publish) = &page.publish else {
                    continue;
                };
                let title = if text.is_empty() { page.display_title() } else { text };
                entries.push(NavEntry {
                    title: title.to_owned(),
                    url: publish.url.clone(),
                });
            }
        }

        let mut listed: BTreeMap<String, Vec<NavEntry>> = BTreeMap::new();
        for item in catalog.pages() {
            let key = menu_key(&item.src.component, &item.src.version);
            let Some(publish) = &item.publish else {
                continue;
            };
            if navigation.menus.contains_key(&key) {
                continue;
            }
            listed.entry(key).or_default().push(NavEntry {
                title: item.display_title().to_owned(),
                url: publish.url.clone(),
            });
        }
        for (key, mut entries) in listed {
            entries.sort_by(|a, b| a.url.cmp(&b.url));
            navigation.menus.insert(key, entries);
        }

        log!("nav"; "{} menus", navigation.menus.len());
        Ok(navigation)
    }
}

/// Target and link text of a `* xref:target[text]` list item.
fn parse_nav_line(line: &str) -> Option<(&str, &str)> {
    let item = line.trim_start().strip_prefix('*')?;
    let item = item.trim_start_matches('*').trim_start().strip_prefix("xref:")?;
    let (target, rest) = item.split_once('[')?;
    let text = rest.trim_end().strip_suffix(']')?;
    let target = target.split_once('#').map_or(target, |(target, _)| target);
    Some((target.trim(), text.trim()))
}
