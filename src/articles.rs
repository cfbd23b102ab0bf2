//! Article selection for the blog pages.

use crate::content::{ContentCatalog, ContentItem};

/// Renderable AsciiDoc pages, except the landing document.
///
/// `landing_basename` is compared with the source basename, e.g. `index.adoc`.
pub fn all_articles<'a>(catalog: &'a ContentCatalog, landing_basename: &str) -> Vec<&'a ContentItem> {
    catalog
        .files()
        .iter()
        .filter(|item| item.markup && item.src.basename != landing_basename)
        .collect()
}

/// Articles whose `page-tags` contain `tag` exactly (after trimming entries).
///
/// Articles without `page-tags` never match.
pub fn articles_with_tag<'a>(articles: &[&'a ContentItem], tag: &str) -> Vec<&'a ContentItem> {
    articles
        .iter()
        .copied()
        .filter(|item| item.attributes.tags().contains(&tag))
        .collect()
}
