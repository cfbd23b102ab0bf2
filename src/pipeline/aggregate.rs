//! Filesystem content aggregator.
//!
//! Reads every configured source directory laid out as
//! `modules/<module>/<family>/...` and classifies the files found there.
//!
//! | Path under `modules/` | Family |
//! |-----------------------|--------|
//! | `ROOT/pages/hello.adoc` | page |
//! | `ROOT/images/a.png` | image |
//! | `ROOT/attachments/a.pdf` | attachment |
//! | `ROOT/partials/p.adoc` | partial |
//! | `ROOT/examples/main.rs` | example |
//! | `ROOT/nav.adoc` | nav |
//!
//! Hidden files and anything else are skipped.

use super::ContentAggregator;
use crate::{
    config::{SiteConfig, build::SourceConfig},
    content::{Attributes, ContentCatalog, ContentItem, Family, Source},
    error::{BuildError, BuildResult},
    log,
};
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Aggregates content from the `[[build.sources]]` directories.
pub struct FsAggregator;

impl ContentAggregator for FsAggregator {
    fn aggregate(&self, config: &SiteConfig) -> BuildResult<ContentCatalog> {
        let mut items = Vec::new();
        for source in &config.build.sources {
            let found = collect_source(source)?;
            log!(
                "content";
                "{}@{}: {} files",
                source.component,
                source.version,
                found.len()
            );
            items.extend(found);
        }
        Ok(ContentCatalog::new(items))
    }
}

fn collect_source(source: &SourceConfig) -> BuildResult<Vec<ContentItem>> {
    let modules = source.path.join("modules");
    if !modules.is_dir() {
        return Err(BuildError::content(&modules, "missing modules directory"));
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(&modules).sort_by_file_name() {
        let entry = entry.map_err(|err| BuildError::content(&modules, err))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let parts = path
            .strip_prefix(&modules)
            .map_err(|err| BuildError::content(path, err))?
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| BuildError::content(path, "invalid path encoding"))?;

        let Some(src) = classify_path(source, &parts) else {
            continue;
        };
        let contents = fs::read(path).map_err(|err| BuildError::content(path, err))?;
        items.push(read_item(src, contents, path)?);
    }

    Ok(items)
}

/// Source identity for a path split into components below `modules/`.
fn classify_path(source: &SourceConfig, parts: &[&str]) -> Option<Source> {
    if parts.iter().any(|part| part.starts_with('.')) {
        return None;
    }

    let (component, version) = (&source.component, &source.version);
    match parts {
        [module, "nav.adoc"] => Some(Source::new(component, version, module, Family::Nav, "nav.adoc")),
        [module, family, rest @ ..] if !rest.is_empty() => {
            let family = Family::from_dir(family)?;
            Some(Source::new(component, version, module, family, &rest.join("/")))
        }
        _ => None,
    }
}

/// Build the item, reading title and attributes from AsciiDoc page headers.
fn read_item(src: Source, contents: Vec<u8>, path: &Path) -> BuildResult<ContentItem> {
    let item = ContentItem::new(src, contents);
    if !item.markup {
        return Ok(item);
    }

    let text = std::str::from_utf8(&item.contents).map_err(|err| BuildError::content(path, err))?;
    let (title, attributes) = parse_header(text);
    Ok(item.with_title(title).with_attributes(attributes))
}

// ============================================================================
// Header Parsing
// ============================================================================

/// Read the document title and attribute entries of an AsciiDoc header.
///
/// The header ends at the first blank line after it started, or at the first
/// line that is neither a title, an attribute entry, nor an author/revision
/// line following the title.
pub fn parse_header(text: &str) -> (Option<String>, Attributes) {
    let mut title = None;
    let mut attributes = Attributes::new();
    let mut in_header = false;

    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            if in_header {
                break;
            }
            continue;
        }
        if line.starts_with("//") {
            continue;
        }

        if let Some((name, value)) = attribute_entry(line) {
            // `:name!:` unsets, nothing to record
            if let Some(value) = value {
                attributes.insert(name, value.to_owned());
            }
            in_header = true;
        } else if let Some(doctitle) = line.strip_prefix("= ")
            && title.is_none()
        {
            title = Some(doctitle.trim().to_owned());
            in_header = true;
        } else if title.is_none() {
            break;
        }
        // author and revision lines follow the title
    }

    (title, attributes)
}

/// Parse `:name: value`; the value is `None` for `:name!:` and `:!name:`.
fn attribute_entry(line: &str) -> Option<(&str, Option<&str>)> {
    let rest = line.strip_prefix(':')?;
    let end = rest.find(':')?;
    let (name, value) = (&rest[..end], &rest[end + 1..]);

    let (name, unset) = match name.strip_suffix('!').or_else(|| name.strip_prefix('!')) {
        Some(name) => (name, true),
        None => (name, false),
    };
    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_name || !(value.is_empty() || value.starts_with([' ', '\t'])) {
        return None;
    }

    Some((name, (!unset).then(|| value.trim())))
}

// ============================================================================
// Tests
// ============================================================================
