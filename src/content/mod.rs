//! Content catalog: the classified source files of a build.
//!
//! The catalog is produced once by a [`ContentAggregator`] and is read-only
//! afterwards; page descriptors borrow items from it.
//!
//! [`ContentAggregator`]: crate::pipeline::ContentAggregator

mod attributes;

pub use attributes::{AttributeKey, Attributes};

use crate::page::{Out, Pub, locate};
use crate::pipeline::{FileCatalog, PublishFile};
use serde::Serialize;

// ============================================================================
// Source Identity
// ============================================================================

/// Role of a file inside a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Page,
    Image,
    Attachment,
    Partial,
    Example,
    Nav,
}

impl Family {
    /// Family for a directory name under `modules/<module>/`.
    pub fn from_dir(name: &str) -> Option<Self> {
        match name {
            "pages" => Some(Self::Page),
            "images" => Some(Self::Image),
            "attachments" => Some(Self::Attachment),
            "partials" => Some(Self::Partial),
            "examples" => Some(Self::Example),
            _ => None,
        }
    }

    /// Output directory prefix of published families.
    pub const fn out_dir(self) -> Option<&'static str> {
        match self {
            Self::Page => Some(""),
            Self::Image => Some("_images/"),
            Self::Attachment => Some("_attachments/"),
            Self::Partial | Self::Example | Self::Nav => None,
        }
    }
}

/// Where a content item comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub component: String,
    pub version: String,
    pub module: String,
    pub family: Family,
    /// Path inside the family directory, `/`-separated.
    /// Example: `2024/hello.adoc`
    pub relative: String,
    /// Example: `hello.adoc`
    pub basename: String,
    /// Example: `hello`
    pub stem: String,
    /// Example: `.adoc`
    pub extname: String,
}

impl Source {
    pub fn new(component: &str, version: &str, module: &str, family: Family, relative: &str) -> Self {
        let basename = relative.rsplit('/').next().unwrap_or(relative).to_owned();
        let (stem, extname) = match basename.rfind('.') {
            Some(dot) if dot > 0 => (basename[..dot].to_owned(), basename[dot..].to_owned()),
            _ => (basename.clone(), String::new()),
        };

        Self {
            component: component.to_owned(),
            version: version.to_owned(),
            module: module.to_owned(),
            family,
            relative: relative.to_owned(),
            basename,
            stem,
            extname,
        }
    }
}

// ============================================================================
// Content Item
// ============================================================================

/// One source file of the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    pub src: Source,
    pub media_type: String,
    /// True for AsciiDoc pages, the only items the converter renders.
    pub markup: bool,
    /// Document title from the header, when there is one.
    pub title: Option<String>,
    pub attributes: Attributes,
    #[serde(skip)]
    pub contents: Vec<u8>,
    pub out: Option<Out>,
    #[serde(rename = "pub")]
    pub publish: Option<Pub>,
}

impl ContentItem {
    /// Create an item, assigning output locations for published families.
    pub fn new(src: Source, contents: Vec<u8>) -> Self {
        let markup = src.family == Family::Page && src.extname == ".adoc";
        let (out, publish) = match out_path(&src) {
            Some(path) => {
                let (out, publish) = locate(&path);
                (Some(out), Some(publish))
            }
            None => (None, None),
        };

        Self {
            media_type: media_type(&src.extname).to_owned(),
            markup,
            title: None,
            attributes: Attributes::default(),
            contents,
            out,
            publish,
            src,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Title for listings: the document title, or the file stem.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.src.stem)
    }
}

/// Output path for an item, `None` for families that are never published.
///
/// | Source | Output |
/// |--------|--------|
/// | `blog/1.0/ROOT/pages/hello.adoc` | `blog/1.0/hello.html` |
/// | `blog/1.0/ops/pages/k8s.adoc` | `blog/1.0/ops/k8s.html` |
/// | `blog/1.0/ROOT/images/a.png` | `blog/1.0/_images/a.png` |
fn out_path(src: &Source) -> Option<String> {
    let family_dir = src.family.out_dir()?;
    let relative = if src.family == Family::Page && src.extname == ".adoc" {
        let stem = src.relative.strip_suffix(&src.extname).unwrap_or(&src.relative);
        format!("{stem}.html")
    } else {
        src.relative.clone()
    };
    Some(format!(
        "{}{family_dir}{relative}",
        module_prefix(&src.component, &src.version, &src.module)
    ))
}

/// `<component>/<version>/` plus `<module>/` unless the module is `ROOT`.
pub fn module_prefix(component: &str, version: &str, module: &str) -> String {
    if module == "ROOT" {
        format!("{component}/{version}/")
    } else {
        format!("{component}/{version}/{module}/")
    }
}

/// Media type by file extension (including the dot).
pub fn media_type(extname: &str) -> &'static str {
    match extname.to_ascii_lowercase().as_str() {
        ".adoc" => "text/asciidoc",
        ".html" => "text/html",
        ".css" => "text/css",
        ".js" => "application/javascript",
        ".json" => "application/json",
        ".xml" => "application/xml",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".svg" => "image/svg+xml",
        ".webp" => "image/webp",
        ".ico" => "image/x-icon",
        ".woff" => "font/woff",
        ".woff2" => "font/woff2",
        ".pdf" => "application/pdf",
        ".txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Content Catalog
// ============================================================================

/// All content items of a build.
#[derive(Debug, Default)]
pub struct ContentCatalog {
    items: Vec<ContentItem>,
}

impl ContentCatalog {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// Every item in the catalog.
    pub fn files(&self) -> &[ContentItem] {
        &self.items
    }

    /// AsciiDoc pages with an output location.
    pub fn pages(&self) -> impl Iterator<Item = &ContentItem> {
        self.items
            .iter()
            .filter(|item| item.markup && item.out.is_some())
    }

    /// Distinct `(component, version)` pairs in catalog order.
    pub fn component_versions(&self) -> Vec<(&str, &str)> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for item in &self.items {
            let key = (item.src.component.as_str(), item.src.version.as_str());
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl FileCatalog for ContentCatalog {
    /// Images and attachments; pages are published once composed.
    fn publish_files(&self) -> Vec<PublishFile<'_>> {
        self.items
            .iter()
            .filter(|item| !item.markup)
            .filter_map(|item| {
                item.out.as_ref().map(|out| PublishFile {
                    path: &out.path,
                    media_type: &item.media_type,
                    contents: &item.contents,
                })
            })
            .collect()
    }
}
