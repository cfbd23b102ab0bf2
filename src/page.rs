//! Page descriptors and the synthetic page builders.
//!
//! A [`PageDescriptor`] describes one output page: identity, contained
//! articles, attributes and publish location. Descriptors are built once by
//! the functions in this module and never mutated; composition turns them into
//! [`SiteFile`]s.
//!
//! # Synthetic Pages
//!
//! | Builder | Layout | Output |
//! |---------|--------|--------|
//! | [`build_404`] | `404` | `404.html` |
//! | [`build_tag_page`] | `tag` | `<component>/<version>/<tag>.html` |
//! | [`build_index_page`] | `index` | `<component>/<version>/index.html` |

use crate::{
    config::SiteConfig,
    content::{AttributeKey, Attributes, ContentItem},
    error::{BuildError, BuildResult},
    tags::tag_segment,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub const HTML_MEDIA_TYPE: &str = "text/html";

// ============================================================================
// Locations
// ============================================================================

/// Output location, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Out {
    /// `/`-separated, unencoded. Example: `blog/1.0/go.html`
    pub path: String,
}

/// Publish location of an output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pub {
    /// Site-absolute, percent-encoded. Example: `/blog/1.0/go.html`
    pub url: String,
    /// Relative path from the page's directory to the site root.
    /// Example: `../..`
    pub root_path: String,
    pub module_root_path: String,
}

/// Derive the publish location of an output path.
///
/// `url` encodes each segment of `path`; `root_path` climbs one `..` per
/// directory level (`.` at the site root).
pub fn locate(path: &str) -> (Out, Pub) {
    let url = path
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/");

    let depth = path.matches('/').count();
    let root_path = if depth == 0 {
        ".".to_owned()
    } else {
        vec![".."; depth].join("/")
    };

    (
        Out {
            path: path.to_owned(),
        },
        Pub {
            url: format!("/{url}"),
            root_path,
            module_root_path: ".".to_owned(),
        },
    )
}

// ============================================================================
// Page Descriptor
// ============================================================================

/// Source identity of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSource {
    pub component: Option<String>,
    pub version: Option<String>,
    pub module: Option<String>,
    pub stem: String,
}

/// One output page, ready for composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDescriptor<'a> {
    pub title: String,
    pub version: Option<String>,
    pub media_type: String,
    /// Articles listed by the page, in listing order.
    pub contents: Vec<&'a ContentItem>,
    pub attributes: Attributes,
    pub src: PageSource,
    pub out: Out,
    #[serde(rename = "pub")]
    pub publish: Pub,
    /// Converted document body; `None` for synthetic pages.
    pub body: Option<String>,
}

impl<'a> PageDescriptor<'a> {
    /// Descriptor for a converted document. `None` when the item is not published.
    pub fn from_document(item: &ContentItem, body: String) -> Option<Self> {
        let out = item.out.clone()?;
        let publish = item.publish.clone()?;

        Some(Self {
            title: item.display_title().to_owned(),
            version: Some(item.src.version.clone()),
            media_type: HTML_MEDIA_TYPE.to_owned(),
            contents: Vec::new(),
            attributes: item.attributes.clone(),
            src: PageSource {
                component: Some(item.src.component.clone()),
                version: Some(item.src.version.clone()),
                module: Some(item.src.module.clone()),
                stem: item.src.stem.clone(),
            },
            out,
            publish,
            body: Some(body),
        })
    }

    pub fn layout(&self) -> &str {
        self.attributes.layout()
    }
}

/// A composed or generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFile {
    pub out_path: String,
    pub url: String,
    pub media_type: String,
    pub contents: Vec<u8>,
}

impl SiteFile {
    /// File at `path` with its URL derived by [`locate`].
    pub fn new(path: &str, media_type: &str, contents: Vec<u8>) -> Self {
        let (out, publish) = locate(path);
        Self {
            out_path: out.path,
            url: publish.url,
            media_type: media_type.to_owned(),
            contents,
        }
    }
}

// ============================================================================
// Output Paths
// ============================================================================

/// Output paths produced so far, with a description of who produced each.
#[derive(Debug, Default)]
pub struct OutputPaths {
    owners: HashMap<String, String>,
}

impl OutputPaths {
    /// Record a path; a later owner replaces an earlier one.
    pub fn record(&mut self, path: impl Into<String>, owner: impl Into<String>) {
        self.owners.insert(path.into(), owner.into());
    }

    pub fn owner(&self, path: &str) -> Option<&str> {
        self.owners.get(path).map(String::as_str)
    }
}

// ============================================================================
// Synthetic Page Builders
// ============================================================================

/// Placement and titles of the synthetic blog pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogSettings {
    pub component: String,
    pub version: String,
    pub module: String,
    /// Blog title prefix, e.g. `Blog`.
    pub title: String,
    /// Site title suffix, omitted when blank.
    pub site_title: Option<String>,
}

impl BlogSettings {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            component: config.blog.component.clone(),
            version: config.blog.version.clone(),
            module: config.blog.module.clone(),
            title: config.blog.title.clone(),
            site_title: Some(config.base.title.trim())
                .filter(|title| !title.is_empty())
                .map(str::to_owned),
        }
    }

    /// Output directory of the synthetic blog pages: `<component>/<version>/`.
    pub fn base_path(&self) -> String {
        format!("{}/{}/", self.component, self.version)
    }

    fn page_title(&self, title: String) -> String {
        match &self.site_title {
            Some(site) => format!("{title} - {site}"),
            None => title,
        }
    }

    fn page_source(&self, stem: &str) -> PageSource {
        PageSource {
            component: Some(self.component.clone()),
            version: Some(self.version.clone()),
            module: Some(self.module.clone()),
            stem: stem.to_owned(),
        }
    }
}

/// The 404 page, published at the site root.
///
/// It is served at whatever URL was missing, so `root_path` is empty and
/// `root_path + url` links stay site-absolute.
pub fn build_404<'a>() -> PageDescriptor<'a> {
    let (out, mut publish) = locate("404.html");
    publish.root_path = String::new();

    PageDescriptor {
        title: "Page Not Found".to_owned(),
        version: None,
        media_type: HTML_MEDIA_TYPE.to_owned(),
        contents: Vec::new(),
        attributes: Attributes::new().with(AttributeKey::PageLayout, "404"),
        src: PageSource {
            component: None,
            version: None,
            module: None,
            stem: "404".to_owned(),
        },
        out,
        publish,
        body: None,
    }
}

/// The listing page of one tag.
///
/// Fails with [`BuildError::InvalidTag`] when the tag is empty or its output
/// path is already in `taken`.
pub fn build_tag_page<'a>(
    tag: &str,
    articles: Vec<&'a ContentItem>,
    settings: &BlogSettings,
    taken: &OutputPaths,
) -> BuildResult<PageDescriptor<'a>> {
    let tag = tag.trim();
    let segment = tag_segment(tag)?;
    let path = format!("{}{segment}", settings.base_path());

    if let Some(owner) = taken.owner(&path) {
        return Err(BuildError::InvalidTag(format!(
            "`{tag}` maps to `{path}`, already produced by {owner}"
        )));
    }

    let (out, publish) = locate(&path);
    let stem = segment.strip_suffix(".html").unwrap_or(&segment);

    Ok(PageDescriptor {
        title: settings.page_title(format!("{} / {tag}", settings.title)),
        version: Some(settings.version.clone()),
        media_type: HTML_MEDIA_TYPE.to_owned(),
        contents: articles,
        attributes: Attributes::new()
            .with(AttributeKey::PageLayout, "tag")
            .with(AttributeKey::PageTag, tag),
        src: settings.page_source(stem),
        out,
        publish,
        body: None,
    })
}

/// The blog index listing every article and every tag.
pub fn build_index_page<'a>(
    tags: &BTreeSet<String>,
    articles: Vec<&'a ContentItem>,
    settings: &BlogSettings,
) -> PageDescriptor<'a> {
    let (out, publish) = locate(&format!("{}index.html", settings.base_path()));

    PageDescriptor {
        title: settings.page_title(settings.title.clone()),
        version: Some(settings.version.clone()),
        media_type: HTML_MEDIA_TYPE.to_owned(),
        contents: articles,
        attributes: Attributes::new()
            .with(AttributeKey::PageLayout, "index")
            .with(AttributeKey::PageTags, tags.iter().cloned().collect::<Vec<_>>()),
        src: settings.page_source("index"),
        out,
        publish,
        body: None,
    }
}

// ============================================================================
// Tests
// ============================================================================
