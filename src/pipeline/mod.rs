//! Pipeline stages consumed by the site assembly driver.
//!
//! Each stage is a trait so the driver only depends on its contract. The
//! defaults wired by [`Pipeline::from_config`] are deliberately thin.
//!
//! # Stages
//!
//! ```text
//! ContentAggregator ──┐
//!                     ├── join ── convert_documents(MarkupConverter)
//! UiLoader ───────────┘                 │
//!                                       ▼
//!                              NavigationBuilder
//!                                       │
//!                                       ▼
//!                    ComposerFactory → PageComposer (every page)
//!                                       │
//!                                       ▼
//!                        SiteMapper + RedirectProducer
//!                                       │
//!                                       ▼
//!                                   Publisher
//! ```

mod aggregate;
mod compose;
mod convert;
mod navigation;
mod publish;
mod redirects;
mod sitemap;
mod ui;

pub use aggregate::FsAggregator;
pub use compose::TeraComposerFactory;
pub use convert::{CommandConverter, MarkupConfig, convert_documents, resolve_markup_config};
pub use navigation::{FlatNavigation, NavigationCatalog};
pub use publish::FsPublisher;
pub use redirects::StaticRedirects;
pub use sitemap::SitemapMapper;
pub use ui::{FsUiLoader, UiCatalog};

use crate::{
    config::SiteConfig,
    content::{ContentCatalog, ContentItem},
    error::BuildResult,
    page::{PageDescriptor, SiteFile},
};

// ============================================================================
// Stage Contracts
// ============================================================================

/// Collects and classifies the content of a build.
pub trait ContentAggregator: Send + Sync {
    fn aggregate(&self, config: &SiteConfig) -> BuildResult<ContentCatalog>;
}

/// Loads the UI: layouts and static assets.
pub trait UiLoader: Send + Sync {
    fn load(&self, config: &SiteConfig) -> BuildResult<UiCatalog>;
}

/// Converts one AsciiDoc document to an HTML body.
pub trait MarkupConverter: Send + Sync {
    fn convert(&self, item: &ContentItem, markup: &MarkupConfig) -> BuildResult<String>;
}

/// Builds the navigation shared by every composed page.
pub trait NavigationBuilder: Send + Sync {
    fn build(&self, catalog: &ContentCatalog, markup: &MarkupConfig) -> BuildResult<NavigationCatalog>;
}

/// Creates the page composer for one build.
pub trait ComposerFactory: Send + Sync {
    fn create<'a>(
        &self,
        config: &'a SiteConfig,
        catalog: &'a ContentCatalog,
        ui: &'a UiCatalog,
    ) -> BuildResult<Box<dyn PageComposer + 'a>>;
}

/// Renders a page descriptor into its output file.
pub trait PageComposer {
    fn compose(
        &self,
        page: &PageDescriptor<'_>,
        catalog: Option<&ContentCatalog>,
        navigation: Option<&NavigationCatalog>,
    ) -> BuildResult<SiteFile>;
}

/// Produces files describing the site, e.g. a sitemap.
pub trait SiteMapper: Send + Sync {
    fn map(&self, config: &SiteConfig, pages: &[SiteFile]) -> BuildResult<Vec<SiteFile>>;
}

/// Produces redirect files for moved pages.
pub trait RedirectProducer: Send + Sync {
    fn produce(&self, config: &SiteConfig, catalog: &ContentCatalog) -> BuildResult<Vec<SiteFile>>;
}

/// Writes the final file set.
pub trait Publisher: Send + Sync {
    fn publish(&self, config: &SiteConfig, catalogs: &[&dyn FileCatalog]) -> BuildResult<PublishReport>;
}

// ============================================================================
// Publishing Types
// ============================================================================

/// A catalog whose files end up in the output.
pub trait FileCatalog {
    fn publish_files(&self) -> Vec<PublishFile<'_>>;
}

/// Borrowed view of one file to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishFile<'a> {
    /// `/`-separated path relative to the output directory.
    pub path: &'a str,
    pub media_type: &'a str,
    pub contents: &'a [u8],
}

/// Composed pages and generated files of a build.
#[derive(Debug, Default)]
pub struct SiteCatalog {
    files: Vec<SiteFile>,
}

impl SiteCatalog {
    pub fn new(files: Vec<SiteFile>) -> Self {
        Self { files }
    }
}

impl FileCatalog for SiteCatalog {
    fn publish_files(&self) -> Vec<PublishFile<'_>> {
        self.files
            .iter()
            .map(|file| PublishFile {
                path: &file.out_path,
                media_type: &file.media_type,
                contents: &file.contents,
            })
            .collect()
    }
}

/// What a publisher wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Published paths, sorted and deduplicated.
    pub files: Vec<String>,
}

// ============================================================================
// Pipeline
// ============================================================================

/// The set of stages a build runs.
pub struct Pipeline {
    pub aggregator: Box<dyn ContentAggregator>,
    pub ui_loader: Box<dyn UiLoader>,
    pub converter: Box<dyn MarkupConverter>,
    pub navigation: Box<dyn NavigationBuilder>,
    pub composer: Box<dyn ComposerFactory>,
    pub site_mapper: Box<dyn SiteMapper>,
    pub redirects: Box<dyn RedirectProducer>,
    pub publisher: Box<dyn Publisher>,
}

impl Pipeline {
    /// Filesystem-backed stages configured from `yuzu.toml`.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            aggregator: Box::new(FsAggregator),
            ui_loader: Box::new(FsUiLoader),
            converter: Box::new(
                CommandConverter::new(config.build.asciidoc.command.clone()).in_dir(config.get_root()),
            ),
            navigation: Box::new(FlatNavigation),
            composer: Box::new(TeraComposerFactory),
            site_mapper: Box::new(SitemapMapper),
            redirects: Box::new(StaticRedirects),
            publisher: Box::new(FsPublisher),
        }
    }
}
