//! Site assembly.
//!
//! # Architecture
//!
//! ```text
//! generate_site()
//!     │
//!     ├── rayon::join(aggregate, load UI)
//!     │
//!     ├── convert documents ──► navigation ──► compose pages
//!     │
//!     ├── sitemap + redirects (+ 404 when a site URL is set)
//!     │
//!     ├── blog index + one page per tag
//!     │
//!     └── publish(content catalog, UI catalog, site catalog)
//! ```
//!
//! Every stage completes before the next one starts and the first error
//! aborts the build, so nothing is published unless every page composed.

use crate::{
    articles::{all_articles, articles_with_tag},
    config::SiteConfig,
    error::BuildResult,
    log,
    page::{BlogSettings, OutputPaths, SiteFile, build_404, build_index_page, build_tag_page},
    pipeline::{
        FileCatalog, Pipeline, PublishReport, SiteCatalog, convert_documents,
        resolve_markup_config,
    },
    tags::extract_tags,
};

/// Run the pipeline and publish the site.
pub fn generate_site(config: &SiteConfig, pipeline: &Pipeline) -> BuildResult<PublishReport> {
    // ========================================================================
    // Aggregate content and load the UI
    // ========================================================================
    let (catalog, ui) = rayon::join(
        || pipeline.aggregator.aggregate(config),
        || pipeline.ui_loader.load(config),
    );
    let catalog = catalog?;
    let ui = ui?;
    log!("build"; "{} content files", catalog.len());

    // ========================================================================
    // Convert, navigate, compose
    // ========================================================================
    let markup = resolve_markup_config(config);
    let documents = convert_documents(&catalog, &markup, pipeline.converter.as_ref())?;
    let navigation = pipeline.navigation.build(&catalog, &markup)?;
    let composer = pipeline.composer.create(config, &catalog, &ui)?;

    let mut site_files = documents
        .iter()
        .map(|page| composer.compose(page, Some(&catalog), Some(&navigation)))
        .collect::<BuildResult<Vec<_>>>()?;
    log!("compose"; "{} pages", site_files.len());

    site_files.extend(pipeline.site_mapper.map(config, &site_files)?);
    site_files.extend(pipeline.redirects.produce(config, &catalog)?);
    if config.base.url.is_some() {
        site_files.push(composer.compose(&build_404(), None, None)?);
    }

    let mut taken = OutputPaths::default();
    for file in catalog.publish_files().iter().chain(&ui.publish_files()) {
        taken.record(file.path, "a content or UI file");
    }
    for file in &site_files {
        taken.record(&file.out_path, format!("`{}`", file.url));
    }

    // ========================================================================
    // Blog pages
    // ========================================================================
    let settings = BlogSettings::from_config(config);
    let articles = all_articles(&catalog, &config.build.landing_page);
    let tags = extract_tags(articles.iter().copied());

    let index = build_index_page(&tags, articles.clone(), &settings);
    taken.record(&index.out.path, "the blog index");

    for tag in &tags {
        let page = build_tag_page(tag, articles_with_tag(&articles, tag), &settings, &taken)?;
        taken.record(&page.out.path, format!("tag `{tag}`"));
        site_files.push(composer.compose(&page, Some(&catalog), Some(&navigation))?);
    }
    log!("tags"; "{} tag pages, {} articles", tags.len(), articles.len());

    let index_file = composer.compose(&index, Some(&catalog), Some(&navigation))?;
    replace_file(&mut site_files, index_file);

    // ========================================================================
    // Publish
    // ========================================================================
    let site_catalog = SiteCatalog::new(site_files);
    pipeline
        .publisher
        .publish(config, &[&catalog, &ui, &site_catalog])
}

/// Push `file`, dropping any earlier file at the same path.
fn replace_file(files: &mut Vec<SiteFile>, file: SiteFile) {
    files.retain(|existing| existing.out_path != file.out_path);
    files.push(file);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::{AttributeKey, Attributes, ContentCatalog, ContentItem, Family, Source},
        error::BuildError,
        page::PageDescriptor,
        pipeline::{
            ComposerFactory, ContentAggregator, FlatNavigation, MarkupConfig, MarkupConverter,
            NavigationCatalog, PageComposer, Publisher, SitemapMapper, StaticRedirects,
            UiCatalog, UiLoader,
        },
    };
    use std::{
        collections::BTreeMap,
        sync::{Arc, Mutex},
    };

    // ------------------------------------------------------------------------
    // In-memory stages
    // ------------------------------------------------------------------------

    struct StaticAggregator(Vec<ContentItem>);

    impl ContentAggregator for StaticAggregator {
        fn aggregate(&self, _: &SiteConfig) -> BuildResult<ContentCatalog> {
            Ok(ContentCatalog::new(self.0.clone()))
        }
    }

    struct FailingAggregator;

    impl ContentAggregator for FailingAggregator {
        fn aggregate(&self, _: &SiteConfig) -> BuildResult<ContentCatalog> {
            Err(BuildError::content("docs", "unreadable"))
        }
    }

    struct EmptyUi;

    impl UiLoader for EmptyUi {
        fn load(&self, _: &SiteConfig) -> BuildResult<UiCatalog> {
            Ok(UiCatalog::default())
        }
    }

    struct FailingUi;

    impl UiLoader for FailingUi {
        fn load(&self, _: &SiteConfig) -> BuildResult<UiCatalog> {
            Err(BuildError::ui("ui", "missing"))
        }
    }

    struct EchoConverter;

    impl MarkupConverter for EchoConverter {
        fn convert(&self, item: &ContentItem, _: &MarkupConfig) -> BuildResult<String> {
            Ok(String::from_utf8_lossy(&item.contents).into_owned())
        }
    }

    /// Renders `layout|title|article stems|catalog?|navigation?`.
    struct RecordingComposerFactory;

    struct RecordingComposer;

    impl ComposerFactory for RecordingComposerFactory {
        fn create<'a>(
            &self,
            _: &'a SiteConfig,
            _: &'a ContentCatalog,
            _: &'a UiCatalog,
        ) -> BuildResult<Box<dyn PageComposer + 'a>> {
            Ok(Box::new(RecordingComposer))
        }
    }

    impl PageComposer for RecordingComposer {
        fn compose(
            &self,
            page: &PageDescriptor<'_>,
            catalog: Option<&ContentCatalog>,
            navigation: Option<&NavigationCatalog>,
        ) -> BuildResult<SiteFile> {
            let stems: Vec<_> = page.contents.iter().map(|item| item.src.stem.as_str()).collect();
            let rendered = format!(
                "{}|{}|{}|{}|{}",
                page.layout(),
                page.title,
                stems.join(","),
                catalog.is_some(),
                navigation.is_some()
            );
            Ok(SiteFile::new(&page.out.path, &page.media_type, rendered.into_bytes()))
        }
    }

    type Published = Arc<Mutex<BTreeMap<String, Vec<u8>>>>;

    struct MemoryPublisher(Published);

    impl Publisher for MemoryPublisher {
        fn publish(&self, _: &SiteConfig, catalogs: &[&dyn FileCatalog]) -> BuildResult<PublishReport> {
            let mut published = self.0.lock().unwrap();
            for catalog in catalogs {
                for file in catalog.publish_files() {
                    published.insert(file.path.to_owned(), file.contents.to_vec());
                }
            }
            Ok(PublishReport {
                files: published.keys().cloned().collect(),
            })
        }
    }

    fn pipeline(
        aggregator: Box<dyn ContentAggregator>,
        ui_loader: Box<dyn UiLoader>,
        published: &Published,
    ) -> Pipeline {
        Pipeline {
            aggregator,
            ui_loader,
            converter: Box::new(EchoConverter),
            navigation: Box::new(FlatNavigation),
            composer: Box::new(RecordingComposerFactory),
            site_mapper: Box::new(SitemapMapper),
            redirects: Box::new(StaticRedirects),
            publisher: Box::new(MemoryPublisher(Arc::clone(published))),
        }
    }

    fn page(relative: &str, tags: Option<&str>) -> ContentItem {
        let item = ContentItem::new(
            Source::new("blog", "1.0", "ROOT", Family::Page, relative),
            format!("<p>{relative}</p>").into_bytes(),
        );
        match tags {
            Some(tags) => item.with_attributes(Attributes::new().with(AttributeKey::PageTags, tags)),
            None => item,
        }
    }

    fn blog() -> Vec<ContentItem> {
        vec![
            page("index.adoc", None),
            page("a.adoc", Some("infra, go")),
            page("b.adoc", Some("go")),
            page("c.adoc", None),
            ContentItem::new(
                Source::new("blog", "1.0", "ROOT", Family::Image, "x.png"),
                b"png".to_vec(),
            ),
        ]
    }

    fn config(url: Option<&str>) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Yuzu tech".into();
        config.base.url = url.map(str::to_owned);
        config
    }

    fn contents(published: &Published, path: &str) -> String {
        let published = published.lock().unwrap();
        String::from_utf8(published[path].clone()).unwrap()
    }

    // ------------------------------------------------------------------------
    // Scenarios
    // ------------------------------------------------------------------------

    #[test]
    fn test_generate_site_tag_and_index_pages() {
        let published = Published::default();
        let pipeline = pipeline(Box::new(StaticAggregator(blog())), Box::new(EmptyUi), &published);

        let report = generate_site(&config(None), &pipeline).unwrap();

        assert_eq!(
            report.files,
            vec![
                "blog/1.0/_images/x.png",
                "blog/1.0/a.html",
                "blog/1.0/b.html",
                "blog/1.0/c.html",
                "blog/1.0/go.html",
                "blog/1.0/index.html",
                "blog/1.0/infra.html",
            ]
        );
        assert_eq!(
            contents(&published, "blog/1.0/go.html"),
            "tag|Blog / go - Yuzu tech|a,b|true|true"
        );
        assert_eq!(
            contents(&published, "blog/1.0/infra.html"),
            "tag|Blog / infra - Yuzu tech|a|true|true"
        );
        assert_eq!(
            contents(&published, "blog/1.0/index.html"),
            "index|Blog - Yuzu tech|a,b,c|true|true"
        );
        assert_eq!(contents(&published, "blog/1.0/a.html"), "default|a||true|true");
    }

    #[test]
    fn test_generate_site_404_and_sitemap_with_url() {
        let published = Published::default();
        let pipeline = pipeline(Box::new(StaticAggregator(blog())), Box::new(EmptyUi), &published);

        let report = generate_site(&config(Some("https://example.com")), &pipeline).unwrap();

        assert!(report.files.contains(&"404.html".to_string()));
        assert!(report.files.contains(&"sitemap.xml".to_string()));
        assert_eq!(contents(&published, "404.html"), "404|Page Not Found||false|false");

        // the sitemap lists composed pages only
        let sitemap = contents(&published, "sitemap.xml");
        assert!(sitemap.contains("<loc>https://example.com/blog/1.0/a.html</loc>"));
        assert!(!sitemap.contains("go.html"));
    }

    #[test]
    fn test_generate_site_without_tags() {
        let published = Published::default();
        let items = vec![page("index.adoc", None), page("a.adoc", None)];
        let pipeline = pipeline(Box::new(StaticAggregator(items)), Box::new(EmptyUi), &published);

        let report = generate_site(&config(None), &pipeline).unwrap();

        assert_eq!(report.files, vec!["blog/1.0/a.html", "blog/1.0/index.html"]);
        assert_eq!(
            contents(&published, "blog/1.0/index.html"),
            "index|Blog - Yuzu tech|a|true|true"
        );
    }

    #[test]
    fn test_generate_site_ignores_landing_page_tags() {
        let published = Published::default();
        let items = vec![page("index.adoc", Some("meta")), page("a.adoc", Some("go"))];
        let pipeline = pipeline(Box::new(StaticAggregator(items)), Box::new(EmptyUi), &published);

        let report = generate_site(&config(None), &pipeline).unwrap();

        assert!(!report.files.contains(&"blog/1.0/meta.html".to_string()));
        assert_eq!(
            contents(&published, "blog/1.0/go.html"),
            "tag|Blog / go - Yuzu tech|a|true|true"
        );
    }

    #[test]
    fn test_generate_site_tag_collides_with_article() {
        let published = Published::default();
        let items = vec![page("go.adoc", None), page("a.adoc", Some("go"))];
        let pipeline = pipeline(Box::new(StaticAggregator(items)), Box::new(EmptyUi), &published);

        let err = generate_site(&config(None), &pipeline).unwrap_err();

        assert!(matches!(err, BuildError::InvalidTag(_)));
        assert!(err.to_string().contains("blog/1.0/go.html"));
        assert!(published.lock().unwrap().is_empty());
    }

    #[test]
    fn test_generate_site_tag_collides_with_index() {
        let published = Published::default();
        let items = vec![page("a.adoc", Some("index"))];
        let pipeline = pipeline(Box::new(StaticAggregator(items)), Box::new(EmptyUi), &published);

        let err = generate_site(&config(None), &pipeline).unwrap_err();

        assert!(err.to_string().contains("the blog index"));
        assert!(published.lock().unwrap().is_empty());
    }

    #[test]
    fn test_generate_site_aborts_on_ui_failure() {
        let published = Published::default();
        let pipeline = pipeline(Box::new(StaticAggregator(blog())), Box::new(FailingUi), &published);

        let err = generate_site(&config(None), &pipeline).unwrap_err();

        assert!(matches!(err, BuildError::Ui { .. }));
        assert!(published.lock().unwrap().is_empty());
    }

    #[test]
    fn test_generate_site_content_error_wins() {
        let published = Published::default();
        let pipeline = pipeline(Box::new(FailingAggregator), Box::new(FailingUi), &published);

        let err = generate_site(&config(None), &pipeline).unwrap_err();

        assert!(matches!(err, BuildError::Content { .. }));
        assert!(published.lock().unwrap().is_empty());
    }

    #[test]
    fn test_replace_file() {
        let mut files = vec![
            SiteFile::new("a.html", "text/html", b"old".to_vec()),
            SiteFile::new("b.html", "text/html", Vec::new()),
        ];
        replace_file(&mut files, SiteFile::new("a.html", "text/html", b"new".to_vec()));

        assert_eq!(files.len(), 2);
        assert_eq!(files[1].out_path, "a.html");
        assert_eq!(files[1].contents, b"new");
    }
}
