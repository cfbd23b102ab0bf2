//! Page composition with Tera layouts.
//!
//! A page is rendered with the template `layouts/<page-layout>.html`. The UI
//! may provide any layout; built-in ones cover the layouts the generator
//! relies on.
//!
//! # Template Context
//!
//! | Variable | Content |
//! |----------|---------|
//! | `page` | the page descriptor (`title`, `body`, `contents`, `attributes`, `pub`, ...) |
//! | `site` | `title` and `url` from `[base]` |
//! | `navigation` | menu of the page's component version (absent for the 404 page) |
//! | `components` | component versions of the catalog (absent for the 404 page) |
//!
//! The `tag_url` filter maps a tag to the site-absolute URL of its page.

use super::{ComposerFactory, NavigationCatalog, PageComposer, UiCatalog};
use crate::{
    config::SiteConfig,
    content::ContentCatalog,
    error::{BuildError, BuildResult},
    page::{BlogSettings, PageDescriptor, SiteFile, locate},
    tags::tag_segment,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tera::{Context, Tera, Value};

// ============================================================================
// Built-in Layouts
// ============================================================================

const BASE_LAYOUT: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page.title }}</title>
</head>
<body>
{% if navigation is defined %}
  <nav>
    <ul>
    {% for entry in navigation %}
      <li><a href="{{ page.pub.root_path | safe }}{{ entry.url | safe }}">{{ entry.title }}</a></li>
    {% endfor %}
    </ul>
  </nav>
{% endif %}
  <main>
{% block main %}{% endblock main %}
  </main>
</body>
</html>
"#;

const DEFAULT_LAYOUT: &str = r#"{% extends "layouts/base.html" %}
{% block main %}
<article>
{% if page.body %}{{ page.body | safe }}{% endif %}
</article>
{% endblock main %}
"#;

const ARTICLE_LIST: &str = r#"<ul class="articles">
{% for article in page.contents %}
  <li>
    <a href="{{ page.pub.root_path | safe }}{{ article.pub.url | safe }}">{% if article.title %}{{ article.title }}{% else %}{{ article.src.stem }}{% endif %}</a>
  </li>
{% endfor %}
</ul>
"#;

const TAG_LAYOUT: &str = r#"{% extends "layouts/base.html" %}
{% block main %}
<h1>{{ page.attributes["page-tag"] }}</h1>
{% include "partials/article-list.html" %}
{% endblock main %}
"#;

const INDEX_LAYOUT: &str = r#"{% extends "layouts/base.html" %}
{% block main %}
<h1>{{ page.title }}</h1>
<ul class="tags">
{% for tag in page.attributes["page-tags"] %}
  <li><a href="{{ page.pub.root_path | safe }}{{ tag | tag_url | safe }}">{{ tag }}</a></li>
{% endfor %}
</ul>
{% include "partials/article-list.html" %}
{% endblock main %}
"#;

const NOT_FOUND_LAYOUT: &str = r#"{% extends "layouts/base.html" %}
{% block main %}
<h1>{{ page.title }}</h1>
{% if site.url %}<p><a href="{{ site.url }}">{{ site.title }}</a></p>{% endif %}
{% endblock main %}
"#;

const BUILTIN_TEMPLATES: [(&str, &str); 6] = [
    ("layouts/base.html", BASE_LAYOUT),
    ("layouts/default.html", DEFAULT_LAYOUT),
    ("layouts/tag.html", TAG_LAYOUT),
    ("layouts/index.html", INDEX_LAYOUT),
    ("layouts/404.html", NOT_FOUND_LAYOUT),
    ("partials/article-list.html", ARTICLE_LIST),
];

// ============================================================================
// Factory
// ============================================================================

/// Creates a [`TeraComposer`] from the UI templates and built-in layouts.
pub struct TeraComposerFactory;

impl ComposerFactory for TeraComposerFactory {
    fn create<'a>(
        &self,
        config: &'a SiteConfig,
        _catalog: &'a ContentCatalog,
        ui: &'a UiCatalog,
    ) -> BuildResult<Box<dyn PageComposer + 'a>> {
        let mut templates: BTreeMap<&str, &str> = BUILTIN_TEMPLATES.into_iter().collect();
        for (name, source) in &ui.templates {
            templates.insert(name.as_str(), source.as_str());
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|err| compose_error("layouts", err))?;
        tera.register_filter(
            "tag_url",
            tag_url_filter(BlogSettings::from_config(config).base_path()),
        );

        Ok(Box::new(TeraComposer {
            tera,
            site: SiteContext {
                title: &config.base.title,
                url: config.base.url.as_deref(),
            },
        }))
    }
}

/// `tag | tag_url` → `/<component>/<version>/<segment>`.
fn tag_url_filter(
    base_path: String,
) -> impl Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync {
    move |value: &Value, _: &HashMap<String, Value>| {
        let tag = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("tag_url expects a string"))?;
        let segment = tag_segment(tag).map_err(|err| tera::Error::msg(err.to_string()))?;
        let (_, publish) = locate(&format!("{base_path}{segment}"));
        Ok(Value::String(publish.url))
    }
}

fn compose_error(path: &str, err: tera::Error) -> BuildError {
    BuildError::Compose {
        path: path.to_owned(),
        message: format!("{:#}", anyhow::Error::from(err)),
    }
}

// ============================================================================
// Composer
// ============================================================================

#[derive(Debug, Serialize)]
struct SiteContext<'a> {
    title: &'a str,
    url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ComponentContext<'a> {
    name: &'a str,
    version: &'a str,
}

/// Renders pages with the layouts loaded by [`TeraComposerFactory`].
pub struct TeraComposer<'a> {
    tera: Tera,
    site: SiteContext<'a>,
}

impl PageComposer for TeraComposer<'_> {
    fn compose(
        &self,
        page: &PageDescriptor<'_>,
        catalog: Option<&ContentCatalog>,
        navigation: Option<&NavigationCatalog>,
    ) -> BuildResult<SiteFile> {
        let path = &page.out.path;
        let template = format!("layouts/{}.html", page.layout());
        if !self.tera.get_template_names().any(|name| name == template) {
            return Err(BuildError::Compose {
                path: path.clone(),
                message: format!("layout `{}` not found", page.layout()),
            });
        }

        let mut context = Context::new();
        context.insert("page", page);
        context.insert("site", &self.site);
        if let Some(catalog) = catalog {
            let components: Vec<_> = catalog
                .component_versions()
                .into_iter()
                .map(|(name, version)| ComponentContext { name, version })
                .collect();
            context.insert("components", &components);
        }
        if let Some(navigation) = navigation {
            let menu = match (&page.src.component, &page.src.version) {
                (Some(component), Some(version)) => navigation.get(component, version),
                _ => None,
            };
            context.insert("navigation", menu.unwrap_or(&[]));
        }

        let rendered = self
            .tera
            .render(&template, &context)
            .map_err(|err| compose_error(path, err))?;

        Ok(SiteFile::new(path, &page.media_type, rendered.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::{AttributeKey, Attributes, ContentItem, Family, Source},
        page::{OutputPaths, build_404, build_index_page, build_tag_page},
        pipeline::{FlatNavigation, MarkupConfig, NavigationBuilder},
    };
    use std::collections::BTreeSet;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Yuzu tech".into();
        config
    }

    fn article(stem: &str, title: Option<&str>, tags: &str) -> ContentItem {
        ContentItem::new(
            Source::new("blog", "1.0", "ROOT", Family::Page, &format!("{stem}.adoc")),
            Vec::new(),
        )
        .with_title(title.map(str::to_owned))
        .with_attributes(Attributes::new().with(AttributeKey::PageTags, tags))
    }

    fn render(ui: &UiCatalog, page: &PageDescriptor<'_>, catalog: &ContentCatalog) -> BuildResult<String> {
        let config = config();
        let composer = TeraComposerFactory.create(&config, catalog, ui)?;
        let navigation = FlatNavigation.build(catalog, &MarkupConfig::default())?;
        let file = composer.compose(page, Some(catalog), Some(&navigation))?;
        Ok(String::from_utf8(file.contents).unwrap())
    }

    #[test]
    fn test_compose_tag_page_lists_articles() {
        let catalog = ContentCatalog::new(vec![
            article("a", Some("Article <A>"), "go"),
            article("b", None, "go"),
        ]);
        let settings = BlogSettings::from_config(&config());
        let articles = catalog.files().iter().collect();
        let page = build_tag_page("go", articles, &settings, &OutputPaths::default()).unwrap();

        let html = render(&UiCatalog::default(), &page, &catalog).unwrap();
        assert!(html.contains("<title>Blog &#x2F; go - Yuzu tech</title>"));
        assert!(html.contains("<h1>go</h1>"));
        assert!(html.contains(r#"href="../../blog/1.0/a.html">Article &lt;A&gt;</a>"#));
        assert!(html.contains(r#"href="../../blog/1.0/b.html">b</a>"#));
    }

    #[test]
    fn test_compose_index_links_tags() {
        let catalog = ContentCatalog::new(vec![article("a", Some("A"), "machine learning")]);
        let settings = BlogSettings::from_config(&config());
        let tags = BTreeSet::from(["machine learning".to_string()]);
        let page = build_index_page(&tags, catalog.files().iter().collect(), &settings);

        let html = render(&UiCatalog::default(), &page, &catalog).unwrap();
        assert!(html.contains(r#"href="../../blog/1.0/machine-learning.html">machine learning</a>"#));
        assert!(html.contains(r#"href="../../blog/1.0/a.html">A</a>"#));
    }

    #[test]
    fn test_compose_document_body_unescaped() {
        let item = article("a", Some("A"), "");
        let catalog = ContentCatalog::new(vec![item.clone()]);
        let page = PageDescriptor::from_document(&item, "<p>Hello</p>".into()).unwrap();

        let html = render(&UiCatalog::default(), &page, &catalog).unwrap();
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains(r#"<li><a href="../../blog/1.0/a.html">A</a></li>"#));
    }

    #[test]
    fn test_compose_404_without_catalog() {
        let config = config();
        let catalog = ContentCatalog::default();
        let ui = UiCatalog::default();
        let composer = TeraComposerFactory.create(&config, &catalog, &ui).unwrap();

        let file = composer.compose(&build_404(), None, None).unwrap();
        let html = String::from_utf8(file.contents).unwrap();
        assert_eq!(file.out_path, "404.html");
        assert_eq!(file.media_type, "text/html");
        assert!(html.contains("<h1>Page Not Found</h1>"));
        assert!(!html.contains("<nav>"));
    }

    #[test]
    fn test_ui_layout_overrides_builtin() {
        let mut ui = UiCatalog::default();
        ui.templates.insert(
            "layouts/default.html".into(),
            "custom:{{ page.title }}:{{ site.title }}".into(),
        );
        let item = article("a", Some("A"), "");
        let catalog = ContentCatalog::new(vec![item.clone()]);
        let page = PageDescriptor::from_document(&item, String::new()).unwrap();

        let html = render(&ui, &page, &catalog).unwrap();
        assert_eq!(html, "custom:A:Yuzu tech");
    }

    #[test]
    fn test_missing_layout_is_compose_error() {
        let item = ContentItem::new(
            Source::new("blog", "1.0", "ROOT", Family::Page, "a.adoc"),
            Vec::new(),
        )
        .with_attributes(Attributes::new().with(AttributeKey::PageLayout, "post"));
        let catalog = ContentCatalog::new(vec![item.clone()]);
        let page = PageDescriptor::from_document(&item, String::new()).unwrap();

        let err = render(&UiCatalog::default(), &page, &catalog).unwrap_err();
        assert!(matches!(err, BuildError::Compose { .. }));
        assert!(err.to_string().contains("layout `post` not found"));
    }

    #[test]
    fn test_invalid_ui_template_is_compose_error() {
        let mut ui = UiCatalog::default();
        ui.templates
            .insert("layouts/default.html".into(), "{% if %}".into());
        let config = config();
        let catalog = ContentCatalog::default();

        let result = TeraComposerFactory.create(&config, &catalog, &ui);
        assert!(matches!(result, Err(BuildError::Compose { .. })));
    }

    #[test]
    fn test_tag_url_filter() {
        let filter = tag_url_filter("blog/1.0/".into());
        let url = filter(&Value::String("ci/cd".into()), &HashMap::new()).unwrap();
        assert_eq!(url, Value::String("/blog/1.0/cicd.html".into()));
        assert!(filter(&Value::String(" ".into()), &HashMap::new()).is_err());
        assert!(filter(&Value::Bool(true), &HashMap::new()).is_err());
    }
}
