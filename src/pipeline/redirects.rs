//! Redirects for moved pages.
//!
//! A page lists its former locations in `page-aliases`:
//!
//! ```asciidoc
//! = Kubernetes in production
//! :page-aliases: k8s.adoc, 2019/kube.adoc
//! ```
//!
//! Each alias resolves within the page's component version and module, and
//! the `static` facility publishes a small HTML page at the alias location
//! that forwards to the page.

use super::RedirectProducer;
use crate::{
    config::{RedirectFacility, SiteConfig},
    content::{ContentCatalog, ContentItem, module_prefix},
    error::BuildResult,
    log,
    page::{HTML_MEDIA_TYPE, Pub, SiteFile, locate},
};

/// Meta-refresh pages for `page-aliases`.
pub struct StaticRedirects;

impl RedirectProducer for StaticRedirects {
    fn produce(&self, config: &SiteConfig, catalog: &ContentCatalog) -> BuildResult<Vec<SiteFile>> {
        if config.build.redirects.facility == RedirectFacility::Disabled {
            return Ok(Vec::new());
        }

        let site_url = config.base.url.as_deref().map(|url| url.trim_end_matches('/'));
        let mut files = Vec::new();

        for page in catalog.pages() {
            let Some(target) = &page.publish else {
                continue;
            };
            for alias in page.attributes.aliases() {
                let Some(path) = alias_path(page, alias) else {
                    continue;
                };
                if page.out.as_ref().is_some_and(|out| out.path == path) {
                    continue;
                }

                let (_, from) = locate(&path);
                let html = redirect_page(&from, target, site_url);
                files.push(SiteFile::new(&path, HTML_MEDIA_TYPE, html.into_bytes()));
            }
        }

        log!("redirects"; "{} aliases", files.len());
        Ok(files)
    }
}

/// Output path of an alias of `page`.
///
/// | Alias | Page module | Path |
/// |-------|-------------|------|
/// | `old.adoc` | `ROOT` | `blog/1.0/old.html` |
/// | `2019/old.adoc` | `ops` | `blog/1.0/ops/2019/old.html` |
/// | `ops:old.adoc` | `ROOT` | `blog/1.0/ops/old.html` |
fn alias_path(page: &ContentItem, alias: &str) -> Option<String> {
    let (module, relative) = match alias.rsplit_once(':') {
        Some((module, relative)) => (module.trim(), relative.trim()),
        None => (page.src.module.as_str(), alias),
    };
    let module = if module.is_empty() { page.src.module.as_str() } else { module };

    if module.contains(['/', '\\']) || module == ".." {
        return None;
    }

    let relative = relative.trim_start_matches('/');
    let stem = relative.strip_suffix(".adoc").unwrap_or(relative);
    if stem.is_empty() || stem.split('/').any(|part| part.is_empty() || part == "..") {
        return None;
    }

    Some(format!(
        "{}{stem}.html",
        module_prefix(&page.src.component, &page.src.version, module)
    ))
}

/// HTML forwarding from `from` to `to`, relative so it works on any host.
fn redirect_page(from: &Pub, to: &Pub, site_url: Option<&str>) -> String {
    let target = format!("{}{}", from.root_path, to.url);
    let canonical = match site_url {
        Some(site_url) => format!("{site_url}{}", to.url),
        None => target.clone(),
    };

    format!(
        r#"<!DOCTYPE html>
<meta charset="utf-8">
<link rel="canonical" href="{canonical}">
<script>location="{target}"</script>
<meta http-equiv="refresh" content="0; url={target}">
<meta name="robots" content="noindex">
<title>Redirect Notice</title>
<h1>Redirect Notice</h1>
<p>The page you requested has been relocated to <a href="{target}">{canonical}</a>.</p>
"#
    )
}
