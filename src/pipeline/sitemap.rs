//! Sitemap generation.
//!
//! Produces `sitemap.xml` listing every composed HTML page for search engine
//! indexing. Without `[base] url` no absolute location can be built and no
//! sitemap is produced.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/blog/1.0/hello.html</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use super::SiteMapper;
use crate::{config::SiteConfig, error::BuildResult, log, page::{HTML_MEDIA_TYPE, SiteFile}};
use chrono::{NaiveDate, Utc};

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Output path of the sitemap
const SITEMAP_PATH: &str = "sitemap.xml";

// ============================================================================
// Mapper
// ============================================================================

/// Maps composed pages to `sitemap.xml`.
pub struct SitemapMapper;

impl SiteMapper for SitemapMapper {
    fn map(&self, config: &SiteConfig, pages: &[SiteFile]) -> BuildResult<Vec<SiteFile>> {
        let Some(site_url) = &config.base.url else {
            return Ok(Vec::new());
        };

        let sitemap = Sitemap::from_pages(site_url, pages, Utc::now().date_naive());
        log!("sitemap"; "{} urls", sitemap.urls.len());

        Ok(vec![SiteFile::new(
            SITEMAP_PATH,
            "application/xml",
            sitemap.into_xml().into_bytes(),
        )])
    }
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD format)
    lastmod: String,
}

impl Sitemap {
    /// Build sitemap from the HTML pages, sorted by URL.
    fn from_pages(site_url: &str, pages: &[SiteFile], lastmod: NaiveDate) -> Self {
        let site_url = site_url.trim_end_matches('/');
        let lastmod = lastmod.format("%Y-%m-%d").to_string();

        let mut urls: Vec<UrlEntry> = pages
            .iter()
            .filter(|page| page.media_type == HTML_MEDIA_TYPE)
            .map(|page| UrlEntry {
                loc: format!("{site_url}{}", page.url),
                lastmod: lastmod.clone(),
            })
            .collect();
        urls.sort_by(|a, b| a.loc.cmp(&b.loc));
        urls.dedup_by(|a, b| a.loc == b.loc);

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
