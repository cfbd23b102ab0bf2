//! Minification of published HTML and XML.
//!
//! The media type of a file picks the minifier; anything else passes
//! through untouched.

use crate::config::SiteConfig;
use std::borrow::Cow;

/// Minify `contents` according to `media_type` when `[build] minify` is on.
///
/// Returns `Cow::Borrowed` when nothing was done.
pub fn minify<'a>(media_type: &str, contents: &'a [u8], config: &SiteConfig) -> Cow<'a, [u8]> {
    if !config.build.minify {
        return Cow::Borrowed(contents);
    }

    match media_type {
        "text/html" => Cow::Owned(minify_html_inner(contents)),
        "application/xml" => minify_xml_inner(contents),
        _ => Cow::Borrowed(contents),
    }
}

/// Minify HTML content using `minify_html` crate.
fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}

/// Drop indentation and blank lines; non UTF-8 input is left alone.
fn minify_xml_inner(xml: &[u8]) -> Cow<'_, [u8]> {
    let Ok(text) = std::str::from_utf8(xml) else {
        return Cow::Borrowed(xml);
    };
    let minified: String = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    Cow::Owned(minified.into_bytes())
}
