//! Tag extraction and tag URL mapping.
//!
//! Tags come from the comma-separated `page-tags` attribute. Each distinct tag
//! gets one listing page whose file name is derived by [`tag_segment`].

use crate::{
    content::ContentItem,
    error::{BuildError, BuildResult},
    utils::slug::sanitize_segment,
};
use std::collections::BTreeSet;

/// Distinct tags declared by the given items.
///
/// Entries are trimmed and empty entries ignored; matching is case-sensitive,
/// so `go` and `Go` are two tags. Tag pages are built from the tags of the
/// articles, so every tag has at least one article.
pub fn extract_tags<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> BTreeSet<String> {
    items
        .into_iter()
        .flat_map(|item| item.attributes.tags())
        .map(str::to_owned)
        .collect()
}

/// Output file name of a tag page.
///
/// | Tag | Segment |
/// |-----|---------|
/// | `go` | `go.html` |
/// | ` go ` | `go.html` |
/// | `Go` | `Go.html` |
/// | `ci/cd` | `cicd.html` |
/// | `machine learning` | `machine-learning.html` |
pub fn tag_segment(tag: &str) -> BuildResult<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(BuildError::InvalidTag("empty tag".into()));
    }

    let segment = sanitize_segment(tag);
    if segment.is_empty() {
        return Err(BuildError::InvalidTag(format!(
            "`{tag}` has no characters usable in a URL"
        )));
    }

    Ok(format!("{segment}.html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AttributeKey, Attributes, ContentCatalog, Family, Source};

    fn tagged(stem: &str, tags: Option<&str>) -> ContentItem {
        let item = ContentItem::new(
            Source::new("blog", "1.0", "ROOT", Family::Page, &format!("{stem}.adoc")),
            Vec::new(),
        );
        match tags {
            Some(tags) => item.with_attributes(Attributes::new().with(AttributeKey::PageTags, tags)),
            None => item,
        }
    }

    #[test]
    fn test_extract_tags_collapses_duplicates() {
        let catalog = ContentCatalog::new(vec![
            tagged("a", Some("infra, go")),
            tagged("b", Some("go")),
            tagged("c", None),
        ]);

        let tags = extract_tags(catalog.files());
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["go", "infra"]);
    }

    #[test]
    fn test_extract_tags_empty_catalog() {
        assert!(extract_tags(ContentCatalog::default().files()).is_empty());
    }

    #[test]
    fn test_extract_tags_trims_and_keeps_case() {
        let catalog = ContentCatalog::new(vec![tagged("a", Some("go ,Go, go,,"))]);
        let tags = extract_tags(catalog.files());
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["Go", "go"]);
    }

    #[test]
    fn test_extract_tags_does_not_mutate() {
        let catalog = ContentCatalog::new(vec![tagged("a", Some("go"))]);
        let before = catalog.files().to_vec();
        extract_tags(catalog.files());
        assert_eq!(catalog.files(), before.as_slice());
    }

    #[test]
    fn test_extract_tags_only_from_given_items() {
        let landing = tagged("index", Some("meta"));
        let article = tagged("a", Some("go"));

        let tags = extract_tags([&article]);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["go"]);
        let catalog = ContentCatalog::new(vec![landing, article]);
        assert!(extract_tags(catalog.files()).contains("meta"));
    }

    #[test]
    fn test_tag_segment_deterministic() {
        assert_eq!(tag_segment("go").unwrap(), "go.html");
        assert_eq!(tag_segment("go").unwrap(), tag_segment("go").unwrap());
    }

    #[test]
    fn test_tag_segment_trims() {
        assert_eq!(tag_segment("go ").unwrap(), tag_segment("go").unwrap());
    }

    #[test]
    fn test_tag_segment_case_sensitive() {
        assert_ne!(tag_segment("Go").unwrap(), tag_segment("go").unwrap());
    }

    #[test]
    fn test_tag_segment_sanitizes_separators() {
        assert_eq!(tag_segment("ci/cd").unwrap(), "cicd.html");
        assert_eq!(tag_segment("a\\b").unwrap(), "ab.html");
        assert_eq!(tag_segment("machine learning").unwrap(), "machine-learning.html");
    }

    #[test]
    fn test_tag_segment_rejects_empty() {
        assert!(matches!(tag_segment(""), Err(BuildError::InvalidTag(_))));
        assert!(matches!(tag_segment("   "), Err(BuildError::InvalidTag(_))));
        assert!(matches!(tag_segment("//"), Err(BuildError::InvalidTag(_))));
    }
}
