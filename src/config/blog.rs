//! `[blog]` section configuration.
//!
//! Where the synthetic blog pages (tag pages and index) are placed.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[blog]` section in yuzu.toml.
///
/// Tag pages land in `<component>/<version>/<tag>.html`, the index in
/// `<component>/<version>/index.html`.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BlogConfig {
    #[serde(default = "defaults::blog::component")]
    #[educe(Default = defaults::blog::component())]
    pub component: String,

    #[serde(default = "defaults::blog::version")]
    #[educe(Default = defaults::blog::version())]
    pub version: String,

    #[serde(default = "defaults::blog::module")]
    #[educe(Default = defaults::blog::module())]
    pub module: String,

    /// Title prefix of the index and tag pages.
    #[serde(default = "defaults::blog::title")]
    #[educe(Default = defaults::blog::title())]
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_blog_config_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"
        "#,
        )
        .unwrap();

        assert_eq!(config.blog.component, "blog");
        assert_eq!(config.blog.version, "1.0");
        assert_eq!(config.blog.module, "ROOT");
        assert_eq!(config.blog.title, "Blog");
    }

    #[test]
    fn test_blog_config_custom() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"

            [blog]
            component = "news"
            version = "2"
            title = "News"
        "#,
        )
        .unwrap();

        assert_eq!(config.blog.component, "news");
        assert_eq!(config.blog.version, "2");
        assert_eq!(config.blog.module, "ROOT");
        assert_eq!(config.blog.title, "News");
    }
}
