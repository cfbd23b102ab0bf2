//! `[build]` section configuration.
//!
//! Contains build settings: content sources, UI directory, output, AsciiDoc
//! converter and redirects.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

// ============================================================================
// Enums
// ============================================================================

/// How page aliases are turned into redirects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectFacility {
    /// Emit a static HTML page with a meta refresh for each alias (default).
    #[default]
    Static,
    /// Emit no redirect files.
    Disabled,
}

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in yuzu.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// output = "public"
/// ui = "ui"
///
/// [[build.sources]]
/// path = "docs"
/// component = "blog"
/// version = "1.0"
///
/// [build.asciidoc]
/// command = ["asciidoctor"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// UI directory (`layouts/`, `partials/` and static assets).
    #[serde(default = "defaults::build::ui")]
    #[educe(Default = defaults::build::ui())]
    pub ui: PathBuf,

    /// Basename of the landing document, never listed as an article.
    #[serde(default = "defaults::build::landing_page")]
    #[educe(Default = defaults::build::landing_page())]
    pub landing_page: String,

    /// Minify HTML and XML output.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear output directory before publishing.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Content sources, each one component version.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// AsciiDoc converter settings.
    #[serde(default)]
    pub asciidoc: AsciidocConfig,

    /// Redirect settings.
    #[serde(default)]
    pub redirects: RedirectConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[[build.sources]]` entry - one content source directory.
///
/// The directory follows the `modules/<module>/<family>/` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Source directory (relative to project root).
    pub path: PathBuf,
    /// Component name, first segment of output paths.
    pub component: String,
    /// Component version, second segment of output paths.
    pub version: String,
}

/// `[build.asciidoc]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AsciidocConfig {
    /// Converter command and arguments
    #[serde(default = "defaults::build::asciidoc::command")]
    #[educe(Default = defaults::build::asciidoc::command())]
    pub command: Vec<String>,

    /// Document attributes passed to every conversion
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// `[build.redirects]` section
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RedirectConfig {
    #[serde(default = "defaults::build::redirects::facility")]
    #[educe(Default = defaults::build::redirects::facility())]
    pub facility: RedirectFacility,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.ui, PathBuf::from("ui"));
        assert_eq!(config.build.landing_page, "index.adoc");
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert!(config.build.sources.is_empty());
        assert_eq!(config.build.asciidoc.command, vec!["asciidoctor"]);
        assert_eq!(config.build.redirects.facility, RedirectFacility::Static);
    }

    #[test]
    fn test_sources_array() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"

            [[build.sources]]
            path = "docs"
            component = "blog"
            version = "1.0"

            [[build.sources]]
            path = "talks"
            component = "talks"
            version = "2024"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.sources.len(), 2);
        assert_eq!(config.build.sources[0].component, "blog");
        assert_eq!(config.build.sources[1].path, PathBuf::from("talks"));
    }

    #[test]
    fn test_source_requires_version() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            [base]
            title = "Test"

            [[build.sources]]
            path = "docs"
            component = "blog"
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_asciidoc_attributes() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"

            [build.asciidoc]
            command = ["bundle", "exec", "asciidoctor"]

            [build.asciidoc.attributes]
            experimental = ""
            icons = "font"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.asciidoc.command.len(), 3);
        assert_eq!(
            config.build.asciidoc.attributes.get("icons").map(String::as_str),
            Some("font")
        );
    }

    #[test]
    fn test_redirect_facility_disabled() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"

            [build.redirects]
            facility = "disabled"
        "#,
        )
        .unwrap();

        assert_eq!(config.build.redirects.facility, RedirectFacility::Disabled);
    }

    #[test]
    fn test_unknown_redirect_facility_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            [base]
            title = "Test"

            [build.redirects]
            facility = "nginx"
        "#,
        );
        assert!(result.is_err());
    }
}
