//! Site configuration management for `yuzu.toml`.
//!
//! # Sections
//!
//! | Section            | Purpose                                     |
//! |--------------------|---------------------------------------------|
//! | `[base]`           | Site metadata (title, url)                  |
//! | `[build]`          | Output, UI, landing page, minify, clean     |
//! | `[[build.sources]]`| Content sources (path, component, version)  |
//! | `[build.asciidoc]` | Converter command and document attributes   |
//! | `[build.redirects]`| Redirect facility for page aliases          |
//! | `[blog]`           | Location and title of the synthetic pages   |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Yuzu tech"
//! url = "https://yuzutech.fr"
//!
//! [build]
//! output = "public"
//!
//! [[build.sources]]
//! path = "docs"
//! component = "blog"
//! version = "1.0"
//!
//! [blog]
//! title = "Blog"
//! ```

mod base;
mod blog;
pub mod build;
pub mod defaults;
mod error;

pub use build::RedirectFacility;
pub use error::ConfigError;

use base::BaseConfig;
use blog::BlogConfig;
use build::BuildConfig;

use crate::cli::{Cli, Commands};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing yuzu.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Synthetic blog pages
    #[serde(default)]
    pub blog: BlogConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());

        match &cli.command {
            Commands::Build { build_args } => {
                Self::update_option(&mut self.build.output, build_args.output.as_ref());
                Self::update_option(&mut self.build.ui, build_args.ui.as_ref());
                Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
                if build_args.clean {
                    self.build.clean = true;
                }
                if let Some(url) = &build_args.site_url {
                    self.base.url = Some(url.clone());
                }
            }
        }

        self.update_path_with_root(&root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_name: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_name));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.ui = Self::normalize_path(&root.join(&self.build.ui));

        for source in &mut self.build.sources {
            source.path = Self::normalize_path(&root.join(&source.path));
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before a build
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            return Err(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into(),
            ));
        }

        if self.build.sources.is_empty() {
            return Err(ConfigError::Validation(
                "[build.sources] must list at least one content source".into(),
            ));
        }

        for source in &self.build.sources {
            if !is_path_segment(&source.component) || !is_path_segment(&source.version) {
                return Err(ConfigError::Validation(format!(
                    "[build.sources] `{}` needs a component and a version without `/`",
                    source.path.display()
                )));
            }
            if !source.path.is_dir() {
                return Err(ConfigError::Validation(format!(
                    "[build.sources] `{}` is not a directory",
                    source.path.display()
                )));
            }
        }

        if !is_path_segment(&self.blog.component) || !is_path_segment(&self.blog.version) {
            return Err(ConfigError::Validation(
                "[blog.component] and [blog.version] must be non-empty and contain no `/`".into(),
            ));
        }

        Self::check_command_installed("[build.asciidoc.command]", &self.build.asciidoc.command)
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<(), ConfigError> {
        let Some(cmd) = command.first() else {
            return Err(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        };

        which::which(cmd).map_err(|_| {
            ConfigError::Validation(format!("`{cmd}` not found. Please install it first."))
        })?;

        Ok(())
    }
}

/// A value usable as a single output path segment.
fn is_path_segment(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains(['/', '\\'])
}

// ============================================================================
// Tests
// ============================================================================
