//! Build error taxonomy.
//!
//! Every failure is fatal: errors propagate to `generate_site` and abort the
//! build before anything is published.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised by the site pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("content error in `{path}`: {message}")]
    Content { path: PathBuf, message: String },

    #[error("ui error in `{path}`: {message}")]
    Ui { path: PathBuf, message: String },

    #[error("failed to convert `{path}`: {message}")]
    Conversion { path: String, message: String },

    #[error("invalid tag: {0}")]
    InvalidTag(String),

    #[error("failed to compose `{path}`: {message}")]
    Compose { path: String, message: String },

    #[error("failed to publish `{path}`")]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn content(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Content {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn ui(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Ui {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_display() {
        let err = BuildError::content("docs/modules", "missing modules directory");
        let display = format!("{err}");
        assert!(display.contains("docs/modules"));
        assert!(display.contains("missing modules directory"));
    }

    #[test]
    fn test_invalid_tag_display() {
        let err = BuildError::InvalidTag("empty tag".into());
        assert_eq!(format!("{err}"), "invalid tag: empty tag");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: BuildError = ConfigError::Validation("bad url".into()).into();
        assert_eq!(format!("{err}"), "invalid yuzu config: bad url");
    }
}
