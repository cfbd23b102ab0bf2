//! Errors raised while loading `yuzu.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    /// TOML syntax or schema error in an inline config.
    #[error("invalid yuzu config")]
    Toml(#[from] toml::de::Error),

    /// TOML syntax or schema error in a config file.
    #[error("invalid yuzu config in `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but cannot be used for a build.
    #[error("invalid yuzu config: {0}")]
    Validation(String),
}
