//! `[base]` section configuration.
//!
//! Contains basic site information: title and public URL.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in yuzu.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Yuzu tech"
/// url = "https://yuzutech.fr"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, appended to synthetic page titles.
    pub title: String,

    /// Public site URL.
    /// When set, the sitemap and the 404 page are generated.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,
}
