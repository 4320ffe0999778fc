//! `[base]` section configuration.
//!
//! Site-wide constants used by every head tag, the feed channel and robots.txt.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in sitemeta.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Learn Web Dev"
/// description = "From zero to shipping"
/// author = "Alice"
/// url = "https://learn.example.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, appended to page titles and used as the feed title.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Fallback description when a page has none and none can be derived.
    #[serde(default = "defaults::base::description")]
    #[educe(Default = defaults::base::description())]
    pub description: String,

    /// Author name for rss feed and meta tags.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Author email for rss `managingEditor`/`webMaster`.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: String,

    /// Public base URL. Resolved once at load time, see [`super::site_url`].
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language tag (single, fixed for the whole site).
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Default social image (absolute URL or site-relative path).
    #[serde(default = "defaults::base::image")]
    #[educe(Default = defaults::base::image())]
    pub image: String,

    /// Twitter handle for `twitter:site`, e.g. `@example`.
    #[serde(default)]
    pub twitter: Option<String>,

    /// Display name of the first breadcrumb entry.
    #[serde(default = "defaults::base::home_label")]
    #[educe(Default = defaults::base::home_label())]
    pub home_label: String,
}

impl BaseConfig {
    /// Base URL without trailing slash, empty when unset.
    pub fn origin(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    /// `og:locale` form of the language tag (`zh-CN` → `zh_CN`).
    pub fn locale(&self) -> String {
        self.language.replace('-', "_")
    }
}
