//! `[feed]` and `[robots]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

/// `[feed]` section - RSS feed generation.
///
/// # Example
/// ```toml
/// [feed]
/// path = "rss.xml"
/// limit = 200
///
/// [feed.categories]
/// Basic = "Basics"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Output path, relative to the output directory.
    #[serde(default = "defaults::feed::path")]
    #[educe(Default = defaults::feed::path())]
    pub path: PathBuf,

    /// Keep at most this many of the newest entries.
    #[serde(default = "defaults::feed::limit")]
    #[educe(Default = defaults::feed::limit())]
    pub limit: usize,

    /// Channel `<ttl>` in minutes.
    #[serde(default = "defaults::feed::ttl")]
    #[educe(Default = defaults::feed::ttl())]
    pub ttl: u32,

    /// Path prefix (first directory) to category label.
    #[serde(default = "defaults::feed::categories")]
    #[educe(Default = defaults::feed::categories())]
    pub categories: BTreeMap<String, String>,
}

impl FeedConfig {
    /// Category label for a content-relative page path.
    pub fn category_for(&self, relative_path: &str) -> Option<&str> {
        let (prefix, _) = relative_path.split_once('/')?;
        self.categories.get(prefix).map(String::as_str)
    }
}

/// `[robots]` section - robots.txt generation.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RobotsConfig {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    #[serde(default = "defaults::robots::path")]
    #[educe(Default = defaults::robots::path())]
    pub path: PathBuf,

    /// Paths every crawler is asked to skip.
    #[serde(default = "defaults::robots::disallow")]
    #[educe(Default = defaults::robots::disallow())]
    pub disallow: Vec<String>,

    /// Crawlers that get an explicit allow group.
    #[serde(default = "defaults::robots::crawlers")]
    #[educe(Default = defaults::robots::crawlers())]
    pub crawlers: Vec<String>,

    /// Sitemap file name referenced from robots.txt.
    #[serde(default = "defaults::robots::sitemap")]
    #[educe(Default = defaults::robots::sitemap())]
    pub sitemap: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_feed_defaults() {
        let config = SiteConfig::default();
        assert!(config.feed.enable);
        assert_eq!(config.feed.limit, 200);
        assert_eq!(config.feed.ttl, 60);
        assert_eq!(config.feed.path.to_str(), Some("rss.xml"));
    }

    #[test]
    fn test_category_for() {
        let config = SiteConfig::default();
        assert_eq!(config.feed.category_for("Basic/01-awakening.md"), Some("Basics"));
        assert_eq!(config.feed.category_for("Practice/a/b.md"), Some("Practice"));
        assert_eq!(config.feed.category_for("about.md"), None);
        assert_eq!(config.feed.category_for("Misc/a.md"), None);
    }

    #[test]
    fn test_custom_categories_replace_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [feed.categories]
            guide = "Guides"
        "#,
        )
        .unwrap();
        assert_eq!(config.feed.category_for("guide/intro.md"), Some("Guides"));
        assert_eq!(config.feed.category_for("Basic/intro.md"), None);
    }

    #[test]
    fn test_robots_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.robots.crawlers, ["Googlebot", "Bingbot", "Baiduspider"]);
        assert!(config.robots.disallow.iter().any(|p| p.contains("cache")));
        assert!(config.robots.disallow.iter().any(|p| p.starts_with("/search")));
    }
}
