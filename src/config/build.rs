//! `[build]` section configuration.
//!
//! Source/output locations and the rules that classify pages.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to emit as `article:published_time` when an article has no `date`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishedFallback {
    /// Leave the published time out (default).
    #[default]
    Omit,
    /// Stamp the page with the time of the current build.
    BuildTime,
}

/// `[build]` section in sitemeta.toml.
///
/// # Example
/// ```toml
/// [build]
/// content = "docs"
/// output = "docs/.vitepress/dist"
/// article_roots = ["Basic", "Advanced", "Practice"]
/// published_fallback = "omit"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Markdown source root.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Directory the generator renders into; artifacts are written here.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Production build. Page data derivation is skipped otherwise.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub production: bool,

    /// Top-level directories whose pages are classified as articles.
    #[serde(default = "defaults::build::article_roots")]
    #[educe(Default = defaults::build::article_roots())]
    pub article_roots: Vec<String>,

    /// Policy for articles without an authored publish date.
    #[serde(default)]
    pub published_fallback: PublishedFallback,

    /// Error page, never part of the feed.
    #[serde(default = "defaults::build::error_page")]
    #[educe(Default = defaults::build::error_page())]
    pub error_page: String,
}

impl BuildConfig {
    /// Whether `relative_path` lives under one of the article roots.
    pub fn in_article_root(&self, relative_path: &str) -> bool {
        self.article_roots.iter().any(|root| {
            let root = root.trim_matches('/');
            !root.is_empty()
                && relative_path
                    .strip_prefix(root)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}
