//! robots.txt generation.
//!
//! # Format
//!
//! ```text
//! User-agent: *
//! Allow: /
//! Disallow: /.vitepress/cache/
//!
//! User-agent: Googlebot
//! Allow: /
//!
//! Sitemap: https://example.com/sitemap.xml
//! ```

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Render robots.txt for the site.
pub fn robots_txt(config: &SiteConfig) -> String {
    let robots = &config.robots;
    let mut out = String::with_capacity(256);

    out.push_str("User-agent: *\nAllow: /\n");
    for path in &robots.disallow {
        out.push_str(&format!("Disallow: {path}\n"));
    }

    for crawler in &robots.crawlers {
        out.push_str(&format!("\nUser-agent: {crawler}\nAllow: /\n"));
    }

    if config.base.url.is_some() {
        let sitemap = robots.sitemap.trim_start_matches('/');
        out.push_str(&format!("\nSitemap: {}/{sitemap}\n", config.base.origin()));
    }

    out
}

/// Write robots.txt to `out_dir`, returning the written path.
pub fn write_robots(config: &SiteConfig, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(&config.robots.path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, robots_txt(config))
        .with_context(|| format!("Failed to write robots.txt to {}", path.display()))?;
    Ok(path)
}
