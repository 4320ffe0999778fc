//! Entry points invoked by the site generator.
//!
//! | Hook                    | When                        | Returns              |
//! |-------------------------|-----------------------------|----------------------|
//! | [`transform_page_data`] | once per page (production)  | description + time   |
//! | [`transform_head`]      | once per page               | ordered head tags    |
//! | [`build_end`]           | once, after all pages       | feed report          |

use crate::{
    config::SiteConfig,
    generator::{FeedReport, RssFeed, write_robots},
    head::{self, HeadTag},
    log,
    site::PageDescriptor,
    text,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Values injected into a page's data at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub description: String,
    pub reading_time: u32,
}

/// Derive page data, or `None` outside production builds.
///
/// An authored description wins over the extracted one; the site default is
/// used when the page has no text.
pub fn transform_page_data(
    ctx: &PageDescriptor,
    source: &str,
    config: &SiteConfig,
) -> Option<PageData> {
    if !config.build.production {
        return None;
    }

    let derived = text::derive(source);
    let description = ctx
        .frontmatter
        .get_non_empty("description")
        .or_else(|| (!ctx.description.trim().is_empty()).then_some(ctx.description.as_str()))
        .map(str::to_owned)
        .or(derived.description)
        .unwrap_or_else(|| config.base.description.clone());

    Some(PageData {
        description,
        reading_time: derived.reading_time_minutes,
    })
}

/// Head tags for one page.
pub fn transform_head(
    ctx: &PageDescriptor,
    source: Option<&str>,
    config: &SiteConfig,
) -> Result<Vec<HeadTag>> {
    Ok(head::assemble(ctx, source, config)?.tags)
}

/// Write robots.txt and the RSS feed into `out_dir`.
///
/// Pages that cannot be read are logged and left out of the feed.
pub fn build_end(config: &SiteConfig, out_dir: &Path) -> Result<FeedReport> {
    build_end_at(config, out_dir, Utc::now())
}

pub fn build_end_at(config: &SiteConfig, out_dir: &Path, now: DateTime<Utc>) -> Result<FeedReport> {
    if config.robots.enable {
        let path = write_robots(config, out_dir)?;
        log!("robots"; "{}", file_name(&path));
    }

    if !config.feed.enable {
        return Ok(FeedReport::default());
    }

    let report = FeedReport::collect(config.content_dir(), config, now);
    for diagnostic in &report.diagnostics {
        log!("warn"; "skipped {}: {}", diagnostic.path, diagnostic.reason);
    }

    let path = RssFeed::new(config, &report.entries, now).write(out_dir)?;
    log!(
        "rss";
        "{} ({} of {} pages)",
        file_name(&path),
        report.entries.len(),
        report.total_pages
    );

    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}
