//! Build orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── hooks::build_end() ──► robots.txt, rss.xml
//!     │
//!     └── write_head_manifest()            (--head-manifest)
//!             │
//!             └── par_iter(pages) ──► transform_page_data + transform_head
//!                                          │
//!                                          ▼
//!                                  head-manifest.json
//! ```

use crate::{
    config::SiteConfig,
    generator::FeedReport,
    head::{self, HeadTag, PageHead},
    hooks::{self, PageData},
    log,
    site::{discover_pages, load_page},
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// File name of the per-page head manifest.
pub const HEAD_MANIFEST: &str = "head-manifest.json";

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub feed: FeedReport,
    pub manifest: Option<PathBuf>,
}

/// Write all end-of-build artifacts into the configured output directory.
pub fn build_site(config: &SiteConfig, head_manifest: bool) -> Result<BuildSummary> {
    let out_dir = config.output_dir();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let feed = hooks::build_end(config, out_dir)?;
    let manifest = if head_manifest {
        Some(write_head_manifest(config, out_dir)?)
    } else {
        None
    };

    Ok(BuildSummary { feed, manifest })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_data: Option<PageData>,
    head: Vec<HeadTag>,
}

/// Run the per-page hooks for every page and write the results as json.
///
/// Unreadable pages are logged and left out.
pub fn write_head_manifest(config: &SiteConfig, out_dir: &Path) -> Result<PathBuf> {
    let content_dir = config.content_dir();
    let set = discover_pages(content_dir, &config.build.error_page);
    for err in &set.rejected {
        log!("warn"; "{err}");
    }

    let entries = set
        .pages
        .par_iter()
        .map(|relative| -> Result<Option<(String, ManifestEntry)>> {
            let page = match load_page(content_dir, relative) {
                Ok(page) => page,
                Err(err) => {
                    log!("warn"; "skipped {relative}: {err}");
                    return Ok(None);
                }
            };
            let ctx = &page.descriptor;
            let entry = ManifestEntry {
                url: ctx.url_path(),
                page_data: hooks::transform_page_data(ctx, &page.source, config),
                head: hooks::transform_head(ctx, Some(&page.source), config)
                    .with_context(|| format!("Failed to assemble head for {relative}"))?,
            };
            Ok(Some((relative.clone(), entry)))
        })
        .collect::<Result<Vec<_>>>()?;

    let manifest: BTreeMap<_, _> = entries.into_iter().flatten().collect();
    let json = serde_json::to_string_pretty(&manifest)?;

    let path = out_dir.join(HEAD_MANIFEST);
    fs::write(&path, json)
        .with_context(|| format!("Failed to write head manifest to {}", path.display()))?;
    log!("head"; "{} ({} pages)", HEAD_MANIFEST, manifest.len());
    Ok(path)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Inspection<'a> {
    path: &'a str,
    page_data: Option<PageData>,
    head: &'a PageHead,
}

/// Describe one page: derived data followed by its rendered head.
pub fn inspect_page(config: &SiteConfig, relative_path: &str, json: bool) -> Result<String> {
    let relative_path = relative_path.trim_start_matches(['/', '\\']).replace('\\', "/");
    let page = load_page(config.content_dir(), &relative_path)?;
    let ctx = &page.descriptor;

    let page_data = hooks::transform_page_data(ctx, &page.source, config);
    let head = head::assemble(ctx, Some(&page.source), config)?;

    if json {
        let inspection = Inspection {
            path: &relative_path,
            page_data,
            head: &head,
        };
        return Ok(serde_json::to_string_pretty(&inspection)?);
    }

    let mut out = format!(
        "path:         {relative_path}\n\
         url:          {}\n\
         title:        {}\n\
         description:  {}\n\
         reading time: {} min\n\
         article:      {}\n",
        head.canonical_url,
        head.full_title,
        head.description,
        head.reading_time_minutes,
        if head.is_article { "yes" } else { "no" },
    );
    if let Some(published) = &head.published_time {
        out.push_str(&format!("published:    {published}\n"));
    }
    if page_data.is_none() {
        out.push_str("page data:    skipped (dev build)\n");
    }
    out.push('\n');
    out.push_str(&head::render_html(&head.tags)?);
    out.push('\n');
    Ok(out)
}
