//! RSS 2.0 feed generation.
//!
//! # Pipeline
//!
//! ```text
//! discover_pages() ──► par_iter(process_page) ──► PageOutcome per page
//!                                                     │
//!                    ┌────────────────────────────────┴───────────┐
//!                    ▼                                            ▼
//!             FeedEntry (kept)                            Diagnostic (skipped)
//!                    │
//!                    ▼
//!        stable sort by publish date (newest first), truncate to limit
//!                    │
//!                    ▼
//!               RssFeed::into_xml()
//! ```
//!
//! A page that fails to load never aborts the pass; it is reported in
//! [`FeedReport::diagnostics`] instead.

use crate::{
    config::SiteConfig,
    site::{LoadedPage, discover_pages, full_url, load_page},
    text,
    utils::{
        date::{from_system_time, parse_date, to_rfc2822},
        xml::{self, XmlWriter},
    },
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use rayon::prelude::*;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
/// Namespace of the `reading:minutes` item extension.
pub const READING_NS: &str = "https://sitemeta.dev/ns/reading";
const GENERATOR: &str = concat!("sitemeta ", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Data Model
// ============================================================================

/// One `<item>` of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// Absolute page URL, also used as the permalink guid.
    pub link: String,
    pub description: String,
    pub publish_date: DateTime<Utc>,
    pub category: Option<String>,
    /// `email (Name)` form.
    pub author: Option<String>,
    pub reading_time_minutes: Option<u32>,
}

/// Why a page is missing from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Entry(FeedEntry),
    Skipped(Diagnostic),
}

/// Result of the feed pass over the whole site.
#[derive(Debug, Clone, Default)]
pub struct FeedReport {
    /// Newest first, at most `[feed].limit` entries.
    pub entries: Vec<FeedEntry>,
    pub diagnostics: Vec<Diagnostic>,
    /// Pages considered, including skipped ones.
    pub total_pages: usize,
}

impl FeedReport {
    /// Scan `content_dir` and build a feed entry for every page.
    pub fn collect(content_dir: &Path, config: &SiteConfig, now: DateTime<Utc>) -> Self {
        let set = discover_pages(content_dir, &config.build.error_page);
        let total_pages = set.total();

        let outcomes: Vec<PageOutcome> = set
            .pages
            .par_iter()
            .map(|relative| process_page(content_dir, relative, config, now))
            .collect();

        let mut diagnostics: Vec<Diagnostic> = set
            .rejected
            .iter()
            .map(|err| Diagnostic {
                path: err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                reason: error_chain(err),
            })
            .collect();

        let mut entries = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                PageOutcome::Entry(entry) => entries.push(entry),
                PageOutcome::Skipped(diagnostic) => diagnostics.push(diagnostic),
            }
        }

        Self::from_parts(entries, diagnostics, total_pages, config.feed.limit)
    }

    /// Order entries newest first and keep the most recent `limit`.
    ///
    /// The sort is stable: entries with equal dates keep their input order.
    pub fn from_parts(
        mut entries: Vec<FeedEntry>,
        diagnostics: Vec<Diagnostic>,
        total_pages: usize,
        limit: usize,
    ) -> Self {
        entries.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        entries.truncate(limit);
        Self {
            entries,
            diagnostics,
            total_pages,
        }
    }
}

// ============================================================================
// Per-page Extraction
// ============================================================================

/// Load one page and turn it into a feed entry, or a diagnostic on failure.
pub fn process_page(
    content_dir: &Path,
    relative_path: &str,
    config: &SiteConfig,
    now: DateTime<Utc>,
) -> PageOutcome {
    match load_page(content_dir, relative_path) {
        Ok(page) => PageOutcome::Entry(entry_from_page(&page, config, now)),
        Err(err) => PageOutcome::Skipped(Diagnostic {
            path: relative_path.to_owned(),
            reason: error_chain(&err),
        }),
    }
}

/// Build the feed entry for a loaded page.
pub fn entry_from_page(page: &LoadedPage, config: &SiteConfig, now: DateTime<Utc>) -> FeedEntry {
    let base = &config.base;
    let descriptor = &page.descriptor;
    let fm = &descriptor.frontmatter;
    let derived = text::derive(&page.source);

    let title = if descriptor.title.trim().is_empty() {
        base.title.clone()
    } else {
        descriptor.title.clone()
    };

    let description = fm
        .get_non_empty("description")
        .map(str::to_owned)
        .or(derived.description)
        .unwrap_or_else(|| base.description.clone());

    let publish_date = fm
        .get_non_empty("date")
        .and_then(parse_date)
        .or_else(|| descriptor.modified.map(from_system_time))
        .unwrap_or(now);

    FeedEntry {
        title,
        link: full_url(base.origin(), &descriptor.url_path()),
        description,
        publish_date,
        category: config
            .feed
            .category_for(&descriptor.relative_path)
            .map(str::to_owned),
        author: normalize_rss_author(fm.get_non_empty("author"), config),
        reading_time_minutes: Some(derived.reading_time_minutes).filter(|&m| m > 0),
    }
}

/// Normalize a page author to rss format: `email@example.com (Name)`.
///
/// A bare name is paired with the site email. Without a site email the name
/// is kept as written.
fn normalize_rss_author(author: Option<&str>, config: &SiteConfig) -> Option<String> {
    let author = author?.trim();
    if is_rss_author(author) {
        return Some(author.to_owned());
    }
    let email = config.base.email.trim();
    if email.is_empty() {
        Some(author.to_owned())
    } else {
        Some(format!("{email} ({author})"))
    }
}

fn site_rss_author(config: &SiteConfig) -> String {
    let site_author = &config.base.author;
    if is_rss_author(site_author) {
        site_author.clone()
    } else {
        format!("{} ({})", config.base.email, site_author)
    }
}

fn is_rss_author(s: &str) -> bool {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });
    RE_VALID_AUTHOR.is_match(s)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

// ============================================================================
// Serialization
// ============================================================================

/// RSS document over already sorted entries.
pub struct RssFeed<'a> {
    config: &'a SiteConfig,
    entries: &'a [FeedEntry],
    build_time: DateTime<Utc>,
}

impl<'a> RssFeed<'a> {
    pub fn new(config: &'a SiteConfig, entries: &'a [FeedEntry], build_time: DateTime<Utc>) -> Self {
        Self {
            config,
            entries,
            build_time,
        }
    }

    /// Generate rss xml string.
    pub fn into_xml(self) -> Result<String> {
        let base = &self.config.base;
        let origin = base.origin();
        let self_url = full_url(origin, &format!("/{}", self.feed_path()));
        let last_build = self
            .entries
            .iter()
            .map(|entry| entry.publish_date)
            .max()
            .unwrap_or(self.build_time);
        let editor = site_rss_author(self.config);

        let mut writer = xml::indented_writer();
        xml::write_declaration(&mut writer)?;

        let rss = BytesStart::new("rss").with_attributes([
            ("version", "2.0"),
            ("xmlns:atom", ATOM_NS),
            ("xmlns:reading", READING_NS),
        ]);
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        xml::write_text_element(&mut writer, "title", &base.title)?;
        xml::write_text_element(&mut writer, "link", &format!("{origin}/"))?;
        xml::write_text_element(&mut writer, "description", &base.description)?;
        xml::write_text_element(&mut writer, "language", &base.language)?;
        xml::write_text_element(&mut writer, "lastBuildDate", &to_rfc2822(&last_build))?;
        xml::write_text_element(&mut writer, "managingEditor", &editor)?;
        xml::write_text_element(&mut writer, "webMaster", &editor)?;
        xml::write_text_element(&mut writer, "generator", GENERATOR)?;
        xml::write_text_element(&mut writer, "ttl", &self.config.feed.ttl.to_string())?;
        xml::write_empty_elem(
            &mut writer,
            "atom:link",
            &[
                ("href", self_url.as_str()),
                ("rel", "self"),
                ("type", "application/rss+xml"),
            ],
        )?;

        for entry in self.entries {
            write_item(&mut writer, entry)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        let mut out = xml::into_string(writer)?;
        out.push('\n');
        Ok(out)
    }

    /// Write rss feed to `out_dir`, returning the written path.
    pub fn write(self, out_dir: &Path) -> Result<PathBuf> {
        let rss_path = out_dir.join(&self.config.feed.path);
        let xml = self.into_xml()?;

        if let Some(parent) = rss_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&rss_path, xml)
            .with_context(|| format!("Failed to write rss feed to {}", rss_path.display()))?;
        Ok(rss_path)
    }

    fn feed_path(&self) -> String {
        self.config
            .feed
            .path
            .to_string_lossy()
            .replace('\\', "/")
            .trim_start_matches('/')
            .to_owned()
    }
}

fn write_item(writer: &mut XmlWriter, entry: &FeedEntry) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    xml::write_text_element(writer, "title", &entry.title)?;
    xml::write_text_element(writer, "link", &entry.link)?;
    xml::write_text_element_with_attrs(writer, "guid", &[("isPermaLink", "true")], &entry.link)?;
    xml::write_text_element(writer, "pubDate", &to_rfc2822(&entry.publish_date))?;
    xml::write_cdata_element(writer, "description", &entry.description)?;
    if let Some(category) = &entry.category {
        xml::write_text_element(writer, "category", category)?;
    }
    if let Some(author) = &entry.author {
        xml::write_text_element(writer, "author", author)?;
    }
    if let Some(minutes) = entry.reading_time_minutes {
        xml::write_text_element(writer, "reading:minutes", &minutes.to_string())?;
    }

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use quick_xml::Reader;
    use tempfile::TempDir;

    fn make_config(author: &str, email: &str) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Learn".to_string();
        config.base.author = author.to_string();
        config.base.email = email.to_string();
        config.base.url = Some("https://example.com".to_string());
        config
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn entry(title: &str, date: DateTime<Utc>) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: format!("https://example.com/{title}.html"),
            description: format!("About {title}"),
            publish_date: date,
            category: None,
            author: None,
            reading_time_minutes: None,
        }
    }

    fn write(dir: &Path, relative: &str, content: &[u8]) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Concatenated CDATA text of every item description in document order.
    fn cdata_texts(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut texts = Vec::new();
        let mut in_item = false;
        let mut current: Option<String> = None;
        loop {
            match reader.read_event().expect("feed must be well-formed") {
                Event::Start(e) if e.name().as_ref() == b"item" => in_item = true,
                Event::End(e) if e.name().as_ref() == b"item" => in_item = false,
                Event::Start(e) if in_item && e.name().as_ref() == b"description" => {
                    current = Some(String::new());
                }
                Event::CData(e) => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(std::str::from_utf8(&e.into_inner()).unwrap());
                    }
                }
                Event::End(e) if e.name().as_ref() == b"description" => {
                    texts.extend(current.take());
                }
                Event::Eof => break,
                _ => {}
            }
        }
        texts
    }

    #[test]
    fn test_normalize_rss_author() {
        let config = make_config("Site Author", "site@example.com");

        // Page author is already valid
        assert_eq!(
            normalize_rss_author(Some("post@example.com (Post Author)"), &config).as_deref(),
            Some("post@example.com (Post Author)")
        );

        // Bare name keeps the page author and borrows the site email
        assert_eq!(
            normalize_rss_author(Some("Bob"), &config).as_deref(),
            Some("site@example.com (Bob)")
        );

        assert_eq!(normalize_rss_author(None, &config), None);

        let no_email = make_config("site@example.com (Site Author)", "");
        assert_eq!(
            normalize_rss_author(Some("Bob"), &no_email).as_deref(),
            Some("Bob")
        );
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let entries = vec![
            entry("old", day(1)),
            entry("tie-a", day(5)),
            entry("new", day(9)),
            entry("tie-b", day(5)),
        ];
        let report = FeedReport::from_parts(entries, vec![], 4, 200);
        let titles: Vec<_> = report.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["new", "tie-a", "tie-b", "old"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let entries = (1..=28).map(|d| entry(&d.to_string(), day(d))).collect();
        let report = FeedReport::from_parts(entries, vec![], 28, 5);
        assert_eq!(report.entries.len(), 5);
        assert_eq!(report.entries[0].publish_date, day(28));
        assert_eq!(report.entries[4].publish_date, day(24));
    }

    #[test]
    fn test_collect_isolates_failing_page() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "Basic/a.md", b"---\ntitle: A\ndate: 2024-01-01\n---\nalpha");
        write(root, "Basic/b.md", b"---\ntitle: B\ndate: 2024-03-01\n---\nbeta");
        write(root, "Advanced/c.md", b"---\ndate: 2024-02-01\n---\n# Gamma\n\ngamma");
        // Not UTF-8: reading it fails.
        write(root, "Practice/broken.md", &[0xff, 0xfe, 0x00, 0xc3]);
        write(root, "404.md", b"not found");

        let config = make_config("Site Author", "site@example.com");
        let report = FeedReport::collect(root, &config, now());

        assert_eq!(report.total_pages, 4);
        assert_eq!(report.entries.len(), report.total_pages - 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].path, "Practice/broken.md");

        let titles: Vec<_> = report.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["B", "Gamma", "A"]);
        assert!(
            report
                .entries
                .windows(2)
                .all(|w| w[0].publish_date >= w[1].publish_date)
        );
    }

    #[test]
    fn test_entry_fields() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "Basic/01-awakening.md",
            b"---\ndate: 2024-03-01\nauthor: Bob\n---\nHello world",
        );
        let config = make_config("Site Author", "site@example.com");
        let page = load_page(dir.path(), "Basic/01-awakening.md").unwrap();
        let entry = entry_from_page(&page, &config, now());

        assert_eq!(entry.title, "01-awakening");
        assert_eq!(entry.link, "https://example.com/Basic/01-awakening.html");
        assert_eq!(entry.description, "Hello world");
        assert_eq!(entry.publish_date, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(entry.category.as_deref(), Some("Basics"));
        assert_eq!(entry.author.as_deref(), Some("site@example.com (Bob)"));
        assert_eq!(entry.reading_time_minutes, Some(1));
    }

    #[test]
    fn test_publish_date_falls_back_to_mtime() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "about.md", b"---\ndate: not a date\n---\n");
        let config = make_config("A", "a@example.com");
        let page = load_page(dir.path(), "about.md").unwrap();
        let entry = entry_from_page(&page, &config, now());

        let mtime = from_system_time(page.descriptor.modified.unwrap());
        assert_eq!(entry.publish_date, mtime);
        assert_eq!(entry.description, config.base.description);
        assert_eq!(entry.reading_time_minutes, None);
        assert_eq!(entry.category, None);
    }

    #[test]
    fn test_publish_date_falls_back_to_build_time() {
        let config = make_config("A", "a@example.com");
        let page = LoadedPage {
            descriptor: crate::site::PageDescriptor::new("about.md"),
            source: String::new(),
        };
        assert_eq!(entry_from_page(&page, &config, now()).publish_date, now());
    }

    #[test]
    fn test_into_xml_channel() {
        let config = make_config("Site Author", "site@example.com");
        let entries = [entry("a", day(3)), entry("b", day(2))];
        let xml = RssFeed::new(&config, &entries, now()).into_xml().unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0""#));
        assert!(xml.contains("<title>Learn</title>"));
        assert!(xml.contains("<link>https://example.com/</link>"));
        assert!(xml.contains("<language>zh-CN</language>"));
        assert!(xml.contains("<lastBuildDate>Wed, 03 Jan 2024 00:00:00 GMT</lastBuildDate>"));
        assert!(xml.contains("<managingEditor>site@example.com (Site Author)</managingEditor>"));
        assert!(xml.contains("<webMaster>site@example.com (Site Author)</webMaster>"));
        assert!(xml.contains("<ttl>60</ttl>"));
        assert!(xml.contains(r#"<atom:link href="https://example.com/rss.xml" rel="self""#));
        assert!(xml.contains(r#"<guid isPermaLink="true">https://example.com/a.html</guid>"#));
        assert!(xml.contains("<pubDate>Tue, 02 Jan 2024 00:00:00 GMT</pubDate>"));
        assert!(xml.find("a.html").unwrap() < xml.find("b.html").unwrap());
    }

    #[test]
    fn test_into_xml_empty_uses_build_time() {
        let config = make_config("A", "a@example.com");
        let xml = RssFeed::new(&config, &[], now()).into_xml().unwrap();
        assert!(xml.contains("<lastBuildDate>Sun, 01 Jun 2025 12:00:00 GMT</lastBuildDate>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_optional_item_elements() {
        let config = make_config("A", "a@example.com");
        let mut full = entry("full", day(2));
        full.category = Some("Basics".into());
        full.author = Some("a@example.com (A)".into());
        full.reading_time_minutes = Some(4);

        let xml = RssFeed::new(&config, &[full], now()).into_xml().unwrap();
        assert!(xml.contains("<category>Basics</category>"));
        assert!(xml.contains("<author>a@example.com (A)</author>"));
        assert!(xml.contains("<reading:minutes>4</reading:minutes>"));

        let xml = RssFeed::new(&config, &[entry("bare", day(2))], now())
            .into_xml()
            .unwrap();
        assert!(!xml.contains("<category>"));
        assert!(!xml.contains("<author>"));
        assert!(!xml.contains("reading:minutes>"));
    }

    #[test]
    fn test_description_with_cdata_terminator_is_well_formed() {
        let config = make_config("A", "a@example.com");
        let mut tricky = entry("tricky", day(1));
        tricky.description = "x ]]> <b>y</b> & ]]>".into();

        let xml = RssFeed::new(&config, &[tricky.clone()], now())
            .into_xml()
            .unwrap();
        assert_eq!(cdata_texts(&xml), [tricky.description]);
    }

    #[test]
    fn test_write() {
        let dir = TempDir::new().unwrap();
        let config = make_config("A", "a@example.com");
        let path = RssFeed::new(&config, &[entry("a", day(1))], now())
            .write(&dir.path().join("dist"))
            .unwrap();

        assert_eq!(path, dir.path().join("dist/rss.xml"));
        let xml = fs::read_to_string(path).unwrap();
        assert!(xml.contains("<item>"));
    }
}
