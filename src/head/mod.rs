//! Per-page `<head>` metadata.
//!
//! [`assemble`] resolves title, description, image and article times for one
//! page and emits the ordered tag list:
//!
//! ```text
//! canonical link
//! description / keywords / author / robots
//! og:*                 (Open Graph)
//! article:*            (articles only)
//! twitter:*            (Twitter Card + reading time)
//! itemprop=*           (WeChat share card)
//! application/ld+json  (StructuredGraph)
//! ```

pub mod structured;

use crate::{
    config::{PublishedFallback, SiteConfig},
    site::{PageDescriptor, build_breadcrumbs, full_url},
    text,
    utils::{
        date::{parse_date, to_rfc3339},
        xml::{self, XmlWriter},
    },
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::{Serialize, Serializer, ser::SerializeMap, ser::SerializeSeq};
pub use structured::{GraphInput, StructuredGraph};

const DEFAULT_ROBOTS: &str = "index, follow";
const TWITTER_CARD: &str = "summary_large_image";
const JSON_LD_TYPE: &str = "application/ld+json";

// ============================================================================
// Head Tags
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Meta,
    Link,
    Script,
}

impl TagKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Link => "link",
            Self::Script => "script",
        }
    }
}

/// One element of the page head.
///
/// Serializes as `["meta", {"name": "...", "content": "..."}]`, with the body
/// as a third element for scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTag {
    pub kind: TagKind,
    /// Attributes in emission order.
    pub attrs: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HeadTag {
    fn new(kind: TagKind, attrs: &[(&str, &str)]) -> Self {
        Self {
            kind,
            attrs: attrs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            body: None,
        }
    }

    /// `<meta name=".." content="..">`
    pub fn name(name: &str, content: &str) -> Self {
        Self::new(TagKind::Meta, &[("name", name), ("content", content)])
    }

    /// `<meta property=".." content="..">`
    pub fn property(property: &str, content: &str) -> Self {
        Self::new(TagKind::Meta, &[("property", property), ("content", content)])
    }

    /// `<meta itemprop=".." content="..">`
    pub fn itemprop(itemprop: &str, content: &str) -> Self {
        Self::new(TagKind::Meta, &[("itemprop", itemprop), ("content", content)])
    }

    pub fn link(rel: &str, href: &str) -> Self {
        Self::new(TagKind::Link, &[("rel", rel), ("href", href)])
    }

    /// `<script type="application/ld+json">` carrying pre-escaped JSON.
    pub fn json_ld(json: String) -> Self {
        Self {
            body: Some(json),
            ..Self::new(TagKind::Script, &[("type", JSON_LD_TYPE)])
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `content` of the meta tag whose `name`/`property`/`itemprop` is `key`.
    pub fn meta_content(&self, key: &str) -> Option<&str> {
        if self.kind != TagKind::Meta {
            return None;
        }
        let matches = ["name", "property", "itemprop"]
            .iter()
            .any(|attr| self.attr(attr) == Some(key));
        if matches { self.attr("content") } else { None }
    }

    fn write(&self, writer: &mut XmlWriter) -> Result<()> {
        let tag = self.kind.as_str();
        let mut elem = BytesStart::new(tag);
        for (k, v) in &self.attrs {
            elem.push_attribute((k.as_str(), v.as_str()));
        }

        match &self.body {
            Some(body) => {
                writer.write_event(Event::Start(elem))?;
                // Body is raw script text; JSON-LD has `</` escaped already.
                writer.write_event(Event::Text(BytesText::from_escaped(body.as_str())))?;
                writer.write_event(Event::End(BytesEnd::new(tag)))?;
            }
            None if self.kind == TagKind::Script => {
                writer.write_event(Event::Start(elem))?;
                writer.write_event(Event::End(BytesEnd::new(tag)))?;
            }
            None => writer.write_event(Event::Empty(elem))?,
        }
        Ok(())
    }

    pub fn to_html(&self) -> Result<String> {
        let mut writer = xml::compact_writer();
        self.write(&mut writer)?;
        xml::into_string(writer)
    }
}

impl Serialize for HeadTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Attrs<'a>(&'a [(String, String)]);

        impl Serialize for Attrs<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (k, v) in self.0 {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }

        let len = if self.body.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(self.kind.as_str())?;
        seq.serialize_element(&Attrs(&self.attrs))?;
        if let Some(body) = &self.body {
            seq.serialize_element(body)?;
        }
        seq.end()
    }
}

/// Render tags as HTML, one element per line.
pub fn render_html(tags: &[HeadTag]) -> Result<String> {
    let lines = tags
        .iter()
        .map(HeadTag::to_html)
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

// ============================================================================
// Assembly
// ============================================================================

/// Resolved head metadata for one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHead {
    pub canonical_url: String,
    pub title: String,
    /// `{title} | {site}`, or the bare title on the home page.
    pub full_title: String,
    pub description: String,
    pub image: String,
    pub author: String,
    pub keywords: Option<String>,
    pub is_article: bool,
    pub section: Option<String>,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub reading_time_minutes: u32,
    #[serde(skip)]
    pub graph: StructuredGraph,
    pub tags: Vec<HeadTag>,
}

/// Assemble head metadata, using the current time for the build-time fallback.
pub fn assemble(page: &PageDescriptor, source: Option<&str>, config: &SiteConfig) -> Result<PageHead> {
    assemble_at(page, source, config, Utc::now())
}

/// Assemble head metadata for `page` as of `now`.
///
/// `source` is the raw Markdown; without it no description is extracted and
/// the reading time is zero.
pub fn assemble_at(
    page: &PageDescriptor,
    source: Option<&str>,
    config: &SiteConfig,
    now: DateTime<Utc>,
) -> Result<PageHead> {
    let base = &config.base;
    let fm = &page.frontmatter;
    let origin = base.origin();

    let url_path = page.url_path();
    let canonical_url = full_url(origin, &url_path);
    let is_home = page.is_home();

    let derived = source.map(text::derive).unwrap_or_default();

    let title = fm
        .get_non_empty("title")
        .or_else(|| non_empty(&page.title))
        .unwrap_or(&base.title)
        .trim()
        .to_owned();
    let full_title = if is_home {
        title.clone()
    } else {
        format!("{title} | {}", base.title)
    };

    let description = fm
        .get_non_empty("description")
        .or_else(|| non_empty(&page.description))
        .map(str::to_owned)
        .or(derived.description)
        .unwrap_or_else(|| base.description.clone());

    let image = absolute_url(origin, fm.first_of(&["image", "cover"]).unwrap_or(&base.image));
    let author = fm.get_non_empty("author").unwrap_or(&base.author).to_owned();
    let keywords = fm
        .first_of(&["keywords", "tags"])
        .map(|k| k.trim_matches(['[', ']']).trim().to_owned())
        .filter(|k| !k.is_empty());

    let is_article = !is_home && config.build.in_article_root(&page.relative_path);
    let section = is_article
        .then(|| config.feed.category_for(&page.relative_path))
        .flatten()
        .map(str::to_owned);

    let published_time = if is_article {
        fm.get_non_empty("date")
            .map(format_time)
            .or_else(|| match config.build.published_fallback {
                PublishedFallback::Omit => None,
                PublishedFallback::BuildTime => Some(to_rfc3339(&now)),
            })
    } else {
        None
    };
    let modified_time = is_article
        .then(|| fm.first_of(&["updated", "lastUpdated"]).map(format_time))
        .flatten();

    let reading_time_minutes = derived.reading_time_minutes;

    let breadcrumbs = build_breadcrumbs(&url_path, &canonical_url, origin, &base.home_label);
    let graph = StructuredGraph::build(
        &GraphInput {
            origin,
            canonical_url: &canonical_url,
            site_name: &base.title,
            site_description: &base.description,
            language: &base.language,
            title: &title,
            description: &description,
            image: &image,
            author: &author,
            section: section.as_deref(),
            published_time: published_time.as_deref(),
            modified_time: modified_time.as_deref(),
            reading_time_minutes,
            is_article,
        },
        breadcrumbs,
    );

    let mut head = PageHead {
        canonical_url,
        title,
        full_title,
        description,
        image,
        author,
        keywords,
        is_article,
        section,
        published_time,
        modified_time,
        reading_time_minutes,
        graph,
        tags: Vec::new(),
    };
    head.tags = build_tags(&head, fm.get_non_empty("robots"), config)?;
    Ok(head)
}

fn build_tags(head: &PageHead, robots: Option<&str>, config: &SiteConfig) -> Result<Vec<HeadTag>> {
    let base = &config.base;
    let mut tags = Vec::with_capacity(32);

    tags.push(HeadTag::link("canonical", &head.canonical_url));
    tags.push(HeadTag::name("description", &head.description));
    if let Some(keywords) = &head.keywords {
        tags.push(HeadTag::name("keywords", keywords));
    }
    tags.push(HeadTag::name("author", &head.author));
    tags.push(HeadTag::name("robots", robots.unwrap_or(DEFAULT_ROBOTS)));

    // Open Graph
    let og_type = if head.is_article { "article" } else { "website" };
    tags.push(HeadTag::property("og:type", og_type));
    tags.push(HeadTag::property("og:site_name", &base.title));
    tags.push(HeadTag::property("og:title", &head.full_title));
    tags.push(HeadTag::property("og:description", &head.description));
    tags.push(HeadTag::property("og:url", &head.canonical_url));
    tags.push(HeadTag::property("og:image", &head.image));
    tags.push(HeadTag::property("og:locale", &base.locale()));

    if head.is_article {
        if let Some(published) = &head.published_time {
            tags.push(HeadTag::property("article:published_time", published));
        }
        if let Some(modified) = &head.modified_time {
            tags.push(HeadTag::property("article:modified_time", modified));
        }
        tags.push(HeadTag::property("article:author", &head.author));
        if let Some(section) = &head.section {
            tags.push(HeadTag::property("article:section", section));
        }
    }

    // Twitter Card
    tags.push(HeadTag::name("twitter:card", TWITTER_CARD));
    tags.push(HeadTag::name("twitter:title", &head.full_title));
    tags.push(HeadTag::name("twitter:description", &head.description));
    tags.push(HeadTag::name("twitter:image", &head.image));
    if let Some(site) = base.twitter.as_deref().filter(|s| !s.is_empty()) {
        tags.push(HeadTag::name("twitter:site", site));
    }
    if head.reading_time_minutes > 0 {
        tags.push(HeadTag::name("twitter:label1", "Reading time"));
        tags.push(HeadTag::name(
            "twitter:data1",
            &format!("{} min", head.reading_time_minutes),
        ));
    }

    // WeChat share card
    tags.push(HeadTag::itemprop("name", &head.full_title));
    tags.push(HeadTag::itemprop("description", &head.description));
    tags.push(HeadTag::itemprop("image", &head.image));

    tags.push(HeadTag::json_ld(head.graph.to_json_ld()?));
    Ok(tags)
}

#[inline]
fn non_empty(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

/// RFC 3339 when parseable, the authored value otherwise.
fn format_time(raw: &str) -> String {
    parse_date(raw).map_or_else(|| raw.trim().to_owned(), |dt| to_rfc3339(&dt))
}

/// Resolve site-relative paths against `origin`; absolute URLs pass through.
fn absolute_url(origin: &str, url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//") {
        url.to_owned()
    } else {
        format!("{origin}/{}", url.trim_start_matches('/'))
    }
}
