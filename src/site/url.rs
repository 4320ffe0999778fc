//! Page URLs and breadcrumb trails.
//!
//! # Path Mapping Examples
//!
//! | Source                  | URL path                  |
//! |-------------------------|---------------------------|
//! | `index.md`              | `/`                       |
//! | `Basic/index.md`        | `/Basic/`                 |
//! | `Basic/01-awakening.md` | `/Basic/01-awakening.html`|

use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// The site's home document.
pub const HOME_PAGE: &str = "index.md";
/// Directory index document name.
const INDEX_PAGE: &str = "index.md";
const SOURCE_EXT: &str = ".md";
const PAGE_EXT: &str = ".html";

/// One entry of a `BreadcrumbList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbEntry {
    /// 1-based, contiguous.
    pub position: usize,
    pub name: String,
    pub item_url: String,
}

/// Whether `relative_path` is the home document.
pub fn is_home(relative_path: &str) -> bool {
    normalize_relative(relative_path) == HOME_PAGE
}

/// Map a content-relative source path to its site URL path.
pub fn url_for_page(relative_path: &str) -> String {
    let path = normalize_relative(relative_path);

    if path == HOME_PAGE {
        return "/".to_owned();
    }
    if let Some(dir) = path
        .strip_suffix(INDEX_PAGE)
        .and_then(|dir| dir.strip_suffix('/'))
    {
        return format!("/{dir}/");
    }

    let stem = path.strip_suffix(SOURCE_EXT).unwrap_or(&path);
    format!("/{stem}{PAGE_EXT}")
}

/// Absolute URL for a site path.
pub fn full_url(origin: &str, url_path: &str) -> String {
    format!("{}{url_path}", origin.trim_end_matches('/'))
}

/// Build the breadcrumb trail for a page.
///
/// Returns `None` for the root path. The last entry always points at
/// `full_url` verbatim; earlier entries are directory URLs under `origin`.
pub fn build_breadcrumbs(
    url_path: &str,
    full_url: &str,
    origin: &str,
    home_label: &str,
) -> Option<Vec<BreadcrumbEntry>> {
    let path = url_path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return None;
    }

    let origin = origin.trim_end_matches('/');
    let last = segments.len() - 1;

    let mut trail = Vec::with_capacity(segments.len() + 1);
    trail.push(BreadcrumbEntry {
        position: 1,
        name: home_label.to_owned(),
        item_url: format!("{origin}/"),
    });

    let mut accumulated = String::new();
    for (index, segment) in segments.iter().enumerate() {
        accumulated.push('/');
        accumulated.push_str(segment);

        let item_url = if index == last {
            full_url.to_owned()
        } else {
            format!("{origin}{accumulated}/")
        };
        trail.push(BreadcrumbEntry {
            position: index + 2,
            name: segment_display_name(segment),
            item_url,
        });
    }

    Some(trail)
}

/// Human-readable name for one URL segment.
///
/// `01-awakening.html` → `01 awakening`, `my%20notes` → `my notes`.
pub fn segment_display_name(segment: &str) -> String {
    static RE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_]+").unwrap());

    let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
    let stem = decoded.strip_suffix(PAGE_EXT).unwrap_or(&decoded);
    let name = RE_SEPARATORS.replace_all(stem, " ");
    let name = name.trim();

    if name.is_empty() {
        decoded.into_owned()
    } else {
        name.to_owned()
    }
}

fn normalize_relative(relative_path: &str) -> Cow<'_, str> {
    let path = relative_path.trim_start_matches(['/', '\\']);
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://learn.example.com";

    #[test]
    fn test_url_for_page() {
        assert_eq!(url_for_page("index.md"), "/");
        assert_eq!(url_for_page("Basic/index.md"), "/Basic/");
        assert_eq!(url_for_page("Basic/01-awakening.md"), "/Basic/01-awakening.html");
        assert_eq!(url_for_page("a/b/index.md"), "/a/b/");
        assert_eq!(url_for_page("about.md"), "/about.html");
    }

    #[test]
    fn test_url_for_page_lenient_separators() {
        assert_eq!(url_for_page("/Basic/index.md"), "/Basic/");
        assert_eq!(url_for_page("Basic\\02-setup.md"), "/Basic/02-setup.html");
    }

    #[test]
    fn test_only_directory_index_is_special() {
        assert_eq!(url_for_page("myindex.md"), "/myindex.html");
        assert_eq!(url_for_page("Basic/myindex.md"), "/Basic/myindex.html");
    }

    #[test]
    fn test_is_home() {
        assert!(is_home("index.md"));
        assert!(is_home("/index.md"));
        assert!(!is_home("Basic/index.md"));
    }

    #[test]
    fn test_full_url() {
        assert_eq!(full_url("https://a.dev/", "/x.html"), "https://a.dev/x.html");
        assert_eq!(full_url("https://a.dev", "/"), "https://a.dev/");
    }

    #[test]
    fn test_breadcrumbs_root_is_none() {
        assert_eq!(build_breadcrumbs("/", ORIGIN, ORIGIN, "Home"), None);
        assert_eq!(build_breadcrumbs("", ORIGIN, ORIGIN, "Home"), None);
        assert_eq!(build_breadcrumbs("/?q=1#top", ORIGIN, ORIGIN, "Home"), None);
    }

    #[test]
    fn test_breadcrumbs_single_segment() {
        let full = format!("{ORIGIN}/about.html");
        let trail = build_breadcrumbs("/about.html", &full, ORIGIN, "Home").unwrap();

        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].position, 1);
        assert_eq!(trail[0].name, "Home");
        assert_eq!(trail[0].item_url, format!("{ORIGIN}/"));
        assert_eq!(trail[1].position, 2);
        assert_eq!(trail[1].name, "about");
        assert_eq!(trail[1].item_url, full);
    }

    #[test]
    fn test_breadcrumbs_nested_page() {
        let full = format!("{ORIGIN}/Basic/01-awakening.html");
        let trail = build_breadcrumbs("/Basic/01-awakening.html", &full, ORIGIN, "Home").unwrap();

        let positions: Vec<_> = trail.iter().map(|e| e.position).collect();
        assert_eq!(positions, [1, 2, 3]);
        assert_eq!(trail[1].name, "Basic");
        assert_eq!(trail[1].item_url, format!("{ORIGIN}/Basic/"));
        assert_eq!(trail[2].name, "01 awakening");
        assert_eq!(trail[2].item_url, full);
    }

    #[test]
    fn test_breadcrumbs_last_url_is_verbatim() {
        let full = "https://cdn.example.com/Basic/?ref=feed";
        let trail = build_breadcrumbs("/Basic/?ref=feed", full, ORIGIN, "Home").unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].item_url, full);
    }

    #[test]
    fn test_breadcrumbs_intermediate_urls_have_trailing_slash() {
        let full = format!("{ORIGIN}/a/b/c.html");
        let trail = build_breadcrumbs("/a/b/c.html", &full, ORIGIN, "Home").unwrap();
        for entry in &trail[..trail.len() - 1] {
            assert!(entry.item_url.ends_with('/'));
        }
        assert_eq!(trail[2].item_url, format!("{ORIGIN}/a/b/"));
    }

    #[test]
    fn test_segment_display_name() {
        assert_eq!(segment_display_name("01-awakening.html"), "01 awakening");
        assert_eq!(segment_display_name("deep__dive--intro"), "deep dive intro");
        assert_eq!(segment_display_name("%E5%9F%BA%E7%A1%80"), "基础");
        assert_eq!(segment_display_name("my%20notes"), "my notes");
        assert_eq!(segment_display_name("---"), "---");
        assert_eq!(segment_display_name("-.html"), "-.html");
    }
}
