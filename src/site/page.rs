//! Content pages: discovery, loading and the descriptor shared by all stages.
//!
//! # Architecture
//!
//! ```text
//! discover_pages(content_dir)
//!     │
//!     ├── PageSet.pages     (sorted relative paths)
//!     └── PageSet.rejected  (PageError, reported as diagnostics)
//!            │
//!            ▼
//!     load_page(content_dir, relative) ──► LoadedPage { descriptor, source }
//!                                                │
//!                          ┌─────────────────────┴──────────────────┐
//!                          ▼                                        ▼
//!                   head::assemble()                        generator::rss
//! ```

use super::url::{is_home, url_for_page};
use crate::text::{Frontmatter, frontmatter};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};
use thiserror::Error;
use walkdir::WalkDir;

/// Directories never searched for pages.
const IGNORED_DIRS: &[&str] = &["node_modules"];
const SOURCE_EXT: &str = "md";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("page path is not valid UTF-8: `{}`", .0.display())]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl PageError {
    /// Path the error refers to, for diagnostics.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::NonUtf8Path(path) => Some(path),
            Self::Walk(err) => err.path(),
        }
    }
}

/// Everything known about one content page before derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDescriptor {
    /// Slash-separated, relative to the content root.
    pub relative_path: String,
    pub title: String,
    /// Authored description, empty when absent.
    pub description: String,
    pub frontmatter: Frontmatter,
    pub modified: Option<SystemTime>,
}

impl PageDescriptor {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            ..Self::default()
        }
    }

    /// Build a descriptor from raw page source.
    pub fn from_source(relative_path: impl Into<String>, source: &str) -> Self {
        let relative_path = relative_path.into();
        let (frontmatter, body) = frontmatter::split(source);
        let title = derive_title(&frontmatter, body, &relative_path).unwrap_or_default();
        let description = frontmatter
            .get_non_empty("description")
            .unwrap_or_default()
            .to_owned();

        Self {
            relative_path,
            title,
            description,
            frontmatter,
            modified: None,
        }
    }

    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    #[inline]
    pub fn url_path(&self) -> String {
        url_for_page(&self.relative_path)
    }

    #[inline]
    pub fn is_home(&self) -> bool {
        is_home(&self.relative_path)
    }
}

/// A page read from disk.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub descriptor: PageDescriptor,
    pub source: String,
}

/// Read one page and build its descriptor.
pub fn load_page(content_dir: &Path, relative_path: &str) -> Result<LoadedPage, PageError> {
    let path = content_dir.join(relative_path);
    let source = fs::read_to_string(&path).map_err(|source| PageError::Io {
        path: path.clone(),
        source,
    })?;
    let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();

    Ok(LoadedPage {
        descriptor: PageDescriptor::from_source(relative_path, &source).with_modified(modified),
        source,
    })
}

/// Result of scanning the content directory.
#[derive(Debug, Default)]
pub struct PageSet {
    /// Sorted, slash-separated paths relative to the content root.
    pub pages: Vec<String>,
    /// Entries that could not be turned into a page path.
    pub rejected: Vec<PageError>,
}

impl PageSet {
    #[inline]
    pub fn total(&self) -> usize {
        self.pages.len() + self.rejected.len()
    }
}

/// Find every Markdown page under `content_dir` except `error_page`.
///
/// Hidden directories (`.vitepress`, `.git`, ...) and `node_modules` are skipped.
pub fn discover_pages(content_dir: &Path, error_page: &str) -> PageSet {
    let mut set = PageSet::default();

    let walker = WalkDir::new(content_dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || !is_ignored_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                set.rejected.push(err.into());
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXT)
        {
            continue;
        }

        match relative_page_path(content_dir, path) {
            Ok(relative) if relative == error_page => {}
            Ok(relative) => set.pages.push(relative),
            Err(err) => set.rejected.push(err),
        }
    }

    set.pages.sort_unstable();
    set
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || IGNORED_DIRS.contains(&name.as_ref())
}

fn relative_page_path(content_dir: &Path, path: &Path) -> Result<String, PageError> {
    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PageError::NonUtf8Path(path.to_path_buf()))?;
    Ok(parts.join("/"))
}

/// Page title: frontmatter `title`, then the first `# ` heading, then the file name.
///
/// Returns `None` only for the home document without title or heading.
pub fn derive_title(frontmatter: &Frontmatter, body: &str, relative_path: &str) -> Option<String> {
    frontmatter
        .get_non_empty("title")
        .map(|title| title.trim().to_owned())
        .or_else(|| first_heading(body))
        .or_else(|| title_from_path(relative_path))
}

/// Text of the first level-one ATX heading outside code fences.
fn first_heading(body: &str) -> Option<String> {
    let mut in_fence = false;
    for line in body.lines() {
        let line = line.trim_start();
        if line.starts_with("```") || line.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(heading) = line.strip_prefix("# ") {
            let heading = heading.trim().trim_end_matches('#').trim_end();
            if !heading.is_empty() {
                return Some(heading.to_owned());
            }
        }
    }
    None
}

/// `Basic/01-awakening.md` → `01-awakening`, `Basic/index.md` → `Basic`.
fn title_from_path(relative_path: &str) -> Option<String> {
    let stem = relative_path
        .strip_suffix(".md")
        .unwrap_or(relative_path);
    let stem = match stem.rsplit_once('/') {
        Some((dir, "index")) => dir,
        None if stem == "index" => "",
        _ => stem,
    };
    stem.trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}
