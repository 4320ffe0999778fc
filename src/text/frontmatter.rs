//! Flat frontmatter parsing.
//!
//! Only the subset of YAML documentation pages actually use is understood:
//! one `key: value` pair per line. Anything else inside the block is skipped
//! without error.
//!
//! ```text
//! ---
//! title: "Hello: World"     # -> title = Hello: World
//! # a comment               # -> ignored
//! tags                      # -> ignored (no colon)
//! ---
//! ```

use std::collections::HashMap;

/// Block delimiter line.
const MARKER: &str = "---";

/// Immutable key/value view of a page's frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: HashMap<String, String>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Like [`get`](Self::get) but treats blank values as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    /// First non-empty value among `keys`.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get_non_empty(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse the frontmatter block at the start of `source`.
///
/// Returns an empty map when the source does not open with `---` or the
/// block is never closed.
pub fn parse(source: &str) -> Frontmatter {
    split(source).0
}

/// Split `source` into its frontmatter and the remaining body.
///
/// Without a complete block the whole source is returned as the body.
pub fn split(source: &str) -> (Frontmatter, &str) {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (Frontmatter::default(), source);
    };
    if !is_marker(first) {
        return (Frontmatter::default(), source);
    }

    let mut offset = first.len();
    let block_start = offset;
    for line in lines {
        if is_marker(line) {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return (parse_block(block), body);
        }
        offset += line.len();
    }

    (Frontmatter::default(), source)
}

/// Body of `source` with any frontmatter block removed.
pub fn strip(source: &str) -> &str {
    split(source).1
}

#[inline]
fn is_marker(line: &str) -> bool {
    line.trim_end() == MARKER
}

fn parse_block(block: &str) -> Frontmatter {
    block.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_owned(), strip_quotes(value.trim()).to_owned()))
}

/// Remove one layer of matching surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&quote| {
            value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(value)
}
