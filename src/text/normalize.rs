//! Markdown to plain text.
//!
//! Patterns run in a fixed order. An image inside a link loses its `!` before
//! the link pattern sees it.

use super::frontmatter;
use regex::Regex;
use std::sync::LazyLock;

/// Fenced blocks open and close at the start of a line.
static RE_FENCED_BACKTICK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*```[^\n]*\n.*?^[ \t]*```[ \t]*$").unwrap()
});
static RE_FENCED_TILDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*~~~[^\n]*\n.*?^[ \t]*~~~[ \t]*$").unwrap()
});
/// Unmatched fence opener at line start, with its info string.
static RE_FENCE_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(```|~~~)[^\n]*$").unwrap());
/// Any fence marker left over, e.g. mentioned inline in prose.
static RE_FENCE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`{3,}|~{3,}").unwrap());
static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]*`").unwrap());
static RE_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]*\)").unwrap());
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
static RE_EMBEDDED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>|<script\b[^>]*>.*?</script\s*>").unwrap()
});
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[A-Za-z!][^>]*>").unwrap());
static RE_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]*").unwrap());
static RE_BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(>[ \t]?)+").unwrap());
static RE_BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").unwrap());
static RE_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[.)][ \t]+").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip frontmatter and Markdown syntax, leaving single-spaced plain text.
pub fn normalize(markdown: &str) -> String {
    let text = frontmatter::strip(markdown);

    let text = RE_FENCED_BACKTICK.replace_all(text, " ");
    let text = RE_FENCED_TILDE.replace_all(&text, " ");
    let text = RE_FENCE_OPENER.replace_all(&text, " ");
    let text = RE_FENCE_MARKER.replace_all(&text, " ");
    let text = RE_INLINE_CODE.replace_all(&text, " ");
    let text = RE_IMAGE.replace_all(&text, "${1}");
    let text = RE_LINK.replace_all(&text, "${1}");
    let text = RE_EMBEDDED_BLOCK.replace_all(&text, " ");
    let text = RE_TAG.replace_all(&text, " ");
    let text = RE_HEADING.replace_all(&text, "");
    let text = RE_BLOCKQUOTE.replace_all(&text, "");
    let text = RE_BULLET.replace_all(&text, "");
    let text = RE_NUMBERED.replace_all(&text, "");

    collapse_whitespace(&text)
}

/// Collapse whitespace and hard-cut at `max_len` characters.
///
/// The cut ignores word boundaries, so the result may end mid-word.
pub fn truncate(text: &str, max_len: usize) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.chars().count() <= max_len {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_len).collect();
    cut.trim_end().to_owned()
}

fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_owned()
}
