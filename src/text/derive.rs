//! Description and reading-time derivation from raw Markdown.

use super::normalize::{normalize, truncate};

/// Upper bound for synthesized descriptions, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 160;

/// Reading speed, shared by CJK characters and Latin words.
pub const UNITS_PER_MINUTE: usize = 200;

/// Values computed from a page's raw source on every build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedMetadata {
    /// `None` when the page has no text to summarize.
    pub description: Option<String>,
    pub reading_time_minutes: u32,
}

/// Derive both description and reading time from one normalization pass.
pub fn derive(source: &str) -> DerivedMetadata {
    let text = normalize(source);
    DerivedMetadata {
        description: description_from_text(&text),
        reading_time_minutes: reading_time_from_text(&text),
    }
}

/// Summary of at most [`DESCRIPTION_MAX_LEN`] characters.
///
/// Returns `None` for pages without text; callers fall back to the site default.
pub fn extract_description(source: &str) -> Option<String> {
    description_from_text(&normalize(source))
}

/// Estimated reading time in whole minutes, rounded up.
pub fn estimate_reading_time(source: &str) -> u32 {
    reading_time_from_text(&normalize(source))
}

fn description_from_text(text: &str) -> Option<String> {
    let description = truncate(text, DESCRIPTION_MAX_LEN);
    (!description.is_empty()).then_some(description)
}

fn reading_time_from_text(text: &str) -> u32 {
    let units = count_cjk(text) + count_latin_words(text);
    u32::try_from(units.div_ceil(UNITS_PER_MINUTE)).unwrap_or(u32::MAX)
}

fn count_cjk(text: &str) -> usize {
    text.chars().filter(|&c| is_cjk_ideograph(c)).count()
}

/// Whitespace-delimited tokens with at least one ASCII letter.
///
/// CJK ideographs act as separators so `Rust语言` counts one word plus two characters.
fn count_latin_words(text: &str) -> usize {
    text.split(|c: char| c.is_whitespace() || is_cjk_ideograph(c))
        .filter(|token| token.chars().any(|c| c.is_ascii_alphabetic()))
        .count()
}

#[inline]
fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'   // Extension A
        | '\u{F900}'..='\u{FAFF}'   // Compatibility Ideographs
        | '\u{20000}'..='\u{2A6DF}' // Extension B
        | '\u{2A700}'..='\u{2EBEF}' // Extensions C-F
        | '\u{30000}'..='\u{3134F}' // Extension G
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_description_short() {
        assert_eq!(
            extract_description("# Title\n\nSome **intro** text."),
            Some("Title Some **intro** text.".to_owned())
        );
    }

    #[test]
    fn test_extract_description_truncates() {
        let source = "word ".repeat(100);
        let description = extract_description(&source).unwrap();
        assert!(description.chars().count() <= DESCRIPTION_MAX_LEN);
        assert!(description.starts_with("word word"));
    }

    #[test]
    fn test_extract_description_absent_for_empty_text() {
        assert_eq!(extract_description(""), None);
        assert_eq!(extract_description("---\ntitle: x\n---\n```\ncode only\n```"), None);
        assert_eq!(extract_description("<div></div>"), None);
    }

    #[test]
    fn test_reading_time_zero_for_empty() {
        assert_eq!(estimate_reading_time(""), 0);
        assert_eq!(estimate_reading_time("```\nlots of code here\n```"), 0);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(estimate_reading_time("hello"), 1);
        assert_eq!(estimate_reading_time(&"word ".repeat(200)), 1);
        assert_eq!(estimate_reading_time(&"word ".repeat(201)), 2);
        assert_eq!(estimate_reading_time(&"字".repeat(400)), 2);
        assert_eq!(estimate_reading_time(&"字".repeat(401)), 3);
    }

    #[test]
    fn test_reading_time_mixes_cjk_and_words() {
        let source = format!("{} {}", "中".repeat(150), "go ".repeat(51));
        assert_eq!(estimate_reading_time(&source), 2);
    }

    #[test]
    fn test_reading_time_monotonic() {
        let mut last = 0;
        for n in 0..600 {
            let minutes = estimate_reading_time(&"学 a ".repeat(n));
            assert!(minutes >= last);
            last = minutes;
        }
    }

    #[test]
    fn test_counting_rules() {
        assert_eq!(count_cjk("Rust语言 is 好"), 3);
        assert_eq!(count_latin_words("Rust语言 is 好 123 -- v2"), 3);
    }

    #[test]
    fn test_derive_combines_both() {
        let derived = derive("---\ndescription: authored\n---\nHello world");
        assert_eq!(derived.description.as_deref(), Some("Hello world"));
        assert_eq!(derived.reading_time_minutes, 1);
    }
}
