//! Terminal logging with colored module prefixes.
//!
//! # Example
//!
//! ```ignore
//! log!("rss"; "{} entries written", count);
//! log!("warn"; "skipped {}: {}", path, reason);
//! ```
//!
//! Messages for the `warn` and `error` modules go to stderr, everything else
//! goes to stdout.

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stderr, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Calculate total prefix length for a module name.
///
/// Returns: `module.len() + 3` (for `[`, `]`, and trailing space)
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
///
/// Single-line messages are truncated to fit the terminal width.
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    let width = get_terminal_width() as usize;

    let message = if message.contains('\n') {
        message
    } else {
        let max_msg_len = width.saturating_sub(calc_prefix_len(module.len()));
        truncate_str(message, max_msg_len)
    };

    if is_diagnostic(&module_lower) {
        let mut stderr = stderr().lock();
        writeln!(stderr, "{prefix} {message}").ok();
        stderr.flush().ok();
    } else {
        let mut stdout = stdout().lock();
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
        writeln!(stdout, "{prefix} {message}").ok();
        stdout.flush().ok();
    }
}

#[inline]
fn is_diagnostic(module_lower: &str) -> bool {
    matches!(module_lower, "warn" | "error")
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "rss" | "robots" => prefix.bright_blue().bold(),
        "head" => prefix.bright_green().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_prefix_len() {
        // "rss" -> "[rss] " = 3 + 2 + 1
        assert_eq!(calc_prefix_len(3), 6);
        assert_eq!(calc_prefix_len(0), 3);
    }

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "阅读" is 6 bytes, cutting at 4 falls back to the first char
        assert_eq!(truncate_str("阅读", 4), "阅");
        assert_eq!(truncate_str("a€b", 3), "a");
    }

    #[test]
    fn test_diagnostic_modules() {
        assert!(is_diagnostic("warn"));
        assert!(is_diagnostic("error"));
        assert!(!is_diagnostic("rss"));
    }
}
