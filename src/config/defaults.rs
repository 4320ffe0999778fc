//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn title() -> String {
        "Docs".into()
    }

    pub fn description() -> String {
        "Hands-on tutorials and reference notes.".into()
    }

    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn email() -> String {
        "user@noreply.sitemeta".into()
    }

    pub fn language() -> String {
        "zh-CN".into()
    }

    pub fn image() -> String {
        "/logo.png".into()
    }

    pub fn home_label() -> String {
        "Home".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "docs".into()
    }

    pub fn output() -> PathBuf {
        "docs/.vitepress/dist".into()
    }

    pub fn article_roots() -> Vec<String> {
        vec!["Basic".into(), "Advanced".into(), "Practice".into()]
    }

    pub fn error_page() -> String {
        "404.md".into()
    }
}

// ============================================================================
// [feed] Section Defaults
// ============================================================================

pub mod feed {
    use std::{collections::BTreeMap, path::PathBuf};

    pub fn path() -> PathBuf {
        "rss.xml".into()
    }

    pub fn limit() -> usize {
        200
    }

    pub fn ttl() -> u32 {
        60
    }

    pub fn categories() -> BTreeMap<String, String> {
        [
            ("Basic", "Basics"),
            ("Advanced", "Advanced"),
            ("Practice", "Practice"),
        ]
        .into_iter()
        .map(|(prefix, label)| (prefix.to_owned(), label.to_owned()))
        .collect()
    }
}

// ============================================================================
// [robots] Section Defaults
// ============================================================================

pub mod robots {
    use std::path::PathBuf;

    pub fn path() -> PathBuf {
        "robots.txt".into()
    }

    pub fn disallow() -> Vec<String> {
        vec![
            "/.vitepress/cache/".into(),
            "/node_modules/".into(),
            "/search?q=".into(),
        ]
    }

    pub fn crawlers() -> Vec<String> {
        vec!["Googlebot".into(), "Bingbot".into(), "Baiduspider".into()]
    }

    pub fn sitemap() -> String {
        "sitemap.xml".into()
    }
}
