//! End-of-build artifacts: the RSS feed and robots.txt.

pub mod robots;
pub mod rss;

pub use robots::{robots_txt, write_robots};
pub use rss::{Diagnostic, FeedEntry, FeedReport, PageOutcome, RssFeed};
