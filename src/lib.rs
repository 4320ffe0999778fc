//! sitemeta - build-time metadata for Markdown documentation sites.
//!
//! Derives page descriptions and reading times, assembles per-page SEO head
//! tags with a JSON-LD graph, and writes `rss.xml` and `robots.txt` once the
//! whole page set is known.

pub mod build;
pub mod cli;
pub mod config;
pub mod generator;
pub mod head;
pub mod hooks;
pub mod logger;
pub mod site;
pub mod text;
pub mod utils;
