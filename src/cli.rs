//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sitemeta: page metadata, rss and robots.txt for markdown documentation sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Markdown content directory (relative to project root)
    #[arg(short, long, global = true)]
    pub content: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Config file name (default: sitemeta.toml)
    #[arg(short = 'C', long, default_value = "sitemeta.toml", global = true)]
    pub config: PathBuf,

    /// Override the public base URL.
    ///
    /// Takes precedence over SITE_URL-style environment variables and `[base].url`.
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Development build: skip per-page description and reading-time derivation
    #[arg(long, global = true)]
    pub dev: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write rss.xml and robots.txt into the output directory
    Build {
        /// Also write head-manifest.json with every page's head tags
        #[arg(long)]
        head_manifest: bool,

        /// enable rss feed generation
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        feed: Option<bool>,

        /// enable robots.txt generation
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        robots: Option<bool>,
    },

    /// Print derived metadata and head tags for a single page
    Inspect {
        /// Page path relative to the content directory, e.g. `Basic/01-awakening.md`
        page: String,

        /// Print the head tags as json instead of html
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["sitemeta", "build", "--head-manifest", "--feed", "false"]);
        assert!(cli.is_build());
        match cli.command {
            Commands::Build {
                head_manifest,
                feed,
                robots,
            } => {
                assert!(head_manifest);
                assert_eq!(feed, Some(false));
                assert_eq!(robots, None);
            }
            Commands::Inspect { .. } => panic!("expected build"),
        }
        assert_eq!(cli.config, PathBuf::from("sitemeta.toml"));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "sitemeta",
            "inspect",
            "Basic/01-awakening.md",
            "--base-url",
            "https://a.dev",
            "--dev",
        ]);
        assert!(!cli.is_build());
        assert!(cli.dev);
        assert_eq!(cli.base_url.as_deref(), Some("https://a.dev"));
    }
}
