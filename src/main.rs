//! sitemeta - page metadata, rss and robots.txt for Markdown documentation sites.

use anyhow::Result;
use clap::Parser;
use sitemeta::{
    build::{build_site, inspect_page},
    cli::{Cli, Commands},
    config::SiteConfig,
    log,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { head_manifest, .. } => build_all(&config, *head_manifest),
        Commands::Inspect { page, json } => {
            println!("{}", inspect_page(&config, page, *json)?);
            Ok(())
        }
    }
}

/// Generate all artifacts and report skipped pages.
fn build_all(config: &SiteConfig, head_manifest: bool) -> Result<()> {
    let summary = build_site(config, head_manifest)?;

    let skipped = summary.feed.diagnostics.len();
    if skipped > 0 {
        log!("warn"; "{skipped} page(s) left out of the feed");
    }
    log!(
        "build";
        "done, output in {}",
        config.output_dir().display()
    );
    Ok(())
}
