//! Site configuration management for `sitemeta.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Site constants (title, author, url, language)    |
//! | `[build]`   | Source/output paths, article roots, date policy  |
//! | `[feed]`    | RSS feed path, size limit, ttl, categories       |
//! | `[robots]`  | robots.txt disallow list and named crawlers      |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Learn Web Dev"
//! description = "From zero to shipping"
//! url = "https://learn.example.com"
//!
//! [build]
//! content = "docs"
//! output = "docs/.vitepress/dist"
//!
//! [feed]
//! limit = 200
//! ```
//!
//! The configuration is built once per run and passed by reference into
//! every component. Nothing below this module reads the environment.

mod base;
mod build;
pub mod defaults;
mod error;
mod feed;
pub mod site_url;

pub use base::BaseConfig;
pub use build::{BuildConfig, PublishedFallback};
pub use error::ConfigError;
pub use feed::{FeedConfig, RobotsConfig};

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing sitemeta.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// RSS feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// robots.txt settings
    #[serde(default)]
    pub robots: RobotsConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load, apply CLI overrides, resolve the site URL and validate.
    ///
    /// A missing config file is not an error; defaults are used instead.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = Self::normalize_path(&config_path);
        config.update_with_cli(cli);
        config.resolve_site_url(cli.base_url.as_deref(), |name| env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf());
    }

    /// Markdown source root.
    pub fn content_dir(&self) -> &Path {
        &self.build.content
    }

    /// Directory generated artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = Self::normalize_path(&root);
        self.set_root(&root);

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));

        if cli.dev {
            self.build.production = false;
        }

        if let Commands::Build { feed, robots, .. } = &cli.command {
            Self::update_option(&mut self.feed.enable, feed.as_ref());
            Self::update_option(&mut self.robots.enable, robots.as_ref());
        }
    }

    /// Resolve `[base].url` through the CLI/env/config/default chain.
    pub fn resolve_site_url<F>(&mut self, cli_url: Option<&str>, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolved = site_url::resolve_site_url(cli_url, self.base.url.as_deref(), lookup);
        self.base.url = Some(resolved);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.base.title.trim().is_empty() {
            bail!(ConfigError::Validation("[base.title] must not be empty".into()));
        }

        if let Some(url) = &self.base.url
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.feed.limit == 0 {
            bail!(ConfigError::Validation("[feed.limit] must be positive".into()));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
