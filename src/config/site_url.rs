//! Public base URL resolution.
//!
//! First match wins: CLI `--base-url`, then the environment variables in
//! [`SITE_URL_ENV_VARS`] order, then `[base].url`, then [`DEFAULT_SITE_URL`].

/// Environment variables consulted for the site URL, in priority order.
pub const SITE_URL_ENV_VARS: &[&str] = &[
    "SITE_URL",
    "VITE_SITE_URL",
    "PUBLIC_SITE_URL",
    "DEPLOY_URL",
    "URL",
    "VERCEL_URL",
];

pub const DEFAULT_SITE_URL: &str = "https://docs.example.com";

/// Resolve the site URL.
///
/// `lookup` reads an environment variable; tests pass a closure over a map.
pub fn resolve_site_url<F>(cli: Option<&str>, configured: Option<&str>, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = || {
        SITE_URL_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
    };

    cli.map(str::to_owned)
        .filter(|url| !url.trim().is_empty())
        .or_else(from_env)
        .or_else(|| configured.map(str::to_owned).filter(|url| !url.trim().is_empty()))
        .map_or_else(|| DEFAULT_SITE_URL.to_owned(), |url| normalize_site_url(&url))
}

/// Trim whitespace and trailing slashes, prefix `https://` when no scheme.
pub fn normalize_site_url(raw: &str) -> String {
    let url = raw.trim().trim_end_matches('/');
    if url.contains("://") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}
