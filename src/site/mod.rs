//! Site structure: content pages and the URLs they render to.

pub mod page;
pub mod url;

pub use page::{LoadedPage, PageDescriptor, PageError, PageSet, discover_pages, load_page};
pub use url::{BreadcrumbEntry, build_breadcrumbs, full_url, is_home, url_for_page};
