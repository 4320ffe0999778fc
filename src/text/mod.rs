//! Plain-text extraction from Markdown pages.
//!
//! - [`frontmatter`]: the leading `---` metadata block
//! - [`normalize`]: Markdown syntax stripping and truncation
//! - [`derive`]: description and reading-time estimates

pub mod derive;
pub mod frontmatter;
pub mod normalize;

pub use derive::{DerivedMetadata, derive, estimate_reading_time, extract_description};
pub use frontmatter::Frontmatter;
pub use normalize::{normalize, truncate};
