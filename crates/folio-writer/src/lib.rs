//! Site file writers for folio.
//!
//! - [`PostWriter`] writes Markdown posts with YAML front matter to
//!   `_posts/{locale}/`
//! - [`DataWriter`] writes YAML data files to `_data/`

mod data;
mod error;
mod posts;

pub use data::DataWriter;
pub use error::WriteError;
pub use posts::{PostWriter, UNTITLED_SLUG, WriteSummary, date_prefix, sanitize_slug};
