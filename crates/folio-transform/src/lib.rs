//! Field transformers mapping CMS entries to site records.
//!
//! Each transformer handles one content type:
//!
//! - [`BlogPostTransformer`]: blog posts to [`Post`] (front matter + Markdown)
//! - [`ProfileTransformer`]: profile singleton to [`Profile`]
//! - [`HeaderTransformer`]: header singleton to [`Header`]
//! - [`FooterTransformer`]: footer singleton to [`Footer`]
//!
//! Records serialize with `serde`, omitting empty values, in field order.
//! Run them with [`transform_all`] or [`transform_singleton`], which isolate
//! per-entry failures into a [`TransformReport`].

mod blog;
mod error;
mod footer;
mod header;
mod links;
mod profile;
mod transformer;

pub use blog::{BlogPostTransformer, FrontMatter, POST_LAYOUT, Post};
pub use error::TransformError;
pub use footer::{Footer, FooterTransformer};
pub use header::{DEFAULT_BRAND_URL, Header, HeaderTransformer};
pub use links::{MenuItem, SocialLink};
pub use profile::{CtaButton, Profile, ProfileTransformer};
pub use transformer::{
    DEFAULT_INCLUDE, TransformContext, TransformReport, Transformer, transform_all,
    transform_singleton,
};
