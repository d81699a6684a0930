//! Content retrieval for folio.
//!
//! This crate provides a [`ContentSource`] trait over localized content
//! entries, decoupling the field transformers from the CMS transport.
//!
//! # Architecture
//!
//! - [`ContentSource`] trait with `entries()` and `entry()` methods
//! - [`ContentfulClient`] for the Delivery and Preview APIs, with a TTL
//!   request cache and link resolution
//! - [`Entry`] with typed field accessors
//! - `MockSource` for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use folio_cms::{ContentSource, ContentfulClient};
//! use folio_config::Config;
//!
//! let config = Config::load(None, None)?;
//! let client = ContentfulClient::from_config(config.require_contentful()?)?;
//! for entry in client.entries("blogTemplate", "en", 2)? {
//!     println!("{}: {:?}", entry.id, entry.text("title"));
//! }
//! ```

mod cache;
mod client;
mod entry;
mod error;
mod links;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use cache::CacheStats;
pub use client::{ContentfulClient, base_url_for};
pub use entry::Entry;
pub use error::CmsError;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use source::ContentSource;
