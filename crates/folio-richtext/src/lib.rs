//! Rich-text to Markdown conversion for folio.
//!
//! The CMS stores formatted text as a JSON tree of typed nodes. This crate
//! deserializes that tree into a closed [`Node`] model and renders it to
//! Markdown with [`RichTextConverter`].
//!
//! # Example
//!
//! ```
//! use folio_richtext::RichTextConverter;
//!
//! # fn main() -> Result<(), serde_json::Error> {
//! let field: serde_json::Value = serde_json::from_str(r#"{
//!     "nodeType": "document",
//!     "content": [
//!         {"nodeType": "heading-2", "content": [{"nodeType": "text", "value": "Heading 2", "marks": []}]}
//!     ]
//! }"#)?;
//!
//! let markdown = RichTextConverter::new().convert_value(&field);
//! assert_eq!(markdown, "## Heading 2");
//! # Ok(())
//! # }
//! ```

mod asset;
mod converter;
mod diagnostic;
mod document;

pub use asset::{
    Asset, AssetError, AssetFields, AssetFile, AssetTarget, DEFAULT_ALT_TEXT, Localized,
    normalize_asset_url,
};
pub use converter::{DEFAULT_LOCALE, DEFAULT_MAX_DEPTH, RichTextConverter};
pub use diagnostic::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use document::{DOCUMENT_NODE_TYPE, Document, Mark, Node, Text};

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::RichTextConverter: Send, Sync);
    static_assertions::assert_impl_all!(super::Document: Send, Sync, Clone);
}
