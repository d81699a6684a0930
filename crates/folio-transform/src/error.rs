//! Error types for entry transformation.

use folio_cms::CmsError;

/// Error transforming a single entry.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Blog post without a linked SEO entry.
    #[error("entry {entry_id}: blog post requires a linked SEO entry")]
    SeoMissing {
        /// Blog post entry ID.
        entry_id: String,
    },

    /// Linked SEO entry lacks required fields.
    #[error("entry {entry_id}: SEO entry {seo_id} missing fields: {}", .fields.join(", "))]
    SeoIncomplete {
        /// Blog post entry ID.
        entry_id: String,
        /// SEO entry ID.
        seo_id: String,
        /// Blank required fields.
        fields: Vec<String>,
    },

    /// Content source error.
    #[error(transparent)]
    Cms(#[from] CmsError),
}
