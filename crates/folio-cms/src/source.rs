use crate::entry::Entry;
use crate::error::CmsError;

/// Source of localized content entries.
///
/// Implemented by [`ContentfulClient`](crate::ContentfulClient) for the live
/// APIs and by `MockSource` (feature `mock`) for tests.
pub trait ContentSource: Send + Sync {
    /// Fetch all entries of a content type for a locale.
    ///
    /// # Arguments
    ///
    /// * `content_type` - Content type ID (e.g., "blogTemplate")
    /// * `locale` - CMS locale code (e.g., "en")
    /// * `include` - Depth to which linked records are resolved
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or the response is malformed.
    fn entries(
        &self,
        content_type: &str,
        locale: &str,
        include: u32,
    ) -> Result<Vec<Entry>, CmsError>;

    /// Fetch a single entry by ID.
    ///
    /// Returns `Ok(None)` if no entry has that ID.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError`] if the request fails or the response is malformed.
    fn entry(&self, id: &str, locale: &str) -> Result<Option<Entry>, CmsError>;
}
