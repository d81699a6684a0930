//! Mock content source for testing.
//!
//! Provides [`MockSource`] for unit testing without network access.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::entry::Entry;
use crate::error::CmsError;
use crate::source::ContentSource;

/// Mock content source for testing.
///
/// Stores entries per locale in memory. Use the builder methods to
/// configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use folio_cms::{ContentSource, Entry, MockSource};
///
/// let source = MockSource::new()
///     .with_entry("en", Entry::new("p1", "profile"))
///     .with_failure("orHeader");
///
/// let profiles = source.entries("profile", "en", 2).unwrap();
/// assert!(source.entries("orHeader", "en", 2).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    entries: HashMap<String, Vec<Entry>>,
    failures: HashSet<String>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry served for `locale`.
    #[must_use]
    pub fn with_entry(mut self, locale: impl Into<String>, entry: Entry) -> Self {
        self.entries.entry(locale.into()).or_default().push(entry);
        self
    }

    /// Make every request for `content_type` fail.
    #[must_use]
    pub fn with_failure(mut self, content_type: impl Into<String>) -> Self {
        self.failures.insert(content_type.into());
        self
    }

    /// Number of `entries`/`entry` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn locale_entries(&self, locale: &str) -> impl Iterator<Item = &Entry> {
        self.entries.get(locale).into_iter().flatten()
    }
}

impl ContentSource for MockSource {
    fn entries(
        &self,
        content_type: &str,
        locale: &str,
        _include: u32,
    ) -> Result<Vec<Entry>, CmsError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.failures.contains(content_type) {
            return Err(CmsError::HttpResponse {
                status: 503,
                body: format!("mock failure for {content_type}"),
            });
        }
        Ok(self
            .locale_entries(locale)
            .filter(|entry| entry.content_type == content_type)
            .cloned()
            .collect())
    }

    fn entry(&self, id: &str, locale: &str) -> Result<Option<Entry>, CmsError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.locale_entries(locale).find(|entry| entry.id == id).cloned())
    }
}
