//! Transformer trait and collection runners.
//!
//! A [`Transformer`] maps one entry of its content type to an output record.
//! [`transform_all`] applies it to every entry of a locale, and
//! [`transform_singleton`] to the first entry of a single-instance type.
//! Both log and count per-entry failures instead of aborting.

use folio_cms::{ContentSource, Entry};
use folio_richtext::RichTextConverter;
use tracing::{error, info, warn};

use crate::error::TransformError;

/// Default include depth for linked records.
pub const DEFAULT_INCLUDE: u32 = 2;

/// Inputs shared by all transformers of a locale.
pub struct TransformContext<'a> {
    /// Content source to fetch from.
    pub source: &'a dyn ContentSource,
    /// CMS locale code.
    pub locale: &'a str,
    /// Converter for rich-text fields.
    pub converter: &'a RichTextConverter,
}

impl<'a> TransformContext<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn ContentSource,
        locale: &'a str,
        converter: &'a RichTextConverter,
    ) -> Self {
        Self {
            source,
            locale,
            converter,
        }
    }
}

/// Maps entries of one content type to output records.
pub trait Transformer {
    /// Record produced per entry.
    type Output;

    /// Content type ID this transformer consumes.
    fn content_type(&self) -> &str;

    /// Depth to which linked records are resolved when fetching.
    fn include(&self) -> u32 {
        DEFAULT_INCLUDE
    }

    /// Transform a single entry.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the entry fails validation.
    fn transform(
        &self,
        entry: &Entry,
        ctx: &TransformContext<'_>,
    ) -> Result<Self::Output, TransformError>;
}

/// Outcome of transforming a collection.
#[derive(Debug)]
pub struct TransformReport<T> {
    /// Successfully transformed records.
    pub records: Vec<T>,
    /// Entries attempted.
    pub total: usize,
    /// Entries that failed to transform.
    pub failed: usize,
    /// The fetch itself failed; no entries were attempted.
    pub fetch_failed: bool,
}

impl<T> Default for TransformReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            failed: 0,
            fetch_failed: false,
        }
    }
}

impl<T> TransformReport<T> {
    fn fetch_failed() -> Self {
        Self {
            fetch_failed: true,
            ..Self::default()
        }
    }

    /// Number of successfully transformed records.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.records.len()
    }
}

fn fetch<X: Transformer + ?Sized>(
    transformer: &X,
    ctx: &TransformContext<'_>,
) -> Option<Vec<Entry>> {
    let content_type = transformer.content_type();
    match ctx
        .source
        .entries(content_type, ctx.locale, transformer.include())
    {
        Ok(entries) => Some(entries),
        Err(e) => {
            error!(content_type, locale = ctx.locale, error = %e, "Fetch failed");
            None
        }
    }
}

fn transform_one<X: Transformer + ?Sized>(
    transformer: &X,
    entry: &Entry,
    ctx: &TransformContext<'_>,
) -> Option<X::Output> {
    match transformer.transform(entry, ctx) {
        Ok(record) => {
            info!(entry_id = %entry.id, locale = ctx.locale, "Transformed entry");
            Some(record)
        }
        Err(e) => {
            error!(entry_id = %entry.id, locale = ctx.locale, error = %e, "Transform failed");
            None
        }
    }
}

/// Transform every entry of the transformer's content type.
pub fn transform_all<X: Transformer + ?Sized>(
    transformer: &X,
    ctx: &TransformContext<'_>,
) -> TransformReport<X::Output> {
    let content_type = transformer.content_type();
    info!(content_type, locale = ctx.locale, "Transforming collection");

    let Some(entries) = fetch(transformer, ctx) else {
        return TransformReport::fetch_failed();
    };

    let mut report = TransformReport {
        total: entries.len(),
        ..TransformReport::default()
    };
    for entry in &entries {
        match transform_one(transformer, entry, ctx) {
            Some(record) => report.records.push(record),
            None => report.failed += 1,
        }
    }

    info!(
        content_type,
        locale = ctx.locale,
        total = report.total,
        success = report.succeeded(),
        failed = report.failed,
        "Collection transformed"
    );
    report
}

/// Transform the single entry of a singleton content type.
///
/// No entries yields an empty report with a warning. When several exist,
/// the first is used.
pub fn transform_singleton<X: Transformer + ?Sized>(
    transformer: &X,
    ctx: &TransformContext<'_>,
) -> TransformReport<X::Output> {
    let content_type = transformer.content_type();
    info!(content_type, locale = ctx.locale, "Transforming singleton");

    let Some(entries) = fetch(transformer, ctx) else {
        return TransformReport::fetch_failed();
    };
    let Some(first) = entries.first() else {
        warn!(content_type, locale = ctx.locale, "No entry found");
        return TransformReport::default();
    };
    if entries.len() > 1 {
        warn!(
            content_type,
            count = entries.len(),
            "Multiple entries found, using the first"
        );
    }

    let mut report = TransformReport {
        total: 1,
        ..TransformReport::default()
    };
    match transform_one(transformer, first, ctx) {
        Some(record) => report.records.push(record),
        None => report.failed = 1,
    }
    report
}
