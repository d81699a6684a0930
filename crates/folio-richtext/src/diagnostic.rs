//! Diagnostics reported while converting rich text.
//!
//! The converter never fails; it reports each degraded construct to a
//! [`DiagnosticSink`] supplied at construction and keeps rendering.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A degraded or unsupported construct found during conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// Root is missing or is not a `document` node.
    InvalidDocument {
        /// What was wrong with the root.
        reason: String,
    },
    /// Node kind the converter does not recognize.
    UnknownNodeType(String),
    /// Mark type the converter does not recognize.
    UnknownMarkType(String),
    /// Child that is not a readable node. Rendered as nothing.
    MalformedNode(String),
    /// Embedded entry blocks are never expanded.
    EmbeddedEntryUnsupported,
    /// Embedded asset without a resolved target.
    EmbeddedAssetMissingTarget,
    /// Embedded asset whose fields could not be extracted.
    EmbeddedAssetMalformed(String),
    /// Hyperlink without a URI.
    HyperlinkMissingUri,
    /// Node nested deeper than the configured limit.
    DepthLimitExceeded(usize),
}

impl Diagnostic {
    /// Stable tag identifying the condition.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDocument { .. } => "INVALID_RICHTEXT",
            Self::UnknownNodeType(_) => "UNKNOWN_NODE_TYPE",
            Self::UnknownMarkType(_) => "UNKNOWN_MARK_TYPE",
            Self::MalformedNode(_) => "MALFORMED_NODE",
            Self::EmbeddedEntryUnsupported => "EMBEDDED_ENTRY_UNSUPPORTED",
            Self::EmbeddedAssetMissingTarget => "EMBEDDED_ASSET_MISSING_TARGET",
            Self::EmbeddedAssetMalformed(_) => "EMBEDDED_ASSET_PROCESSING_FAILED",
            Self::HyperlinkMissingUri => "HYPERLINK_MISSING_URI",
            Self::DepthLimitExceeded(_) => "DEPTH_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDocument { reason } => write!(f, "invalid rich-text document: {reason}"),
            Self::UnknownNodeType(kind) => {
                write!(f, "unknown node type '{kind}', rendering children")
            }
            Self::UnknownMarkType(kind) => {
                write!(f, "unknown mark type '{kind}', rendering as plain text")
            }
            Self::MalformedNode(reason) => write!(f, "skipping malformed node: {reason}"),
            Self::EmbeddedEntryUnsupported => f.write_str("skipping embedded entry block"),
            Self::EmbeddedAssetMissingTarget => f.write_str("embedded asset missing target"),
            Self::EmbeddedAssetMalformed(err) => {
                write!(f, "embedded asset processing failed: {err}")
            }
            Self::HyperlinkMissingUri => f.write_str("hyperlink missing uri"),
            Self::DepthLimitExceeded(limit) => {
                write!(f, "node nesting exceeds {limit} levels, skipping subtree")
            }
        }
    }
}

/// Receiver of conversion diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Record one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: Diagnostic) {
        self(diagnostic);
    }
}

/// Sink that emits one `tracing` warning per diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(code = diagnostic.code(), "{diagnostic}");
    }
}

/// Sink that keeps diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Codes of the collected diagnostics, in report order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.lock().iter().map(Diagnostic::code).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}
