//! Rich-text to Markdown conversion.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::asset::AssetTarget;
use crate::diagnostic::{Diagnostic, DiagnosticSink, TracingSink};
use crate::document::{Document, Mark, Node, Text};

/// Default locale used to read asset fields.
pub const DEFAULT_LOCALE: &str = "en";

/// Default limit on node nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Indentation added per list nesting level.
const LIST_INDENT: &str = "  ";

/// Separator between top-level blocks.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Converts rich-text documents to Markdown.
///
/// Conversion is a pure function of the input tree. Degraded constructs
/// (unknown node or mark kinds, missing asset targets, embedded entries)
/// are reported to the [`DiagnosticSink`] and rendered best-effort, so a
/// single bad node never hides its siblings.
///
/// # Example
///
/// ```
/// use folio_richtext::{Document, Mark, Node, RichTextConverter};
///
/// let document = Document::new(vec![Node::paragraph(vec![
///     Node::text("Hello "),
///     Node::styled("world", vec![Mark::Bold]),
/// ])]);
///
/// let markdown = RichTextConverter::new().convert(&document);
/// assert_eq!(markdown, "Hello **world**");
/// ```
pub struct RichTextConverter {
    sink: Arc<dyn DiagnosticSink>,
    locale: String,
    fallback_locale: String,
    max_depth: usize,
}

impl Default for RichTextConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of a node in the tree.
#[derive(Clone, Copy)]
struct Scope {
    /// List nesting, drives marker indentation.
    list_depth: usize,
    /// Node nesting, bounded by `max_depth`.
    nesting: usize,
}

impl Scope {
    const fn root() -> Self {
        Self {
            list_depth: 0,
            nesting: 1,
        }
    }

    const fn child(self) -> Self {
        Self {
            list_depth: self.list_depth,
            nesting: self.nesting + 1,
        }
    }

    const fn list_item(self) -> Self {
        Self {
            list_depth: self.list_depth + 1,
            nesting: self.nesting + 1,
        }
    }
}

#[derive(Clone, Copy)]
enum ListStyle {
    Bullet,
    Numbered,
}

impl RichTextConverter {
    /// Create a converter logging diagnostics through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            locale: DEFAULT_LOCALE.to_owned(),
            fallback_locale: DEFAULT_LOCALE.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Report diagnostics to `sink` instead of `tracing`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Read localized asset fields for `locale`.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Locale tried when a field has no value for the primary locale.
    #[must_use]
    pub fn with_fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = locale.into();
        self
    }

    /// Skip subtrees nested deeper than `max_depth` nodes.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Locale used for asset fields.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Convert a document to Markdown.
    ///
    /// Non-empty top-level blocks are joined by a blank line. A root that is
    /// not a `document` yields an empty string.
    pub fn convert(&self, document: &Document) -> String {
        if !document.is_document() {
            self.sink.report(Diagnostic::InvalidDocument {
                reason: match &document.node_type {
                    Some(kind) => format!("root node type is '{kind}'"),
                    None => "missing document node".to_owned(),
                },
            });
            return String::new();
        }

        let blocks: Vec<String> = document
            .content
            .iter()
            .map(|node| self.render_node(node, Scope::root()))
            .filter(|block| !block.is_empty())
            .collect();
        blocks.join(BLOCK_SEPARATOR)
    }

    /// Convert a raw rich-text field value to Markdown.
    ///
    /// Values that are not shaped like a document (including `null`) yield an
    /// empty string.
    pub fn convert_value(&self, value: &Value) -> String {
        match Document::deserialize(value) {
            Ok(document) => self.convert(&document),
            Err(err) => {
                self.sink.report(Diagnostic::InvalidDocument {
                    reason: err.to_string(),
                });
                String::new()
            }
        }
    }

    fn render_node(&self, node: &Node, scope: Scope) -> String {
        if scope.nesting > self.max_depth {
            self.sink
                .report(Diagnostic::DepthLimitExceeded(self.max_depth));
            return String::new();
        }

        match node {
            Node::Text(text) => self.render_text(text),
            Node::Paragraph(content) => self.render_inline(content, scope).trim().to_owned(),
            Node::Heading { level, content } => format!(
                "{} {}",
                "#".repeat(usize::from(*level)),
                self.render_inline(content, scope)
            ),
            Node::UnorderedList(items) => self.render_list(items, ListStyle::Bullet, scope),
            Node::OrderedList(items) => self.render_list(items, ListStyle::Numbered, scope),
            Node::ListItem(content) => content
                .iter()
                .map(|child| self.render_node(child, scope.child()))
                .collect::<Vec<_>>()
                .join("\n"),
            Node::Blockquote(content) => content
                .iter()
                .map(|child| self.render_node(child, scope.child()))
                .filter(|line| !line.is_empty())
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Node::HorizontalRule => "---".to_owned(),
            Node::Hyperlink { uri, content } => {
                let text = self.render_inline(content, scope);
                let uri = uri.as_deref().unwrap_or_else(|| {
                    self.sink.report(Diagnostic::HyperlinkMissingUri);
                    ""
                });
                format!("[{text}]({uri})")
            }
            Node::EmbeddedAsset(target) => self.render_asset(target),
            Node::EmbeddedEntry => {
                self.sink.report(Diagnostic::EmbeddedEntryUnsupported);
                String::new()
            }
            Node::Malformed(reason) => {
                self.sink.report(Diagnostic::MalformedNode(reason.clone()));
                String::new()
            }
            Node::Unknown { node_type, content } => {
                self.sink
                    .report(Diagnostic::UnknownNodeType(node_type.clone()));
                self.render_inline(content, scope)
            }
        }
    }

    /// Concatenate rendered children without separators.
    fn render_inline(&self, content: &[Node], scope: Scope) -> String {
        content
            .iter()
            .map(|child| self.render_node(child, scope.child()))
            .collect()
    }

    /// Apply marks in order, each wrapping the previous result.
    fn render_text(&self, text: &Text) -> String {
        text.marks
            .iter()
            .fold(text.value.clone(), |rendered, mark| match mark {
                Mark::Bold => format!("**{rendered}**"),
                Mark::Italic => format!("*{rendered}*"),
                Mark::Code => format!("`{rendered}`"),
                Mark::Underline => format!("<u>{rendered}</u>"),
                Mark::Unknown(kind) => {
                    self.sink.report(Diagnostic::UnknownMarkType(kind.clone()));
                    rendered
                }
            })
    }

    fn render_list(&self, items: &[Node], style: ListStyle, scope: Scope) -> String {
        let indent = LIST_INDENT.repeat(scope.list_depth);
        let mut lines: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            // Unreadable items get no marker, so numbering stays contiguous.
            if let Node::Malformed(reason) = item {
                self.sink.report(Diagnostic::MalformedNode(reason.clone()));
                continue;
            }
            let text = self.render_node(item, scope.list_item());
            let line = match style {
                ListStyle::Bullet => format!("{indent}- {text}"),
                ListStyle::Numbered => format!("{indent}{}. {text}", lines.len() + 1),
            };
            lines.push(line);
        }
        lines.join("\n")
    }

    fn render_asset(&self, target: &AssetTarget) -> String {
        match target {
            AssetTarget::Missing => {
                self.sink.report(Diagnostic::EmbeddedAssetMissingTarget);
                String::new()
            }
            AssetTarget::Malformed(err) => {
                self.sink
                    .report(Diagnostic::EmbeddedAssetMalformed(err.clone()));
                String::new()
            }
            AssetTarget::Resolved(asset) => {
                let alt = asset.alt_text(&self.locale, &self.fallback_locale);
                let url = asset
                    .url(&self.locale, &self.fallback_locale)
                    .unwrap_or_default();
                format!("![{alt}]({url})")
            }
        }
    }
}
