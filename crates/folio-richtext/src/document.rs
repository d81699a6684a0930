//! Rich-text document model.
//!
//! The CMS delivers rich text as a JSON tree where every node carries a
//! `nodeType` discriminant. [`Node`] closes that open set over the kinds the
//! converter understands and keeps everything else in [`Node::Unknown`], so
//! a newer payload still deserializes and renders its children.
//!
//! Parsing never fails below the root. Each child is read on its own and a
//! child that is not a node becomes [`Node::Malformed`].

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::asset::AssetTarget;

/// Discriminant of a well-formed document root.
pub const DOCUMENT_NODE_TYPE: &str = "document";

/// Rich-text document root.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Document {
    /// Root discriminant, `"document"` on well-formed input.
    #[serde(rename = "nodeType", default)]
    pub node_type: Option<String>,
    /// Top-level block nodes.
    #[serde(default, deserialize_with = "lenient_children")]
    pub content: Vec<Node>,
}

impl Document {
    /// Create a well-formed document from top-level nodes.
    #[must_use]
    pub fn new(content: Vec<Node>) -> Self {
        Self {
            node_type: Some(DOCUMENT_NODE_TYPE.to_owned()),
            content,
        }
    }

    /// Whether the root discriminant marks this value as a document.
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.node_type.as_deref() == Some(DOCUMENT_NODE_TYPE)
    }
}

/// One node of the rich-text tree.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Node {
    /// Inline text with style marks.
    Text(Text),
    /// `paragraph`.
    Paragraph(Vec<Node>),
    /// `heading-1` through `heading-6`.
    Heading {
        /// Heading level, 1 to 6.
        level: u8,
        /// Inline children.
        content: Vec<Node>,
    },
    /// `unordered-list`.
    UnorderedList(Vec<Node>),
    /// `ordered-list`.
    OrderedList(Vec<Node>),
    /// `list-item`.
    ListItem(Vec<Node>),
    /// `blockquote`.
    Blockquote(Vec<Node>),
    /// `hr`.
    HorizontalRule,
    /// `hyperlink` with its `data.uri`.
    Hyperlink {
        /// Link target, `None` when the payload carries no string URI.
        uri: Option<String>,
        /// Inline children forming the link text.
        content: Vec<Node>,
    },
    /// `embedded-asset-block` with its `data.target`.
    EmbeddedAsset(AssetTarget),
    /// `embedded-entry-block`. Never expanded.
    EmbeddedEntry,
    /// Any other `nodeType`, kept with its children.
    Unknown {
        /// The unrecognized discriminant.
        node_type: String,
        /// Children, possibly empty.
        content: Vec<Node>,
    },
    /// A child that is not a readable node (null, a bare string, a text
    /// node with a structured value). Carries what was wrong.
    Malformed(String),
}

impl Node {
    /// Plain text node without marks.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::styled(value, Vec::new())
    }

    /// Text node with marks applied in order.
    #[must_use]
    pub fn styled(value: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text(Text {
            value: value.into(),
            marks,
        })
    }

    /// Paragraph node.
    #[must_use]
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::Paragraph(content)
    }
}

/// Text node payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    /// Literal text.
    pub value: String,
    /// Marks in application order.
    pub marks: Vec<Mark>,
}

/// Inline style mark.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum Mark {
    Bold,
    Italic,
    Code,
    Underline,
    /// Unrecognized mark type, rendered without decoration.
    Unknown(String),
}

impl Mark {
    /// Map a wire mark type to a [`Mark`].
    #[must_use]
    pub fn from_type(mark_type: &str) -> Self {
        match mark_type {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "code" => Self::Code,
            "underline" => Self::Underline,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl From<Value> for Mark {
    fn from(raw: Value) -> Self {
        match raw.get("type").and_then(Value::as_str) {
            Some(mark_type) => Self::from_type(mark_type),
            None => Self::Unknown(raw.to_string()),
        }
    }
}

impl From<Value> for Node {
    fn from(raw: Value) -> Self {
        Self::from_value(&raw)
    }
}

impl Node {
    /// Build a node from its wire form.
    ///
    /// Total: a shape that cannot be read becomes [`Node::Malformed`] and
    /// leaves its siblings untouched. `content`, `data` and `marks` of an
    /// unexpected type are treated as absent.
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            return Self::Malformed(format!("expected node object, found {}", kind_of(raw)));
        };
        let node_type = object
            .get("nodeType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let content = || children(object.get("content"));

        match node_type {
            "text" => match text_value(object.get("value")) {
                Some(value) => Self::Text(Text {
                    value,
                    marks: marks(object.get("marks")),
                }),
                None => Self::Malformed("text value is not a scalar".to_owned()),
            },
            "paragraph" => Self::Paragraph(content()),
            "unordered-list" => Self::UnorderedList(content()),
            "ordered-list" => Self::OrderedList(content()),
            "list-item" => Self::ListItem(content()),
            "blockquote" => Self::Blockquote(content()),
            "hr" => Self::HorizontalRule,
            "hyperlink" => Self::Hyperlink {
                uri: data_field(object, "uri").and_then(Value::as_str).map(str::to_owned),
                content: content(),
            },
            "embedded-asset-block" => {
                let target = data_field(object, "target").cloned();
                Self::EmbeddedAsset(AssetTarget::from_target(target))
            }
            "embedded-entry-block" => Self::EmbeddedEntry,
            other => match heading_level(other) {
                Some(level) => Self::Heading {
                    level,
                    content: content(),
                },
                None => Self::Unknown {
                    node_type: other.to_owned(),
                    content: content(),
                },
            },
        }
    }
}

/// Entry of a node's `data` map; `data` of any other type holds nothing.
fn data_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get("data")?.get(key)
}

/// Child nodes of a `content` value; anything but an array has none.
fn children(content: Option<&Value>) -> Vec<Node> {
    content
        .and_then(Value::as_array)
        .map(|items| items.iter().map(Node::from_value).collect())
        .unwrap_or_default()
}

fn marks(marks: Option<&Value>) -> Vec<Mark> {
    marks
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(Mark::from).collect())
        .unwrap_or_default()
}

/// Literal of a text node. Numbers and booleans are printed, a missing or
/// null value is empty.
fn text_value(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(text)) => Some(text.clone()),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Some(scalar.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    let content = Option::<Value>::deserialize(deserializer)?;
    Ok(children(content.as_ref()))
}

/// Level of a `heading-1` through `heading-6` node type.
fn heading_level(node_type: &str) -> Option<u8> {
    match node_type {
        "heading-1" => Some(1),
        "heading-2" => Some(2),
        "heading-3" => Some(3),
        "heading-4" => Some(4),
        "heading-5" => Some(5),
        "heading-6" => Some(6),
        _ => None,
    }
}
