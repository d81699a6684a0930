//! Content entries with typed field access.
//!
//! Entries are requested for a single locale, so field values arrive
//! already localized. Reference fields hold either resolved records
//! (`{"sys": {...}, "fields": {...}}`) or unresolved link objects.

use serde_json::{Map, Value, json};

use folio_richtext::normalize_asset_url;

use crate::error::CmsError;

/// A content entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entry {
    /// Entry identifier (`sys.id`).
    pub id: String,
    /// Content type identifier (`sys.contentType.sys.id`).
    pub content_type: String,
    /// Field values keyed by field name.
    pub fields: Map<String, Value>,
}

impl Entry {
    /// Create an entry without fields.
    #[must_use]
    pub fn new(id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
            fields: Map::new(),
        }
    }

    /// Set a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Build an entry from an API record.
    ///
    /// Returns `None` for link objects, assets and records without an id.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let sys = value.get("sys")?;
        match sys.get("type").and_then(Value::as_str) {
            Some("Entry") | None => {}
            Some(_) => return None,
        }
        let id = sys.get("id")?.as_str()?;
        let fields = value.get("fields")?.as_object()?;
        let content_type = sys
            .pointer("/contentType/sys/id")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Some(Self {
            id: id.to_owned(),
            content_type: content_type.to_owned(),
            fields: fields.clone(),
        })
    }

    /// Render the entry as an API record, as embedded in reference fields.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "sys": {
                "type": "Entry",
                "id": self.id,
                "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": self.content_type}},
            },
            "fields": self.fields,
        })
    }

    /// Raw field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Non-empty string field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name)?.as_str().filter(|s| !s.is_empty())
    }

    /// Boolean field.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.field(name)?.as_bool()
    }

    /// Non-empty strings of a list field.
    #[must_use]
    pub fn strings(&self, name: &str) -> Vec<String> {
        self.field(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolved entry referenced by a single-reference field.
    #[must_use]
    pub fn reference(&self, name: &str) -> Option<Self> {
        Self::from_value(self.field(name)?)
    }

    /// Resolved entries of a multi-reference field, skipping unresolved links.
    #[must_use]
    pub fn references(&self, name: &str) -> Vec<Self> {
        self.field(name)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }

    /// URL of a linked asset, normalized to https.
    #[must_use]
    pub fn asset_url(&self, name: &str) -> Option<String> {
        self.field(name)?
            .pointer("/fields/file/url")?
            .as_str()
            .filter(|url| !url.is_empty())
            .map(|url| normalize_asset_url(url).into_owned())
    }

    /// Rich-text document field.
    #[must_use]
    pub fn rich_text(&self, name: &str) -> Option<&Value> {
        self.field(name).filter(|value| value.is_object())
    }

    /// Check that every named field is present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::MissingFields`] listing every blank field.
    pub fn require(&self, names: &[&str]) -> Result<(), CmsError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.field(name).is_none_or(is_blank))
            .map(|name| (*name).to_owned())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CmsError::MissingFields {
                entry_id: self.id.clone(),
                fields: missing,
            })
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
