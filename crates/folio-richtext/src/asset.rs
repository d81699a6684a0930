//! Asset records referenced by embedded-asset nodes.
//!
//! Asset fields arrive either as per-locale maps (`{"en": "Title"}`) or,
//! when the API already resolved the locale, as plain values. [`Localized`]
//! accepts both.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Alt text used when an asset has neither description nor title.
pub const DEFAULT_ALT_TEXT: &str = "Image";

/// Resolution state of an embedded asset's `data.target`.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetTarget {
    /// No target, or a link the API did not resolve.
    Missing,
    /// Target resolved to an asset record.
    Resolved(Asset),
    /// Target present but its fields have an unexpected shape.
    Malformed(String),
}

impl AssetTarget {
    /// Classify a raw `data.target` value.
    #[must_use]
    pub fn from_target(target: Option<Value>) -> Self {
        let Some(target) = target else {
            return Self::Missing;
        };
        if target.is_null() || is_unresolved_link(&target) {
            return Self::Missing;
        }
        match Asset::from_value(target) {
            Ok(asset) => Self::Resolved(asset),
            Err(err) => Self::Malformed(err.to_string()),
        }
    }
}

/// A link object (`{"sys": {"type": "Link", ...}}`) carrying no fields.
fn is_unresolved_link(value: &Value) -> bool {
    value.get("fields").is_none()
        && value.pointer("/sys/type").and_then(Value::as_str) == Some("Link")
}

/// Error extracting an asset record.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Asset fields do not match the expected shape.
    #[error("malformed asset fields: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Asset record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Asset {
    /// Localized asset fields.
    #[serde(default)]
    pub fields: AssetFields,
}

/// Fields of an asset record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AssetFields {
    #[serde(default)]
    pub title: Option<Localized<String>>,
    #[serde(default)]
    pub description: Option<Localized<String>>,
    #[serde(default)]
    pub file: Option<Localized<AssetFile>>,
}

/// File metadata of an asset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AssetFile {
    /// CDN URL, usually protocol-relative.
    #[serde(default)]
    pub url: Option<String>,
    /// MIME type.
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
    /// Original file name.
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,
}

/// A field value, either keyed by locale or already localized.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Localized<T> {
    PerLocale(BTreeMap<String, T>),
    Plain(T),
}

impl<T> Localized<T> {
    /// Value for `locale`, then `fallback`, then the only locale present.
    #[must_use]
    pub fn get(&self, locale: &str, fallback: &str) -> Option<&T> {
        match self {
            Self::Plain(value) => Some(value),
            Self::PerLocale(values) => values
                .get(locale)
                .or_else(|| values.get(fallback))
                .or_else(|| {
                    if values.len() == 1 {
                        values.values().next()
                    } else {
                        None
                    }
                }),
        }
    }
}

impl Asset {
    /// Extract an asset from a raw JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Shape`] if the fields do not match the asset shape.
    pub fn from_value(value: Value) -> Result<Self, AssetError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Non-empty title for the locale.
    #[must_use]
    pub fn title(&self, locale: &str, fallback: &str) -> Option<&str> {
        localized_text(self.fields.title.as_ref(), locale, fallback)
    }

    /// Non-empty description for the locale.
    #[must_use]
    pub fn description(&self, locale: &str, fallback: &str) -> Option<&str> {
        localized_text(self.fields.description.as_ref(), locale, fallback)
    }

    /// File URL for the locale, normalized to https.
    #[must_use]
    pub fn url(&self, locale: &str, fallback: &str) -> Option<String> {
        self.fields
            .file
            .as_ref()?
            .get(locale, fallback)?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| normalize_asset_url(url).into_owned())
    }

    /// Description, else title, else [`DEFAULT_ALT_TEXT`].
    #[must_use]
    pub fn alt_text(&self, locale: &str, fallback: &str) -> &str {
        self.description(locale, fallback)
            .or_else(|| self.title(locale, fallback))
            .unwrap_or(DEFAULT_ALT_TEXT)
    }
}

fn localized_text<'a>(
    field: Option<&'a Localized<String>>,
    locale: &str,
    fallback: &str,
) -> Option<&'a str> {
    field?
        .get(locale, fallback)
        .map(String::as_str)
        .filter(|text| !text.is_empty())
}

/// Prefix protocol-relative URLs with `https:`. Other URLs pass through.
#[must_use]
pub fn normalize_asset_url(url: &str) -> Cow<'_, str> {
    if url.starts_with("//") {
        Cow::Owned(format!("https:{url}"))
    } else {
        Cow::Borrowed(url)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_protocol_relative_url() {
        assert_eq!(
            normalize_asset_url("//images.ctfassets.net/a.jpg"),
            "https://images.ctfassets.net/a.jpg"
        );
    }

    #[test]
    fn test_normalize_leaves_other_schemes() {
        assert_eq!(normalize_asset_url("https://cdn/a.jpg"), "https://cdn/a.jpg");
        assert_eq!(normalize_asset_url("http://cdn/a.jpg"), "http://cdn/a.jpg");
        assert_eq!(normalize_asset_url("ftp://cdn/a.jpg"), "ftp://cdn/a.jpg");
        assert_eq!(normalize_asset_url("/local/a.jpg"), "/local/a.jpg");
    }

    #[test]
    fn test_localized_per_locale_lookup() {
        let field: Localized<String> =
            serde_json::from_value(json!({"en": "Hello", "es": "Hola"})).unwrap();

        assert_eq!(field.get("es", "en").map(String::as_str), Some("Hola"));
        assert_eq!(field.get("de", "en").map(String::as_str), Some("Hello"));
        assert_eq!(field.get("de", "fr"), None);
    }

    #[test]
    fn test_localized_single_locale_is_used() {
        let field: Localized<String> = serde_json::from_value(json!({"en-US": "Only"})).unwrap();
        assert_eq!(field.get("es", "en").map(String::as_str), Some("Only"));
    }

    #[test]
    fn test_localized_plain_value() {
        let field: Localized<AssetFile> =
            serde_json::from_value(json!({"url": "//cdn/x.png", "contentType": "image/png"}))
                .unwrap();

        let file = field.get("en", "en").unwrap();
        assert_eq!(file.url.as_deref(), Some("//cdn/x.png"));
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_asset_alt_text_prefers_description() {
        let asset = Asset::from_value(json!({
            "fields": {
                "title": {"en": "Title"},
                "description": {"en": "Description"},
                "file": {"en": {"url": "//cdn/x.png"}}
            }
        }))
        .unwrap();

        assert_eq!(asset.alt_text("en", "en"), "Description");
        assert_eq!(asset.url("en", "en").as_deref(), Some("https://cdn/x.png"));
    }

    #[test]
    fn test_asset_alt_text_falls_back_to_title_then_default() {
        let titled = Asset::from_value(json!({
            "fields": {"title": {"en": "Title"}, "description": {"en": ""}}
        }))
        .unwrap();
        assert_eq!(titled.alt_text("en", "en"), "Title");

        let bare = Asset::from_value(json!({"fields": {}})).unwrap();
        assert_eq!(bare.alt_text("en", "en"), DEFAULT_ALT_TEXT);
        assert_eq!(bare.url("en", "en"), None);
    }

    #[test]
    fn test_target_classification() {
        assert_eq!(AssetTarget::from_target(None), AssetTarget::Missing);
        assert_eq!(
            AssetTarget::from_target(Some(Value::Null)),
            AssetTarget::Missing
        );

        let link = json!({"sys": {"type": "Link", "linkType": "Asset", "id": "abc"}});
        assert_eq!(AssetTarget::from_target(Some(link)), AssetTarget::Missing);

        let malformed = json!({"fields": {"title": 42}});
        assert!(matches!(
            AssetTarget::from_target(Some(malformed)),
            AssetTarget::Malformed(_)
        ));

        let resolved = json!({"fields": {"title": {"en": "T"}}});
        assert!(matches!(
            AssetTarget::from_target(Some(resolved)),
            AssetTarget::Resolved(_)
        ));
    }
}
