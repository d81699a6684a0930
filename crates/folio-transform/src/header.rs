//! Site header transformer (singleton data file).

use folio_cms::Entry;
use serde::Serialize;

use crate::error::TransformError;
use crate::links::{MenuItem, menu_items};
use crate::transformer::{TransformContext, Transformer};

/// Brand link target when the entry sets none.
pub const DEFAULT_BRAND_URL: &str = "/";

/// Site header navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Header {
    pub brand_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_logo_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub menu_items: Vec<MenuItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_links: Vec<MenuItem>,
}

/// Transforms the header entry.
#[derive(Debug)]
pub struct HeaderTransformer {
    content_type: String,
}

impl HeaderTransformer {
    #[must_use]
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }
}

impl Default for HeaderTransformer {
    fn default() -> Self {
        Self::new("orHeader")
    }
}

impl Transformer for HeaderTransformer {
    type Output = Header;

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn transform(
        &self,
        entry: &Entry,
        _ctx: &TransformContext<'_>,
    ) -> Result<Header, TransformError> {
        Ok(Header {
            brand_url: entry
                .text("brandUrl")
                .unwrap_or(DEFAULT_BRAND_URL)
                .to_owned(),
            brand_logo_url: entry.asset_url("brandImage"),
            menu_items: menu_items(&entry.references("menuItems")),
            top_links: menu_items(&entry.references("topLinks")),
        })
    }
}

#[cfg(test)]
mod tests {
    use folio_cms::MockSource;
    use folio_richtext::RichTextConverter;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::transformer::transform_singleton;

    fn link(id: &str, label: &str, url: &str) -> serde_json::Value {
        Entry::new(id, "menuItem")
            .with_field("label", json!(label))
            .with_field("url", json!(url))
            .to_value()
    }

    #[test]
    fn test_transform_header() {
        let header = Entry::new("h", "orHeader")
            .with_field("brandUrl", json!("/home"))
            .with_field(
                "brandImage",
                json!({"sys": {"type": "Asset", "id": "logo"}, "fields": {"file": {"url": "//cdn/logo.svg"}}}),
            )
            .with_field(
                "menuItems",
                json!([link("m1", "Blog", "/blog"), link("m1", "Blog", "/blog")]),
            )
            .with_field(
                "topLinks",
                json!([link("m1", "Blog", "/blog"), link("t2", "GitHub", "https://github.com")]),
            );
        let source = MockSource::new().with_entry("en", header);
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "en", &converter);

        let report = transform_singleton(&HeaderTransformer::default(), &ctx);
        let header = &report.records[0];

        assert_eq!(header.brand_url, "/home");
        assert_eq!(header.brand_logo_url.as_deref(), Some("https://cdn/logo.svg"));
        assert_eq!(header.menu_items.len(), 1);
        assert_eq!(header.top_links.len(), 2);
        assert!(header.top_links[1].external);
    }

    #[test]
    fn test_default_brand_url() {
        let source = MockSource::new();
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "en", &converter);

        let header = HeaderTransformer::default()
            .transform(&Entry::new("h", "orHeader"), &ctx)
            .unwrap();

        assert_eq!(serde_yaml::to_string(&header).unwrap(), "brand_url: /\n");
    }

    #[test]
    fn test_missing_header_yields_no_record() {
        let source = MockSource::new();
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "es", &converter);

        let report = transform_singleton(&HeaderTransformer::default(), &ctx);

        assert!(report.records.is_empty());
        assert_eq!(report.failed, 0);
    }
}
