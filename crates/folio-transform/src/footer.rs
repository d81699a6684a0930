//! Site footer transformer (singleton data file).

use folio_cms::Entry;
use serde::Serialize;

use crate::error::TransformError;
use crate::header::DEFAULT_BRAND_URL;
use crate::links::{MenuItem, SocialLink, menu_items, social_links};
use crate::transformer::{TransformContext, Transformer};

/// Site footer content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub brand_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub menu_items: Vec<MenuItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<SocialLink>,
}

/// Transforms the footer entry.
#[derive(Debug)]
pub struct FooterTransformer {
    content_type: String,
}

impl FooterTransformer {
    #[must_use]
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }
}

impl Default for FooterTransformer {
    fn default() -> Self {
        Self::new("orFooter")
    }
}

impl Transformer for FooterTransformer {
    type Output = Footer;

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn transform(
        &self,
        entry: &Entry,
        _ctx: &TransformContext<'_>,
    ) -> Result<Footer, TransformError> {
        Ok(Footer {
            brand_url: entry
                .text("brandUrl")
                .unwrap_or(DEFAULT_BRAND_URL)
                .to_owned(),
            brand_logo_url: entry.asset_url("brandImage"),
            description: entry.text("description").map(str::to_owned),
            copyright: entry.text("copyright").map(str::to_owned),
            menu_items: menu_items(&entry.references("menuItems")),
            social_links: social_links(&entry.references("socialLinks")),
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

    #[test]
    fn test_transform_footer() {
        let menu = Entry::new("m1", "menuItem")
            .with_field("label", json!("Privacy"))
            .with_field("url", json!("/privacy"));
        let social = Entry::new("s1", "socialLink")
            .with_field("platform", json!("linkedin"))
            .with_field("url", json!("https://linkedin.com/in/ada"));
        let footer = Entry::new("f", "orFooter")
            .with_field("description", json!("Notes on software."))
            .with_field("copyright", json!("© 2024 Ada"))
            .with_field("menuItems", json!([menu.to_value()]))
            .with_field(
                "socialLinks",
                json!([social.to_value(), {"sys": {"type": "Link", "linkType": "Entry", "id": "gone"}}]),
            );
        let source = MockSource::new()
            .with_entry("en", footer)
            .with_entry("en", Entry::new("f2", "orFooter"));
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "en", &converter);

        let report = transform_singleton(&FooterTransformer::default(), &ctx);

        assert_eq!(report.total, 1);
        let footer = &report.records[0];
        assert_eq!(footer.brand_url, "/");
        assert_eq!(footer.copyright.as_deref(), Some("© 2024 Ada"));
        assert_eq!(footer.menu_items[0].label, "Privacy");
        assert_eq!(
            footer.social_links,
            vec![SocialLink {
                platform: "linkedin".to_owned(),
                url: "https://linkedin.com/in/ada".to_owned(),
            }]
        );
    }

    #[test]
    fn test_fetch_failure_reported() {
        let source = MockSource::new().with_failure("orFooter");
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "en", &converter);

        let report = transform_singleton(&FooterTransformer::default(), &ctx);

        assert!(report.fetch_failed);
        assert!(report.records.is_empty());
    }
}
