//! Profile transformer (singleton data file).

use folio_cms::Entry;
use serde::Serialize;

use crate::error::TransformError;
use crate::links::{SocialLink, is_external, social_links};
use crate::transformer::{TransformContext, Transformer};

/// Site owner profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<SocialLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_button: Option<CtaButton>,
}

/// Call-to-action button.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CtaButton {
    pub text: String,
    pub url: String,
    pub external: bool,
}

/// Transforms the profile entry.
#[derive(Debug)]
pub struct ProfileTransformer {
    content_type: String,
}

impl ProfileTransformer {
    #[must_use]
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }
}

impl Default for ProfileTransformer {
    fn default() -> Self {
        Self::new("profile")
    }
}

impl Transformer for ProfileTransformer {
    type Output = Profile;

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn transform(
        &self,
        entry: &Entry,
        _ctx: &TransformContext<'_>,
    ) -> Result<Profile, TransformError> {
        let text = |name: &str| entry.text(name).map(str::to_owned);

        let cta_button = match (entry.text("ctaLabel"), entry.text("ctaUrl")) {
            (Some(label), Some(url)) => Some(CtaButton {
                text: label.to_owned(),
                url: url.to_owned(),
                external: is_external(url),
            }),
            _ => None,
        };

        Ok(Profile {
            name: text("fullName"),
            title: text("title"),
            bio: text("bio"),
            email: text("email"),
            photo_url: entry.asset_url("profileImage"),
            social_links: social_links(&entry.references("socialLinks")),
            cta_button,
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

    fn profile() -> Entry {
        let github = Entry::new("s1", "socialLink")
            .with_field("platform", json!("github"))
            .with_field("url", json!("https://github.com/ada"));
        Entry::new("me", "profile")
            .with_field("fullName", json!("Ada Lovelace"))
            .with_field("title", json!("Engineer"))
            .with_field("bio", json!("Writes programs."))
            .with_field("email", json!("ada@example.com"))
            .with_field(
                "profileImage",
                json!({"sys": {"type": "Asset", "id": "p"}, "fields": {"file": {"url": "//cdn/ada.jpg"}}}),
            )
            .with_field("socialLinks", json!([github.to_value()]))
            .with_field("ctaLabel", json!("Contact"))
            .with_field("ctaUrl", json!("/contact"))
    }

    #[test]
    fn test_transform_profile() {
        let source = MockSource::new().with_entry("es", profile());
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "es", &converter);

        let report = transform_singleton(&ProfileTransformer::default(), &ctx);
        let profile = &report.records[0];

        assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.photo_url.as_deref(), Some("https://cdn/ada.jpg"));
        assert_eq!(profile.social_links.len(), 1);
        assert_eq!(
            profile.cta_button,
            Some(CtaButton {
                text: "Contact".to_owned(),
                url: "/contact".to_owned(),
                external: false,
            })
        );
    }

    #[test]
    fn test_cta_requires_label_and_url() {
        let source = MockSource::new();
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "en", &converter);
        let entry = Entry::new("me", "profile").with_field("ctaUrl", json!("https://x.dev"));

        let profile = ProfileTransformer::default()
            .transform(&entry, &ctx)
            .unwrap();

        assert_eq!(profile, Profile::default());
        assert_eq!(serde_yaml::to_string(&profile).unwrap(), "{}\n");
    }

    #[test]
    fn test_profile_yaml_key_order() {
        let source = MockSource::new();
        let converter = RichTextConverter::new();
        let ctx = TransformContext::new(&source, "en", &converter);

        let profile = ProfileTransformer::default()
            .transform(&profile(), &ctx)
            .unwrap();
        let yaml = serde_yaml::to_string(&profile).unwrap();

        assert_eq!(
            yaml,
            "name: Ada Lovelace\n\
             title: Engineer\n\
             bio: Writes programs.\n\
             email: ada@example.com\n\
             photo_url: https://cdn/ada.jpg\n\
             social_links:\n\
             - platform: github\n  url: https://github.com/ada\n\
             cta_button:\n  text: Contact\n  url: /contact\n  external: false\n"
        );
    }
}
