//! Blog post transformer.
//!
//! Maps `blogTemplate` entries to Markdown posts. Every post must link an
//! SEO entry carrying a title and description.

use folio_cms::Entry;
use serde::Serialize;

use crate::error::TransformError;
use crate::transformer::{TransformContext, Transformer};

/// Layout every post is rendered with.
pub const POST_LAYOUT: &str = "post-layout";

/// Fields a linked SEO entry must set.
const REQUIRED_SEO_FIELDS: [&str; 2] = ["title", "description"];

/// A blog post ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    pub front_matter: FrontMatter,
    /// Markdown body.
    pub body: String,
}

/// Post front matter. Keys serialize in declaration order; empty values
/// are omitted except `no_index`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrontMatter {
    pub layout: String,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publish date exactly as stored in the CMS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seo_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    pub no_index: bool,
}

/// Transforms blog post entries.
#[derive(Debug)]
pub struct BlogPostTransformer {
    content_type: String,
}

impl BlogPostTransformer {
    #[must_use]
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }

    /// Linked SEO entry, checked for required fields.
    fn seo(entry: &Entry) -> Result<Entry, TransformError> {
        let seo = entry
            .reference("seo")
            .ok_or_else(|| TransformError::SeoMissing {
                entry_id: entry.id.clone(),
            })?;

        let missing: Vec<String> = REQUIRED_SEO_FIELDS
            .iter()
            .filter(|field| seo.text(field).is_none())
            .map(|field| (*field).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(TransformError::SeoIncomplete {
                entry_id: entry.id.clone(),
                seo_id: seo.id,
                fields: missing,
            });
        }
        Ok(seo)
    }
}

impl Default for BlogPostTransformer {
    fn default() -> Self {
        Self::new("blogTemplate")
    }
}

impl Transformer for BlogPostTransformer {
    type Output = Post;

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn transform(&self, entry: &Entry, ctx: &TransformContext<'_>) -> Result<Post, TransformError> {
        let seo = Self::seo(entry)?;

        let text = |name: &str| entry.text(name).map(str::to_owned);
        let title = text("title");
        let excerpt = text("description");
        let featured_image = entry.asset_url("image");

        let body = entry
            .rich_text("text")
            .map(|document| ctx.converter.convert_value(document))
            .unwrap_or_default();

        let front_matter = FrontMatter {
            layout: POST_LAYOUT.to_owned(),
            locale: ctx.locale.to_owned(),
            slug: text("url"),
            category: text("label"),
            author: text("author"),
            publish_date: text("publishDate"),
            seo_title: seo.text("title").map(str::to_owned).or_else(|| title.clone()),
            seo_description: seo
                .text("description")
                .map(str::to_owned)
                .or_else(|| excerpt.clone()),
            seo_keywords: seo.strings("keywords"),
            og_image: seo.asset_url("ogImage").or_else(|| featured_image.clone()),
            canonical_url: seo.text("canonicalUrl").map(str::to_owned),
            no_index: seo.bool("noIndex").unwrap_or(false),
            title,
            excerpt,
            featured_image,
        };

        Ok(Post { front_matter, body })
    }
}
