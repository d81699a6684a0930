//! Navigation and social link records shared by several transformers.

use std::collections::HashSet;

use folio_cms::Entry;
use serde::Serialize;
use tracing::warn;

/// Navigation link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub url: String,
    /// Whether the link leaves the site.
    pub external: bool,
}

/// Social profile link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Absolute `http`/`https` URLs point off-site.
pub(crate) fn is_external(url: &str) -> bool {
    url.starts_with("http")
}

/// Menu items from referenced entries with both `label` and `url`.
///
/// An entry ID seen earlier in the same list is skipped.
pub(crate) fn menu_items(entries: &[Entry]) -> Vec<MenuItem> {
    let mut visited = HashSet::new();
    let mut items = Vec::new();
    for entry in entries {
        if !visited.insert(entry.id.as_str()) {
            warn!(entry_id = %entry.id, "Circular reference detected, skipping");
            continue;
        }
        if let (Some(label), Some(url)) = (entry.text("label"), entry.text("url")) {
            items.push(MenuItem {
                label: label.to_owned(),
                url: url.to_owned(),
                external: is_external(url),
            });
        }
    }
    items
}

/// Social links from referenced entries with both `platform` and `url`.
pub(crate) fn social_links(entries: &[Entry]) -> Vec<SocialLink> {
    entries
        .iter()
        .filter_map(|entry| {
            Some(SocialLink {
                platform: entry.text("platform")?.to_owned(),
                url: entry.text("url")?.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn menu(id: &str, label: &str, url: &str) -> Entry {
        Entry::new(id, "menuItem")
            .with_field("label", json!(label))
            .with_field("url", json!(url))
    }

    #[test]
    fn test_menu_items_external_flag() {
        let items = menu_items(&[
            menu("1", "Blog", "/blog"),
            menu("2", "GitHub", "https://github.com"),
        ]);

        assert_eq!(
            items,
            vec![
                MenuItem {
                    label: "Blog".to_owned(),
                    url: "/blog".to_owned(),
                    external: false,
                },
                MenuItem {
                    label: "GitHub".to_owned(),
                    url: "https://github.com".to_owned(),
                    external: true,
                },
            ]
        );
    }

    #[test]
    fn test_menu_items_skip_duplicates_and_incomplete() {
        let items = menu_items(&[
            menu("1", "Blog", "/blog"),
            menu("1", "Blog again", "/blog"),
            menu("2", "", "/empty-label"),
        ]);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Blog");
    }

    #[test]
    fn test_social_links_require_both_fields() {
        let links = social_links(&[
            Entry::new("s1", "socialLink")
                .with_field("platform", json!("github"))
                .with_field("url", json!("https://github.com/me")),
            Entry::new("s2", "socialLink").with_field("platform", json!("x")),
        ]);

        assert_eq!(
            links,
            vec![SocialLink {
                platform: "github".to_owned(),
                url: "https://github.com/me".to_owned(),
            }]
        );
    }
}
