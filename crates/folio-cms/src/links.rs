//! Link resolution for entry collections.
//!
//! The Delivery API returns referenced records once, in an `includes`
//! section, and leaves `{"sys": {"type": "Link", ...}}` objects in place of
//! them inside entry fields. [`resolve_items`] replaces those link objects
//! with the records they point to.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::entry::Entry;

/// Entry collection response body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EntriesResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub includes: Includes,
}

/// Linked records returned alongside a collection.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Includes {
    #[serde(rename = "Entry", default)]
    pub entries: Vec<Value>,
    #[serde(rename = "Asset", default)]
    pub assets: Vec<Value>,
}

/// Records addressable by link type and id.
struct LinkIndex<'a> {
    entries: HashMap<&'a str, &'a Value>,
    assets: HashMap<&'a str, &'a Value>,
}

impl<'a> LinkIndex<'a> {
    fn new(response: &'a EntriesResponse) -> Self {
        let entries = response
            .items
            .iter()
            .chain(&response.includes.entries)
            .filter_map(|record| Some((record_id(record)?, record)))
            .collect();
        let assets = response
            .includes
            .assets
            .iter()
            .filter_map(|record| Some((record_id(record)?, record)))
            .collect();
        Self { entries, assets }
    }

    fn get(&self, link_type: &str, id: &str) -> Option<&'a Value> {
        match link_type {
            "Entry" => self.entries.get(id).copied(),
            "Asset" => self.assets.get(id).copied(),
            _ => None,
        }
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.pointer("/sys/id")?.as_str()
}

/// Link type and id of a link object.
fn as_link(value: &Value) -> Option<(&str, &str)> {
    let sys = value.get("sys")?;
    if sys.get("type")?.as_str()? != "Link" {
        return None;
    }
    Some((sys.get("linkType")?.as_str()?, sys.get("id")?.as_str()?))
}

/// Convert response items to entries with links resolved up to `depth` levels.
///
/// A link whose target is already on the current resolution path is left
/// unresolved, so reference cycles terminate. Links to records absent from
/// the response stay as link objects.
pub(crate) fn resolve_items(response: &EntriesResponse, depth: u32) -> Vec<Entry> {
    let index = LinkIndex::new(response);
    response
        .items
        .iter()
        .filter_map(|item| {
            let mut path = Vec::new();
            if let Some(id) = record_id(item) {
                path.push(id.to_owned());
            }
            let resolved = resolve_record(item, &index, depth, &mut path);
            Entry::from_value(&resolved)
        })
        .collect()
}

/// Resolve links inside a record's fields, keeping `sys` untouched.
fn resolve_record(
    record: &Value,
    index: &LinkIndex<'_>,
    depth: u32,
    path: &mut Vec<String>,
) -> Value {
    let Value::Object(map) = record else {
        return record.clone();
    };
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        let value = if key == "sys" {
            value.clone()
        } else {
            resolve_value(value, index, depth, path)
        };
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}

fn resolve_value(
    value: &Value,
    index: &LinkIndex<'_>,
    depth: u32,
    path: &mut Vec<String>,
) -> Value {
    if let Some((link_type, id)) = as_link(value) {
        if depth == 0 || path.iter().any(|seen| seen == id) {
            return value.clone();
        }
        let Some(target) = index.get(link_type, id) else {
            return value.clone();
        };
        path.push(id.to_owned());
        let resolved = resolve_record(target, index, depth - 1, path);
        path.pop();
        return resolved;
    }

    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| resolve_value(item, index, depth, path))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), resolve_value(item, index, depth, path)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn link(link_type: &str, id: &str) -> Value {
        json!({"sys": {"type": "Link", "linkType": link_type, "id": id}})
    }

    fn record(id: &str, content_type: &str, fields: Value) -> Value {
        json!({
            "sys": {"type": "Entry", "id": id, "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": content_type}}},
            "fields": fields
        })
    }

    fn response(body: Value) -> EntriesResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_resolves_entry_and_asset_links() {
        let body = response(json!({
            "items": [record("post", "blogTemplate", json!({
                "seo": link("Entry", "seo-1"),
                "image": link("Asset", "img")
            }))],
            "includes": {
                "Entry": [record("seo-1", "seo", json!({"title": "SEO"}))],
                "Asset": [{"sys": {"type": "Asset", "id": "img"}, "fields": {"file": {"url": "//cdn/a.png"}}}]
            }
        }));

        let entries = resolve_items(&body, 2);

        assert_eq!(entries.len(), 1);
        let post = &entries[0];
        assert_eq!(post.content_type, "blogTemplate");
        assert_eq!(post.reference("seo").unwrap().text("title"), Some("SEO"));
        assert_eq!(post.asset_url("image").as_deref(), Some("https://cdn/a.png"));
    }

    #[test]
    fn test_resolves_links_inside_rich_text() {
        let body = response(json!({
            "items": [record("post", "blogTemplate", json!({
                "text": {"nodeType": "document", "content": [
                    {"nodeType": "embedded-asset-block", "content": [], "data": {"target": link("Asset", "img")}}
                ]}
            }))],
            "includes": {
                "Asset": [{"sys": {"type": "Asset", "id": "img"}, "fields": {"title": "Pic"}}]
            }
        }));

        let entries = resolve_items(&body, 1);
        let target = entries[0]
            .rich_text("text")
            .unwrap()
            .pointer("/content/0/data/target/fields/title")
            .cloned();
        assert_eq!(target, Some(json!("Pic")));
    }

    #[test]
    fn test_depth_limits_resolution() {
        let body = response(json!({
            "items": [record("a", "node", json!({"next": link("Entry", "b")}))],
            "includes": {
                "Entry": [
                    record("b", "node", json!({"next": link("Entry", "c")})),
                    record("c", "node", json!({"name": "leaf"}))
                ]
            }
        }));

        let entries = resolve_items(&body, 1);
        let b = entries[0].reference("next").unwrap();
        assert_eq!(b.id, "b");
        assert_eq!(b.field("next"), Some(&link("Entry", "c")));
    }

    #[test]
    fn test_cycles_stay_unresolved() {
        let body = response(json!({
            "items": [record("a", "node", json!({"next": link("Entry", "b")}))],
            "includes": {
                "Entry": [record("b", "node", json!({"back": link("Entry", "a")}))]
            }
        }));

        let entries = resolve_items(&body, 10);
        let b = entries[0].reference("next").unwrap();
        assert_eq!(b.field("back"), Some(&link("Entry", "a")));
    }

    #[test]
    fn test_links_between_items_resolve() {
        let body = response(json!({
            "items": [
                record("a", "node", json!({"peer": link("Entry", "b")})),
                record("b", "node", json!({"name": "B"}))
            ]
        }));

        let entries = resolve_items(&body, 1);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].reference("peer").unwrap().text("name"), Some("B"));
    }

    #[test]
    fn test_missing_target_stays_link() {
        let body = response(json!({
            "items": [record("a", "node", json!({"gone": link("Entry", "zzz")}))]
        }));

        let entries = resolve_items(&body, 2);
        assert_eq!(entries[0].reference("gone"), None);
        assert_eq!(entries[0].field("gone"), Some(&link("Entry", "zzz")));
    }
}
