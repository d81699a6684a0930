//! Entry operations for Contentful API.

use tracing::{error, info};

use super::ContentfulClient;
use crate::cache::RequestCache;
use crate::entry::Entry;
use crate::error::CmsError;
use crate::links::{EntriesResponse, resolve_items};
use crate::source::ContentSource;

/// Largest include depth the API accepts.
const MAX_INCLUDE: u32 = 10;

impl ContentfulClient {
    /// Fetch a collection from the API and resolve its links.
    fn fetch_entries(
        &self,
        content_type: &str,
        locale: &str,
        include: u32,
    ) -> Result<Vec<Entry>, CmsError> {
        let url = format!("{}/entries", self.api_url());
        let include = include.min(MAX_INCLUDE);

        info!(content_type, locale, include, "Fetching entries");

        let response = self
            .agent
            .get(&url)
            .query("content_type", content_type)
            .query("locale", locale)
            .query("include", include.to_string())
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(CmsError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let body: EntriesResponse = body_reader.read_json()?;
        Ok(resolve_items(&body, include))
    }

    /// Fetch a single entry without link resolution.
    fn fetch_entry(&self, id: &str, locale: &str) -> Result<Option<Entry>, CmsError> {
        let url = format!("{}/entries/{}", self.api_url(), id);

        info!(entry_id = id, locale, "Fetching entry");

        let response = self
            .agent
            .get(&url)
            .query("locale", locale)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status == 404 {
            return Ok(None);
        }
        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(CmsError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let body: serde_json::Value = body_reader.read_json()?;
        Ok(Entry::from_value(&body))
    }
}

impl ContentSource for ContentfulClient {
    fn entries(
        &self,
        content_type: &str,
        locale: &str,
        include: u32,
    ) -> Result<Vec<Entry>, CmsError> {
        let key = RequestCache::key(content_type, locale, include);
        if let Some(entries) = self.cache.get(&key) {
            info!(content_type, locale, count = entries.len(), "Cache hit");
            return Ok(entries);
        }

        match self.fetch_entries(content_type, locale, include) {
            Ok(entries) => {
                info!(content_type, locale, count = entries.len(), "Entries fetched");
                self.cache.insert(key, entries.clone());
                Ok(entries)
            }
            Err(e) => {
                error!(content_type, locale, error = %e, "Entries request failed");
                Err(e)
            }
        }
    }

    fn entry(&self, id: &str, locale: &str) -> Result<Option<Entry>, CmsError> {
        self.fetch_entry(id, locale)
    }
}
