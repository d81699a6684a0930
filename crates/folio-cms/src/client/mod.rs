//! Contentful REST API client.
//!
//! Provides a sync HTTP client for the Content Delivery API (published
//! content) and the Content Preview API (drafts), authenticated with a
//! bearer token. Collection requests are cached in memory.

mod entries;

use std::time::Duration;

use tracing::info;
use ureq::Agent;

use folio_config::{ContentfulConfig, Mode};

use crate::cache::{CacheStats, RequestCache};
use crate::error::CmsError;

/// Delivery API host.
const DELIVERY_URL: &str = "https://cdn.contentful.com";

/// Preview API host.
const PREVIEW_URL: &str = "https://preview.contentful.com";

/// Contentful REST API client.
pub struct ContentfulClient {
    agent: Agent,
    base_url: String,
    space_id: String,
    environment: String,
    token: String,
    cache: RequestCache,
}

impl ContentfulClient {
    /// Create client from validated config values.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Config`] if the section is incomplete or the token
    /// for the configured mode is missing.
    pub fn from_config(config: &ContentfulConfig) -> Result<Self, CmsError> {
        config.validate()?;
        let token = config.active_token()?;

        let client = Self::new(
            base_url_for(config.mode),
            &config.space_id,
            &config.environment,
            token,
            config.timeout(),
            config.cache_ttl(),
        );

        info!(
            space_id = %config.space_id,
            mode = %config.mode,
            cache_ttl = config.cache_ttl,
            "Contentful client initialized"
        );

        Ok(client)
    }

    /// Create client against an explicit API host.
    #[must_use]
    pub fn new(
        base_url: &str,
        space_id: &str,
        environment: &str,
        token: &str,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            space_id: space_id.to_owned(),
            environment: environment.to_owned(),
            token: token.to_owned(),
            cache: RequestCache::new(cache_ttl),
        }
    }

    /// Drop all cached requests, returning how many were removed.
    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.clear();
        info!(removed, "Cache cleared");
        removed
    }

    /// Current cache usage.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Get the environment-scoped API base URL.
    fn api_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}",
            self.base_url, self.space_id, self.environment
        )
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// API host serving the given mode.
#[must_use]
pub fn base_url_for(mode: Mode) -> &'static str {
    match mode {
        Mode::Production => DELIVERY_URL,
        Mode::Preview => PREVIEW_URL,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(mode: Mode) -> ContentfulConfig {
        ContentfulConfig {
            space_id: "space".to_owned(),
            access_token: "delivery".to_owned(),
            preview_token: "preview".to_owned(),
            mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_base_url_for_mode() {
        assert_eq!(base_url_for(Mode::Production), "https://cdn.contentful.com");
        assert_eq!(
            base_url_for(Mode::Preview),
            "https://preview.contentful.com"
        );
    }

    #[test]
    fn test_from_config_uses_mode_token() {
        let client = ContentfulClient::from_config(&config(Mode::Preview)).unwrap();
        assert_eq!(client.auth_header(), "Bearer preview");
        assert_eq!(
            client.api_url(),
            "https://preview.contentful.com/spaces/space/environments/master"
        );

        let client = ContentfulClient::from_config(&config(Mode::Production)).unwrap();
        assert_eq!(client.auth_header(), "Bearer delivery");
    }

    #[test]
    fn test_from_config_rejects_missing_token() {
        let config = ContentfulConfig {
            preview_token: String::new(),
            ..config(Mode::Preview)
        };
        let result = ContentfulClient::from_config(&config);
        assert!(matches!(result, Err(CmsError::Config(_))));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ContentfulClient::new(
            "http://localhost:8080/",
            "s",
            "staging",
            "t",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert_eq!(
            client.api_url(),
            "http://localhost:8080/spaces/s/environments/staging"
        );
    }

    #[test]
    fn test_cache_starts_empty() {
        let client = ContentfulClient::from_config(&config(Mode::Production)).unwrap();
        let stats = client.cache_stats();
        assert_eq!(stats.cached_requests, 0);
        assert_eq!(stats.ttl, Duration::from_secs(300));
        assert_eq!(client.clear_cache(), 0);
    }
}
