//! Configuration management for folio.
//!
//! `folio.toml` is looked up in the working directory and its ancestors
//! unless a path is given. Command-line flags are layered on top through
//! [`CliSettings`].
//!
//! ## `${VAR}` references
//!
//! `${VAR}` fails when VAR is unset; `${VAR:-fallback}` substitutes the
//! fallback instead. References are expanded in:
//! - `contentful.space_id`
//! - `contentful.access_token`
//! - `contentful.preview_token`
//! - `contentful.environment`
//! - `site.output_dir`

mod expand;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Command-line overrides. `None` keeps the file value.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override API mode.
    pub mode: Option<Mode>,
    /// Override space ID.
    pub space_id: Option<String>,
    /// Override Delivery API token.
    pub access_token: Option<String>,
    /// Override Preview API token.
    pub preview_token: Option<String>,
    /// Override site output directory.
    pub output_dir: Option<PathBuf>,
    /// Override locales to process.
    pub locales: Option<Vec<String>>,
}

const CONFIG_FILENAME: &str = "folio.toml";

/// Parsed `folio.toml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Contentful connection (optional section, required for builds).
    pub contentful: Option<ContentfulConfig>,
    /// Site output configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Content type IDs per transformer.
    pub content_types: ContentTypes,
    /// Build policy.
    pub build: BuildConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// File the configuration came from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Which Contentful API serves content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Delivery API, published content.
    #[default]
    Production,
    /// Preview API, draft content.
    Preview,
}

impl Mode {
    /// Mode name as written in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Preview => "preview",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Self::Production),
            "preview" => Ok(Self::Preview),
            other => Err(ConfigError::Validation(format!(
                "unknown mode '{other}', expected 'production' or 'preview'"
            ))),
        }
    }
}

/// Contentful configuration.
#[derive(Debug, Deserialize)]
pub struct ContentfulConfig {
    /// Space identifier.
    #[serde(default)]
    pub space_id: String,
    /// Delivery API token.
    #[serde(default)]
    pub access_token: String,
    /// Preview API token.
    #[serde(default)]
    pub preview_token: String,
    /// API mode.
    #[serde(default)]
    pub mode: Mode,
    /// Environment within the space.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Request cache time-to-live in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ContentfulConfig {
    fn default() -> Self {
        Self {
            space_id: String::new(),
            access_token: String::new(),
            preview_token: String::new(),
            mode: Mode::default(),
            environment: default_environment(),
            cache_ttl: default_cache_ttl(),
            timeout: default_timeout(),
        }
    }
}

impl ContentfulConfig {
    /// Token for the configured mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the token for the mode is empty.
    pub fn active_token(&self) -> Result<&str, ConfigError> {
        let (token, field) = match self.mode {
            Mode::Production => (&self.access_token, "contentful.access_token"),
            Mode::Preview => (&self.preview_token, "contentful.preview_token"),
        };
        require_non_empty(token, field)?;
        Ok(token)
    }

    /// Request cache time-to-live.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// HTTP timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Check that credentials are present for the active mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.space_id, "contentful.space_id")?;
        require_non_empty(&self.environment, "contentful.environment")?;
        self.active_token()?;
        if self.cache_ttl == 0 {
            return Err(ConfigError::Validation(
                "contentful.cache_ttl must be greater than 0".to_owned(),
            ));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation(
                "contentful.timeout must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_environment() -> String {
    "master".to_owned()
}

const fn default_cache_ttl() -> u64 {
    300
}

const fn default_timeout() -> u64 {
    30
}

/// Raw site configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    output_dir: Option<String>,
    locales: Option<Vec<String>>,
    fallback_locale: Option<String>,
    locale_map: BTreeMap<String, String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Site root receiving `_posts/` and `_data/`.
    pub output_dir: PathBuf,
    /// CMS locales to process, in order.
    pub locales: Vec<String>,
    /// Locale used when a field has no value for the requested locale.
    pub fallback_locale: String,
    /// CMS locale to site folder name.
    pub locale_map: BTreeMap<String, String>,
}

impl SiteConfig {
    /// Site folder name for a CMS locale (identity when unmapped).
    #[must_use]
    pub fn site_locale<'a>(&'a self, cms_locale: &'a str) -> &'a str {
        self.locale_map
            .get(cms_locale)
            .map_or(cms_locale, String::as_str)
    }
}

fn default_locales() -> Vec<String> {
    vec!["en".to_owned(), "es".to_owned()]
}

/// Content type IDs consumed by the transformers.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentTypes {
    pub blog_post: String,
    pub profile: String,
    pub header: String,
    pub footer: String,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            blog_post: "blogTemplate".to_owned(),
            profile: "profile".to_owned(),
            header: "orHeader".to_owned(),
            footer: "orFooter".to_owned(),
        }
    }
}

/// Build policy.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Failure rate at or above which the build fails.
    pub failure_threshold: f64,
    /// Build duration in seconds that triggers a warning.
    pub warn_duration: u64,
    /// Build duration in seconds that triggers an error.
    pub critical_duration: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 0.10,
            warn_duration: 120,
            critical_duration: 240,
        }
    }
}

impl BuildConfig {
    /// Duration above which a build is reported as slow.
    #[must_use]
    pub fn warn_duration(&self) -> Duration {
        Duration::from_secs(self.warn_duration)
    }

    /// Duration above which a build is reported as critical.
    #[must_use]
    pub fn critical_duration(&self) -> Duration {
        Duration::from_secs(self.critical_duration)
    }
}

/// Error loading or validating `folio.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Explicit config path does not exist.
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// A setting has an unusable value.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// `${VAR}` reference could not be expanded.
    #[error("cannot expand {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`contentful.access_token`").
        field: String,
        /// Error message (e.g., "${`CONTENTFUL_ACCESS_TOKEN`} not set").
        message: String,
    },
}

/// Fail when a string setting is blank.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load `config_path`, or the discovered `folio.toml`, or defaults.
    ///
    /// `cli_settings` win over file values. They are applied after paths are
    /// resolved, so an `output_dir` flag is taken as given.
    ///
    /// # Errors
    ///
    /// Fails when an explicit path is missing or the file does not parse,
    /// expand or validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Layer command-line overrides over file values.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let overrides_contentful = settings.mode.is_some()
            || settings.space_id.is_some()
            || settings.access_token.is_some()
            || settings.preview_token.is_some();
        if overrides_contentful {
            let contentful = self.contentful.get_or_insert_with(ContentfulConfig::default);
            if let Some(mode) = settings.mode {
                contentful.mode = mode;
            }
            if let Some(space_id) = &settings.space_id {
                contentful.space_id.clone_from(space_id);
            }
            if let Some(token) = &settings.access_token {
                contentful.access_token.clone_from(token);
            }
            if let Some(token) = &settings.preview_token {
                contentful.preview_token.clone_from(token);
            }
        }
        if let Some(output_dir) = &settings.output_dir {
            self.site_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(locales) = &settings.locales {
            self.site_resolved.locales.clone_from(locales);
        }
    }

    /// Get validated Contentful configuration.
    ///
    /// Returns the Contentful config if the `[contentful]` section is present
    /// (or was supplied through CLI settings) and all fields are valid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_contentful(&self) -> Result<&ContentfulConfig, ConfigError> {
        let contentful = self.contentful.as_ref().ok_or_else(|| {
            ConfigError::Validation("[contentful] section required in config".into())
        })?;
        contentful.validate()?;
        Ok(contentful)
    }

    /// Nearest `folio.toml` walking up from the working directory.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Defaults rooted at the working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Defaults rooted at `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            contentful: None,
            site: SiteConfigRaw::default(),
            content_types: ContentTypes::default(),
            build: BuildConfig::default(),
            site_resolved: SiteConfig {
                output_dir: base.to_path_buf(),
                locales: default_locales(),
                fallback_locale: "en".to_owned(),
                locale_map: BTreeMap::new(),
            },
            config_path: None,
        }
    }

    /// Parse, expand, resolve and validate one file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Check site and build settings.
    ///
    /// Checks site and build settings. The `[contentful]` section is validated
    /// separately by [`Config::require_contentful`] so commands that never talk
    /// to the CMS work without credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_build()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        let site = &self.site_resolved;
        if site.locales.is_empty() {
            return Err(ConfigError::Validation(
                "site.locales must list at least one locale".to_owned(),
            ));
        }
        if let Some(empty) = site.locales.iter().position(String::is_empty) {
            return Err(ConfigError::Validation(format!(
                "site.locales[{empty}] cannot be empty"
            )));
        }
        require_non_empty(&site.fallback_locale, "site.fallback_locale")?;
        Ok(())
    }

    fn validate_build(&self) -> Result<(), ConfigError> {
        let threshold = self.build.failure_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "build.failure_threshold must be in (0, 1], got {threshold}"
            )));
        }
        if self.build.warn_duration > self.build.critical_duration {
            return Err(ConfigError::Validation(
                "build.warn_duration cannot exceed build.critical_duration".to_owned(),
            ));
        }
        Ok(())
    }

    /// Substitute `${VAR}` references in credential and path fields.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut contentful) = self.contentful {
            contentful.space_id = expand::expand_env(&contentful.space_id, "contentful.space_id")?;
            contentful.access_token =
                expand::expand_env(&contentful.access_token, "contentful.access_token")?;
            contentful.preview_token =
                expand::expand_env(&contentful.preview_token, "contentful.preview_token")?;
            contentful.environment =
                expand::expand_env(&contentful.environment, "contentful.environment")?;
        }

        if let Some(ref output_dir) = self.site.output_dir {
            self.site.output_dir = Some(expand::expand_env(output_dir, "site.output_dir")?);
        }

        Ok(())
    }

    /// Resolve `site` against the directory holding the config file.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let site = &self.site;
        self.site_resolved = SiteConfig {
            output_dir: config_dir.join(site.output_dir.as_deref().unwrap_or(".")),
            locales: site.locales.clone().unwrap_or_else(default_locales),
            fallback_locale: site
                .fallback_locale
                .clone()
                .unwrap_or_else(|| "en".to_owned()),
            locale_map: site.locale_map.clone(),
        };
    }
}
