//! Markdown post writer.
//!
//! Posts land in `_posts/{locale}/{YYYY-MM-DD}-{slug}.md` with a YAML front
//! matter block followed by the Markdown body.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use folio_transform::Post;
use regex::Regex;
use tracing::{error, info, warn};

use crate::error::WriteError;

/// Slug used when sanitizing leaves nothing.
pub const UNTITLED_SLUG: &str = "untitled";

const DATE_FORMAT: &str = "%Y-%m-%d";

static NON_SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("invalid slug regex"));
static DASH_RUN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("invalid dash regex"));

/// Result of writing a batch of posts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub failed: usize,
}

/// Writes blog posts under `{base}/_posts/`.
#[derive(Debug)]
pub struct PostWriter {
    posts_dir: PathBuf,
}

impl PostWriter {
    #[must_use]
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            posts_dir: base.as_ref().join("_posts"),
        }
    }

    /// Destination path of a post.
    #[must_use]
    pub fn post_path(&self, post: &Post, locale: &str) -> PathBuf {
        let front_matter = &post.front_matter;
        let slug = sanitize_slug(front_matter.slug.as_deref().unwrap_or_default());
        let date = date_prefix(front_matter.publish_date.as_deref());
        self.posts_dir.join(locale).join(format!("{date}-{slug}.md"))
    }

    /// Write a single post, creating the locale folder if needed.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if serialization or the filesystem write fails.
    pub fn write_post(&self, post: &Post, locale: &str) -> Result<PathBuf, WriteError> {
        let path = self.post_path(post, locale);
        self.ensure_locale_dir(locale)?;

        let content = render_post(post)?;
        fs::write(&path, content).map_err(|e| WriteError::io(&path, e))?;

        info!(path = %path.display(), locale, "Post written");
        Ok(path)
    }

    /// Write many posts, logging and counting failures.
    pub fn write_posts(&self, posts: &[Post], locale: &str) -> WriteSummary {
        let mut summary = WriteSummary::default();
        for post in posts {
            match self.write_post(post, locale) {
                Ok(_) => summary.written += 1,
                Err(e) => {
                    error!(locale, error = %e, "Post write failed");
                    summary.failed += 1;
                }
            }
        }
        info!(
            locale,
            success = summary.written,
            failed = summary.failed,
            "Posts written"
        );
        summary
    }

    fn ensure_locale_dir(&self, locale: &str) -> Result<(), WriteError> {
        let dir = self.posts_dir.join(locale);
        if !dir.is_dir() {
            fs::create_dir_all(&dir).map_err(|e| WriteError::io(&dir, e))?;
            info!(path = %dir.display(), "Folder created");
        }
        Ok(())
    }
}

/// Front matter block followed by the body.
fn render_post(post: &Post) -> Result<String, WriteError> {
    let yaml = serde_yaml::to_string(&post.front_matter)?;
    Ok(format!("---\n{yaml}---\n\n{}\n", post.body))
}

/// Lowercase kebab-case slug safe for filenames.
///
/// Spaces become hyphens, characters outside `[a-z0-9-]` are dropped,
/// hyphen runs collapse and edge hyphens are trimmed. An empty result
/// becomes [`UNTITLED_SLUG`].
#[must_use]
pub fn sanitize_slug(slug: &str) -> String {
    let lowered = slug.to_lowercase().replace(' ', "-");
    let cleaned = NON_SLUG_PATTERN.replace_all(&lowered, "");
    let collapsed = DASH_RUN_PATTERN.replace_all(&cleaned, "-");
    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        UNTITLED_SLUG.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// `YYYY-MM-DD` from the start of an ISO 8601 date, else today's date.
#[must_use]
pub fn date_prefix(publish_date: Option<&str>) -> String {
    let Some(publish_date) = publish_date.filter(|d| !d.is_empty()) else {
        warn!("Missing publish date, using current date");
        return today();
    };
    let parsed = publish_date
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok());
    if let Some(date) = parsed {
        date.format(DATE_FORMAT).to_string()
    } else {
        warn!(date = publish_date, "Invalid publish date, using current date");
        today()
    }
}

fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
