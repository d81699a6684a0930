//! Build pipeline: fetch, transform and write every configured locale.

use std::time::Duration;

use folio_cms::ContentSource;
use folio_config::{BuildConfig, Config};
use folio_richtext::RichTextConverter;
use folio_transform::{
    BlogPostTransformer, FooterTransformer, HeaderTransformer, ProfileTransformer,
    TransformContext, TransformReport, transform_all, transform_singleton,
};
use folio_writer::{DataWriter, PostWriter};
use serde::Serialize;
use tracing::{error, info};

/// Counts for one locale or a whole build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BuildStats {
    pub total_entries: usize,
    pub successful: usize,
    pub failed: usize,
    pub locales_processed: Vec<String>,
}

impl BuildStats {
    /// Fraction of entries that failed; 0 for an empty build.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn failure_rate(&self) -> f64 {
        if self.total_entries == 0 {
            0.0
        } else {
            self.failed as f64 / self.total_entries as f64
        }
    }

    /// Classify the build against the failure threshold.
    pub(crate) fn outcome(&self, failure_threshold: f64) -> BuildOutcome {
        if self.total_entries == 0 {
            return BuildOutcome::NoContent;
        }
        let rate = self.failure_rate();
        if rate >= failure_threshold {
            BuildOutcome::ThresholdExceeded(rate)
        } else if self.failed > 0 {
            BuildOutcome::PartialFailure(rate)
        } else {
            BuildOutcome::Success
        }
    }

    fn record<T>(&mut self, report: &TransformReport<T>) {
        let fetch_failures = usize::from(report.fetch_failed);
        self.total_entries += report.total + fetch_failures;
        self.failed += report.failed + fetch_failures;
    }

    fn merge(&mut self, other: &Self) {
        self.total_entries += other.total_entries;
        self.successful += other.successful;
        self.failed += other.failed;
    }
}

/// Result of a build, judged by its failure rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum BuildOutcome {
    /// No entries were found. An empty site is valid.
    NoContent,
    /// Every entry was written.
    Success,
    /// Some entries failed, below the threshold. Partial content is deployable.
    PartialFailure(f64),
    /// Failure rate reached the threshold. Deployment should abort.
    ThresholdExceeded(f64),
}

impl BuildOutcome {
    pub(crate) fn is_failure(self) -> bool {
        matches!(self, Self::ThresholdExceeded(_))
    }
}

/// Build duration relative to the configured targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DurationCheck {
    WithinTarget,
    /// Above `warn_duration`.
    Slow,
    /// Above `critical_duration`.
    Critical,
}

pub(crate) fn check_duration(elapsed: Duration, build: &BuildConfig) -> DurationCheck {
    if elapsed > build.critical_duration() {
        DurationCheck::Critical
    } else if elapsed > build.warn_duration() {
        DurationCheck::Slow
    } else {
        DurationCheck::WithinTarget
    }
}

/// Runs the transformers and writers for every configured locale.
pub(crate) struct Pipeline<'a> {
    source: &'a dyn ContentSource,
    config: &'a Config,
    posts: PostWriter,
    data: DataWriter,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(source: &'a dyn ContentSource, config: &'a Config) -> Self {
        let output_dir = &config.site_resolved.output_dir;
        Self {
            source,
            config,
            posts: PostWriter::new(output_dir),
            data: DataWriter::new(output_dir),
        }
    }

    /// Process every locale and aggregate the counts.
    pub(crate) fn run(&self) -> BuildStats {
        let mut stats = BuildStats::default();
        for locale in &self.config.site_resolved.locales {
            info!(locale = %locale, "Processing locale");
            let locale_stats = self.process_locale(locale);
            info!(
                locale = %locale,
                success = locale_stats.successful,
                failed = locale_stats.failed,
                "Locale complete"
            );
            stats.merge(&locale_stats);
            stats.locales_processed.push(locale.clone());
        }
        stats
    }

    /// Transform and write all content of one CMS locale.
    fn process_locale(&self, locale: &str) -> BuildStats {
        let site = &self.config.site_resolved;
        let content_types = &self.config.content_types;
        let site_locale = site.site_locale(locale);

        let converter = RichTextConverter::new()
            .with_locale(locale)
            .with_fallback_locale(site.fallback_locale.as_str());
        let ctx = TransformContext::new(self.source, locale, &converter);
        let mut stats = BuildStats::default();

        let posts = transform_all(&BlogPostTransformer::new(&content_types.blog_post), &ctx);
        stats.record(&posts);
        let summary = self.posts.write_posts(&posts.records, site_locale);
        stats.successful += summary.written;
        stats.failed += summary.failed;

        let profile = transform_singleton(&ProfileTransformer::new(&content_types.profile), &ctx);
        self.write_data("profile", site_locale, &profile, &mut stats);

        let header = transform_singleton(&HeaderTransformer::new(&content_types.header), &ctx);
        self.write_data("header", site_locale, &header, &mut stats);

        let footer = transform_singleton(&FooterTransformer::new(&content_types.footer), &ctx);
        self.write_data("footer", site_locale, &footer, &mut stats);

        stats
    }

    fn write_data<T: Serialize>(
        &self,
        name: &str,
        site_locale: &str,
        report: &TransformReport<T>,
        stats: &mut BuildStats,
    ) {
        stats.record(report);
        let Some(record) = report.records.first() else {
            return;
        };
        match self.data.write(name, site_locale, record) {
            Ok(_) => stats.successful += 1,
            Err(e) => {
                error!(name, locale = site_locale, error = %e, "Data file write failed");
                stats.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use folio_cms::{Entry, MockSource};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn config(dir: &Path, toml: &str) -> Config {
        let path = dir.join("folio.toml");
        std::fs::write(&path, toml).unwrap();
        Config::load(Some(&path), None).unwrap()
    }

    fn blog_post(id: &str, slug: &str) -> Entry {
        let seo = Entry::new(format!("seo-{id}"), "seo")
            .with_field("title", json!("SEO"))
            .with_field("description", json!("Description"));
        Entry::new(id, "blogTemplate")
            .with_field("title", json!("Post"))
            .with_field("url", json!(slug))
            .with_field("publishDate", json!("2024-05-01T00:00:00Z"))
            .with_field("seo", seo.to_value())
    }

    fn stats(total: usize, failed: usize) -> BuildStats {
        BuildStats {
            total_entries: total,
            successful: total - failed,
            failed,
            locales_processed: Vec::new(),
        }
    }

    #[test]
    fn test_outcome_no_content() {
        assert_eq!(stats(0, 0).outcome(0.1), BuildOutcome::NoContent);
        assert!(!stats(0, 0).outcome(0.1).is_failure());
    }

    #[test]
    fn test_outcome_threshold() {
        assert_eq!(stats(10, 0).outcome(0.1), BuildOutcome::Success);
        assert_eq!(stats(20, 1).outcome(0.1), BuildOutcome::PartialFailure(0.05));
        assert_eq!(stats(10, 1).outcome(0.1), BuildOutcome::ThresholdExceeded(0.1));
        assert!(stats(10, 1).outcome(0.1).is_failure());
        assert!(!stats(20, 1).outcome(0.1).is_failure());
    }

    #[test]
    fn test_check_duration() {
        let build = BuildConfig::default();
        assert_eq!(
            check_duration(Duration::from_secs(60), &build),
            DurationCheck::WithinTarget
        );
        assert_eq!(
            check_duration(Duration::from_secs(121), &build),
            DurationCheck::Slow
        );
        assert_eq!(
            check_duration(Duration::from_secs(241), &build),
            DurationCheck::Critical
        );
    }

    #[test]
    fn test_run_writes_posts_and_data() {
        let dir = TempDir::new().unwrap();
        let config = config(
            dir.path(),
            "[site]\nlocales = [\"en-US\", \"es\"]\nfallback_locale = \"en-US\"\n\n[site.locale_map]\n\"en-US\" = \"en\"\n",
        );
        let source = MockSource::new()
            .with_entry("en-US", blog_post("p1", "Hello World"))
            .with_entry(
                "en-US",
                Entry::new("me", "profile").with_field("fullName", json!("Ada")),
            )
            .with_entry("es", Entry::new("h", "orHeader"));

        let stats = Pipeline::new(&source, &config).run();

        assert_eq!(
            stats,
            BuildStats {
                total_entries: 3,
                successful: 3,
                failed: 0,
                locales_processed: vec!["en-US".to_owned(), "es".to_owned()],
            }
        );
        assert!(dir.path().join("_posts/en/2024-05-01-hello-world.md").exists());
        assert!(dir.path().join("_data/profile-en.yml").exists());
        assert!(dir.path().join("_data/header-es.yml").exists());
        assert!(!dir.path().join("_data/footer-en.yml").exists());
    }

    #[test]
    fn test_run_counts_transform_and_fetch_failures() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path(), "[site]\nlocales = [\"en\"]\n");
        let source = MockSource::new()
            .with_entry("en", blog_post("p1", "ok"))
            .with_entry("en", Entry::new("p2", "blogTemplate"))
            .with_failure("orFooter");

        let stats = Pipeline::new(&source, &config).run();

        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.successful, 1);
        assert_eq!(stats.failed, 2);
        assert!(stats.outcome(0.1).is_failure());
    }

    #[test]
    fn test_run_uses_configured_content_types() {
        let dir = TempDir::new().unwrap();
        let config = config(
            dir.path(),
            "[site]\nlocales = [\"en\"]\n\n[content_types]\nprofile = \"person\"\n",
        );
        let source = MockSource::new().with_entry(
            "en",
            Entry::new("me", "person").with_field("fullName", json!("Ada")),
        );

        let stats = Pipeline::new(&source, &config).run();

        assert_eq!(stats.successful, 1);
        assert!(dir.path().join("_data/profile-en.yml").exists());
    }
}
