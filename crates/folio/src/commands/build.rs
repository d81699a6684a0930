//! `folio build` command implementation.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Args;
use folio_cms::ContentfulClient;
use folio_config::{CliSettings, Config, Mode};
use tracing::{error, warn};

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline::{BuildOutcome, BuildStats, DurationCheck, Pipeline, check_duration};

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API mode: production (published) or preview (drafts).
    #[arg(long, env = "CONTENTFUL_MODE")]
    mode: Option<Mode>,

    /// Contentful space ID (overrides config).
    #[arg(long, env = "CONTENTFUL_SPACE_ID")]
    space_id: Option<String>,

    /// Delivery API token (overrides config).
    #[arg(long, env = "CONTENTFUL_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Preview API token (overrides config).
    #[arg(long, env = "CONTENTFUL_PREVIEW_TOKEN", hide_env_values = true)]
    preview_token: Option<String>,

    /// Site root receiving `_posts/` and `_data/` (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// CMS locale to build; repeat for several (overrides config).
    #[arg(short, long = "locale")]
    locales: Vec<String>,

    /// Enable verbose output (per-entry progress and cache logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Returns a failing exit code when the failure rate reaches the
    /// configured threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the client cannot be
    /// created.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let started = Instant::now();

        let cli_settings = CliSettings {
            mode: self.mode,
            space_id: self.space_id,
            access_token: self.access_token,
            preview_token: self.preview_token,
            output_dir: self.output_dir,
            locales: (!self.locales.is_empty()).then_some(self.locales),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let contentful = config.require_contentful()?;
        let client = ContentfulClient::from_config(contentful)?;

        output.highlight(&format!(
            "Building space {} ({} mode)",
            contentful.space_id, contentful.mode
        ));
        output.info(&format!(
            "Output directory: {}",
            config.site_resolved.output_dir.display()
        ));
        output.info(&format!(
            "Locales: {}",
            config.site_resolved.locales.join(", ")
        ));

        let stats = Pipeline::new(&client, &config).run();

        let elapsed = started.elapsed();
        let seconds = elapsed.as_secs_f64();
        match check_duration(elapsed, &config.build) {
            DurationCheck::Critical => error!(
                duration = seconds,
                threshold = config.build.critical_duration,
                "Build duration critical, investigate caching and API calls"
            ),
            DurationCheck::Slow => warn!(
                duration = seconds,
                target = config.build.warn_duration,
                "Build slow"
            ),
            DurationCheck::WithinTarget => {}
        }

        print_summary(&output, &stats, seconds);
        let outcome = stats.outcome(config.build.failure_threshold);
        print_outcome(&output, &stats, outcome, config.build.failure_threshold);

        Ok(if outcome.is_failure() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

fn print_summary(output: &Output, stats: &BuildStats, seconds: f64) {
    output.separator();
    output.stat("Duration", &format!("{seconds:.1}s"));
    output.stat("Entries", &stats.total_entries.to_string());
    output.stat("Successful", &stats.successful.to_string());
    output.stat("Failed", &stats.failed.to_string());
    output.stat("Locales", &stats.locales_processed.join(", "));
    output.separator();
}

fn print_outcome(output: &Output, stats: &BuildStats, outcome: BuildOutcome, threshold: f64) {
    match outcome {
        BuildOutcome::NoContent => {
            output.warning("No content entries found");
        }
        BuildOutcome::Success => {
            output.success("Build complete");
        }
        BuildOutcome::PartialFailure(rate) => {
            output.warning(&format!(
                "Partial failure: {} of {} entries failed ({:.1}%), deploying partial content",
                stats.failed,
                stats.total_entries,
                rate * 100.0
            ));
        }
        BuildOutcome::ThresholdExceeded(rate) => {
            output.error(&format!(
                "Failure threshold exceeded: {} of {} entries failed ({:.1}% >= {:.1}%)",
                stats.failed,
                stats.total_entries,
                rate * 100.0,
                threshold * 100.0
            ));
        }
    }
}
