//! `folio convert` command implementation.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use folio_richtext::{CollectingSink, DEFAULT_LOCALE, RichTextConverter};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Rich-text JSON document to convert.
    input: PathBuf,

    /// Locale for embedded asset fields.
    #[arg(short, long, default_value = DEFAULT_LOCALE)]
    locale: String,

    /// Locale used when an asset field lacks `--locale` (default: same as `--locale`).
    #[arg(long)]
    fallback_locale: Option<String>,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or is not JSON, or the
    /// output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let text = std::fs::read_to_string(&self.input)?;
        let document: serde_json::Value = serde_json::from_str(&text)?;

        let sink = Arc::new(CollectingSink::new());
        let fallback = self.fallback_locale.unwrap_or_else(|| self.locale.clone());
        let converter = RichTextConverter::new()
            .with_sink(Arc::<CollectingSink>::clone(&sink))
            .with_locale(self.locale)
            .with_fallback_locale(fallback);

        let markdown = converter.convert_value(&document);

        for diagnostic in sink.take() {
            output.warning(&format!("{}: {diagnostic}", diagnostic.code()));
        }

        if let Some(path) = &self.output {
            std::fs::write(path, format!("{markdown}\n"))?;
            output.success(&format!("Wrote {}", path.display()));
        } else {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{markdown}")?;
        }

        Ok(())
    }
}
