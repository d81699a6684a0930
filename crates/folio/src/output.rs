//! Styled status lines on stderr.
//!
//! Markdown produced by `folio convert` goes to stdout, so everything here
//! writes to stderr to keep the two streams apart.

use console::{Style, Term};

const RULE_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 12;

/// Status printer for the CLI.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    warn: Style,
    fail: Style,
    title: Style,
    label: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.ok.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.fail.apply_to(msg).to_string());
    }

    /// Heading for a build run.
    pub(crate) fn highlight(&self, msg: &str) {
        self.line(&self.title.apply_to(msg).to_string());
    }

    /// One `label: value` row of the build summary, labels padded to align.
    pub(crate) fn stat(&self, label: &str, value: &str) {
        let padded = format!("{:<LABEL_WIDTH$}", format!("{label}:"));
        self.line(&format!("{} {value}", self.label.apply_to(padded)));
    }

    pub(crate) fn separator(&self) {
        self.line(&"-".repeat(RULE_WIDTH));
    }

    // Status output is best effort; a closed stderr must not fail the build.
    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
