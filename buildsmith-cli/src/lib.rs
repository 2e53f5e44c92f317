//! Library interface for the `buildsmith` command-line driver.
//!
//! The binary loads [`Settings`] from layered sources, reads the semantic
//! snapshot, runs [`buildsmith::generate_all`], prints diagnostics and writes
//! one file per generated builder.

pub mod cli;
pub mod config;
pub mod error;
mod fs_helpers;
pub mod logging;
pub mod output;
pub mod report;

use std::io::Write;

use buildsmith::{Compilation, Severity, generate_all};
use camino::Utf8PathBuf;
use tracing::info;

pub use cli::Args;
pub use config::{Settings, load_settings};
pub use error::CliError;

use report::{DiagnosticFormat, write_diagnostics};

/// What a successful run produced.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// Paths of the written files, in generation order.
    pub written: Vec<Utf8PathBuf>,
    /// Number of error diagnostics.
    pub errors: usize,
    /// Number of warning diagnostics.
    pub warnings: usize,
}

/// Generate builders for `settings`, printing diagnostics to `diagnostics_out`.
///
/// Files are written even when error diagnostics are reported, because
/// sibling builders are unaffected by a failing one.
///
/// # Errors
///
/// Returns [`CliError::Io`] or [`CliError::Snapshot`] when the snapshot
/// cannot be read, [`CliError::Io`] when output cannot be written and
/// [`CliError::ErrorDiagnostics`] when `fail_on_error` is set and an error
/// diagnostic was reported.
pub fn run<W: Write>(settings: &Settings, diagnostics_out: &mut W) -> Result<RunSummary, CliError> {
    let json = fs_helpers::read_text(&settings.input)?;
    let model = Compilation::from_json(&json).map_err(|source| CliError::Snapshot {
        path: settings.input.clone(),
        source,
    })?;
    let report = generate_all(&model);
    write_diagnostics(
        diagnostics_out,
        &report.diagnostics,
        DiagnosticFormat::from_json_flag(settings.json_diagnostics),
    )?;
    let written = output::write_generated(&settings.out_dir, &report.files)?;
    let count = |severity: Severity| {
        report
            .diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity() == severity)
            .count()
    };
    let summary = RunSummary {
        written,
        errors: count(Severity::Error),
        warnings: count(Severity::Warning),
    };
    info!(
        files = summary.written.len(),
        errors = summary.errors,
        warnings = summary.warnings,
        "generation finished"
    );
    if settings.fail_on_error && summary.errors > 0 {
        return Err(CliError::ErrorDiagnostics {
            count: summary.errors,
        });
    }
    Ok(summary)
}
