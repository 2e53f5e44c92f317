//! Diagnostic rendering.

use std::io::Write;

use buildsmith::Diagnostic;

use crate::error::CliError;

/// How diagnostics are printed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DiagnosticFormat {
    /// `<severity> <id>: <message> [at file:line:col]`.
    #[default]
    Text,
    /// One JSON object per line.
    JsonLines,
}

impl DiagnosticFormat {
    /// Format selected by the `json_diagnostics` setting.
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::JsonLines } else { Self::Text }
    }
}

/// Writes `diagnostics` to `out` in `format`, one per line.
///
/// # Errors
///
/// Returns [`CliError::Json`] when a diagnostic cannot be encoded and
/// [`CliError::Io`] when `out` rejects the write.
pub fn write_diagnostics<W: Write>(
    out: &mut W,
    diagnostics: &[Diagnostic],
    format: DiagnosticFormat,
) -> Result<(), CliError> {
    for diagnostic in diagnostics {
        let line = match format {
            DiagnosticFormat::Text => diagnostic.to_string(),
            DiagnosticFormat::JsonLines => serde_json::to_string(diagnostic)?,
        };
        writeln!(out, "{line}").map_err(|io_err| CliError::io("<stderr>", io_err))?;
    }
    Ok(())
}
