//! Command-line interface definitions for `buildsmith`.

use camino::Utf8PathBuf;
use clap::Parser;

/// Parsed CLI arguments for `buildsmith`.
///
/// Every option may also come from `buildsmith.toml` or a `BUILDSMITH_*`
/// environment variable; flags given here win.
#[derive(Debug, Default, Parser)]
#[command(name = "buildsmith")]
#[command(about = "Generate builder classes from a compiler semantic snapshot")]
#[command(version)]
pub struct Args {
    /// Configuration file to load instead of `buildsmith.toml`.
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Semantic snapshot exported by the host compiler.
    #[arg(long, value_name = "path")]
    pub input: Option<Utf8PathBuf>,
    /// Directory receiving the generated sources.
    #[arg(long, value_name = "path")]
    pub out_dir: Option<Utf8PathBuf>,
    /// Exit unsuccessfully when an error diagnostic is reported.
    #[arg(long = "fail-on-error")]
    pub should_fail_on_error: bool,
    /// Print diagnostics as JSON lines.
    #[arg(long = "json-diagnostics")]
    pub is_json_diagnostics: bool,
}
