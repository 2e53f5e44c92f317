//! Error types for the `buildsmith` command-line driver.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `buildsmith` pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// Layered configuration could not be extracted.
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Box<figment::Error>),

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file {0} does not exist")]
    ConfigNotFound(Utf8PathBuf),

    /// No snapshot was named by any configuration layer.
    #[error("no input snapshot given; pass --input or set BUILDSMITH_INPUT")]
    MissingInput,

    /// The snapshot could not be parsed.
    #[error("failed to read snapshot {path}: {source}")]
    Snapshot {
        /// Snapshot path.
        path: Utf8PathBuf,
        /// Parse failure.
        #[source]
        source: buildsmith::GenerationError,
    },

    /// A diagnostic could not be serialised.
    #[error("failed to encode diagnostic: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Error diagnostics were reported and `--fail-on-error` was set.
    #[error("generation reported {count} error diagnostic(s)")]
    ErrorDiagnostics {
        /// Number of error diagnostics.
        count: usize,
    },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Configuration(Box::new(err))
    }
}

impl CliError {
    /// Shorthand for [`CliError::Io`].
    #[must_use]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
