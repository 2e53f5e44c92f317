//! Tracing subscriber set-up.
//!
//! The filter comes from `BUILDSMITH_LOG` using `RUST_LOG` syntax (for
//! example `debug` or `buildsmith::synth=trace`) and defaults to `warn`.
//! Output goes to stderr, next to the diagnostics.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;

/// Filter level used when `BUILDSMITH_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `BUILDSMITH_LOG`.
#[must_use]
pub fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber; later calls are no-ops.
pub fn init_tracing() {
    let _already_installed = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use test_helpers::figment::with_jail;

    #[rstest]
    #[case::unset(None, DEFAULT_FILTER)]
    #[case::explicit(Some("buildsmith=debug"), "buildsmith=debug")]
    fn filter_follows_the_log_variable(
        #[case] value: Option<&str>,
        #[case] expected: &str,
    ) -> Result<()> {
        let filter = with_jail(|jail| {
            jail.clear_env();
            if let Some(directives) = value {
                jail.set_env(LOG_ENV, directives);
            }
            Ok(build_filter().to_string())
        })?;
        ensure!(filter == expected, "got {filter}");
        Ok(())
    }
}
