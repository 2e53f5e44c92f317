//! Layered settings for the command-line driver.
//!
//! Sources, lowest precedence first: built-in defaults, the configuration
//! file (`buildsmith.toml` or `--config`), `BUILDSMITH_*` environment
//! variables, then command-line flags.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Args;
use crate::error::CliError;

/// Configuration file read when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "buildsmith.toml";
/// Prefix of the environment variables read as settings.
pub const ENV_PREFIX: &str = "BUILDSMITH_";
/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "BUILDSMITH_LOG";
/// Output directory used when none is configured.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Fully resolved settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Semantic snapshot to read.
    pub input: Utf8PathBuf,
    /// Directory receiving generated files.
    pub out_dir: Utf8PathBuf,
    /// Exit unsuccessfully on error diagnostics.
    pub fail_on_error: bool,
    /// Print diagnostics as JSON lines.
    pub json_diagnostics: bool,
}

/// Settings as extracted from the layered sources.
#[derive(Debug, Deserialize, Serialize)]
struct RawSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<Utf8PathBuf>,
    out_dir: Utf8PathBuf,
    fail_on_error: bool,
    json_diagnostics: bool,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            input: None,
            out_dir: Utf8PathBuf::from(DEFAULT_OUT_DIR),
            fail_on_error: false,
            json_diagnostics: false,
        }
    }
}

/// Flags the user actually passed; unset flags do not mask lower layers.
#[derive(Debug, Default, Serialize)]
struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fail_on_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_diagnostics: Option<bool>,
}

impl From<&Args> for FlagOverrides {
    fn from(args: &Args) -> Self {
        Self {
            input: args.input.clone(),
            out_dir: args.out_dir.clone(),
            fail_on_error: args.should_fail_on_error.then_some(true),
            json_diagnostics: args.is_json_diagnostics.then_some(true),
        }
    }
}

/// Build the layered figment for `args`.
///
/// # Errors
///
/// Returns [`CliError::ConfigNotFound`] when `--config` names a missing
/// file.
pub fn layered_figment(args: &Args) -> Result<Figment, CliError> {
    let file = config_file(args.config.as_deref())?;
    debug!(file = %file, "loading configuration");
    Ok(Figment::from(Serialized::defaults(RawSettings::default()))
        .merge(Toml::file(file.as_std_path()))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["log"]))
        .merge(Serialized::defaults(FlagOverrides::from(args))))
}

fn config_file(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf, CliError> {
    match explicit {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(CliError::ConfigNotFound(path.to_path_buf())),
        None => Ok(Utf8PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}

/// Resolve the settings for `args`.
///
/// # Errors
///
/// Returns [`CliError::Configuration`] when a layer holds a malformed value
/// and [`CliError::MissingInput`] when no layer names a snapshot.
pub fn load_settings(args: &Args) -> Result<Settings, CliError> {
    let raw: RawSettings = layered_figment(args)?.extract()?;
    let input = raw.input.ok_or(CliError::MissingInput)?;
    Ok(Settings {
        input,
        out_dir: raw.out_dir,
        fail_on_error: raw.fail_on_error,
        json_diagnostics: raw.json_diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use test_helpers::figment::{figment_error, with_jail};

    fn args_with_input(input: &str) -> Args {
        Args {
            input: Some(Utf8PathBuf::from(input)),
            ..Args::default()
        }
    }

    #[rstest]
    fn defaults_apply_without_other_layers() -> Result<()> {
        let settings = with_jail(|jail| {
            jail.clear_env();
            load_settings(&args_with_input("model.json")).map_err(|err| figment_error(&err))
        })?;
        ensure!(
            settings
                == Settings {
                    input: Utf8PathBuf::from("model.json"),
                    out_dir: Utf8PathBuf::from(DEFAULT_OUT_DIR),
                    fail_on_error: false,
                    json_diagnostics: false,
                },
            "unexpected settings {settings:?}"
        );
        Ok(())
    }

    #[rstest]
    fn layers_apply_in_precedence_order() -> Result<()> {
        let settings = with_jail(|jail| {
            jail.clear_env();
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                "input = \"file.json\"\nout_dir = \"from-file\"\nfail_on_error = true\n",
            )?;
            jail.set_env("BUILDSMITH_OUT_DIR", "from-env");
            jail.set_env("BUILDSMITH_LOG", "debug");
            load_settings(&Args {
                is_json_diagnostics: true,
                ..Args::default()
            })
            .map_err(|err| figment_error(&err))
        })?;
        ensure!(settings.input == "file.json", "file input expected");
        ensure!(settings.out_dir == "from-env", "env beats file");
        ensure!(settings.fail_on_error, "file flag survives unset CLI flag");
        ensure!(settings.json_diagnostics, "CLI flag applied");
        Ok(())
    }

    #[rstest]
    fn flags_beat_environment() -> Result<()> {
        let settings = with_jail(|jail| {
            jail.clear_env();
            jail.set_env("BUILDSMITH_INPUT", "env.json");
            let mut args = args_with_input("cli.json");
            args.out_dir = Some(Utf8PathBuf::from("cli-out"));
            load_settings(&args).map_err(|err| figment_error(&err))
        })?;
        ensure!(settings.input == "cli.json", "CLI input expected");
        ensure!(settings.out_dir == "cli-out", "CLI out dir expected");
        Ok(())
    }

    #[rstest]
    fn explicit_config_file_is_read() -> Result<()> {
        let settings = with_jail(|jail| {
            jail.clear_env();
            jail.create_file("ci.toml", "input = \"ci.json\"\n")?;
            load_settings(&Args {
                config: Some(Utf8PathBuf::from("ci.toml")),
                ..Args::default()
            })
            .map_err(|err| figment_error(&err))
        })?;
        ensure!(settings.input == "ci.json", "input from ci.toml expected");
        Ok(())
    }

    #[rstest]
    fn missing_input_is_reported() -> Result<()> {
        let outcome = with_jail(|jail| {
            jail.clear_env();
            Ok(load_settings(&Args::default()))
        })?;
        ensure!(
            matches!(outcome, Err(CliError::MissingInput)),
            "expected MissingInput, got {outcome:?}"
        );
        Ok(())
    }

    #[rstest]
    fn missing_explicit_config_is_reported() -> Result<()> {
        let outcome = with_jail(|jail| {
            jail.clear_env();
            Ok(load_settings(&Args {
                config: Some(Utf8PathBuf::from("absent.toml")),
                ..args_with_input("model.json")
            }))
        })?;
        match outcome {
            Err(CliError::ConfigNotFound(path)) if path == "absent.toml" => Ok(()),
            other => Err(anyhow!("expected ConfigNotFound, got {other:?}")),
        }
    }

    #[rstest]
    fn malformed_values_are_configuration_errors() -> Result<()> {
        let outcome = with_jail(|jail| {
            jail.clear_env();
            jail.set_env("BUILDSMITH_FAIL_ON_ERROR", "sometimes");
            Ok(load_settings(&args_with_input("model.json")))
        })?;
        ensure!(
            matches!(outcome, Err(CliError::Configuration(_))),
            "expected a configuration error, got {outcome:?}"
        );
        Ok(())
    }
}
