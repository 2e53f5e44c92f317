//! Glue for running the CLI settings tests inside a `figment::Jail`.
//!
//! A jail gives each test a scratch working directory and restores the
//! process environment afterwards, so `buildsmith.toml` files and
//! `BUILDSMITH_*` variables never leak between tests.

use std::fmt::Display;

use anyhow::{Result, anyhow};
use figment::Jail;

/// Run `body` in a fresh [`Jail`] and hand back the value it produced.
///
/// # Errors
///
/// Fails when the jail cannot be set up or when `body` returns an error.
pub fn with_jail<T>(body: impl FnOnce(&mut Jail) -> figment::error::Result<T>) -> Result<T> {
    let mut produced = None;
    Jail::try_with(|jail| {
        produced = Some(body(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!("jailed test failed: {err}"))?;
    produced.ok_or_else(|| anyhow!("jail finished without producing a value"))
}

/// Wrap a settings error so a jail body can propagate it with `?`.
pub fn figment_error(err: &impl Display) -> figment::Error {
    figment::Error::from(err.to_string())
}
