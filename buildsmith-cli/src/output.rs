//! Writers for generated sources.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::OpenOptions;
use tracing::info;

use buildsmith::GeneratedFile;

use crate::error::CliError;
use crate::fs_helpers::ensure_dir;

/// Writes every file under `out_dir`, replacing existing files.
///
/// Returns the written paths in input order.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the directory or a file cannot be written.
pub fn write_generated(
    out_dir: &Utf8Path,
    files: &[GeneratedFile],
) -> Result<Vec<Utf8PathBuf>, CliError> {
    let dir = ensure_dir(out_dir)?;
    let mut written = Vec::with_capacity(files.len());
    for generated in files {
        let target = out_dir.join(&generated.name);
        let mut file = dir
            .open_with(
                &generated.name,
                OpenOptions::new().write(true).create(true).truncate(true),
            )
            .map_err(|io_err| CliError::io(&target, io_err))?;
        file.write_all(generated.text.as_bytes())
            .map_err(|io_err| CliError::io(&target, io_err))?;
        info!(path = %target, "wrote generated source");
        written.push(target);
    }
    Ok(written)
}
