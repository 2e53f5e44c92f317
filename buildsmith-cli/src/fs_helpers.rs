//! Filesystem helpers shared across the driver's modules.

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::CliError;

/// Opens `path`, creating it and any missing parents first.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the directory cannot be created or opened.
pub fn ensure_dir(path: &Utf8Path) -> Result<Dir, CliError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority())
                .map_err(|io_err| CliError::io(path, io_err))?;
            Dir::open_ambient_dir(path, ambient_authority())
                .map_err(|io_err| CliError::io(path, io_err))
        }
        Err(open_err) => Err(CliError::io(path, open_err)),
    }
}

/// Reads a UTF-8 file in full.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the file or its directory cannot be read.
pub fn read_text(path: &Utf8Path) -> Result<String, CliError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| CliError::io(path, std::io::ErrorKind::InvalidInput.into()))?;
    let dir = Dir::open_ambient_dir(&parent, ambient_authority())
        .map_err(|io_err| CliError::io(&parent, io_err))?;
    let mut file = dir.open(name).map_err(|io_err| CliError::io(path, io_err))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|io_err| CliError::io(path, io_err))?;
    Ok(text)
}
