//! Idempotent creation of the manifest and state marker files.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::types::{FileOutcome, InstallState};

/// Create an empty `requirements.txt` unless one exists.
pub fn create_manifest_if_missing(path: &Path) -> Result<FileOutcome> {
    create_if_missing(path, "")
}

/// Create `installed.txt` with `0` unless one exists. Existing content is left alone.
pub fn create_marker_if_missing(path: &Path) -> Result<FileOutcome> {
    create_if_missing(path, InstallState::NotInstalled.as_marker())
}

fn create_if_missing(path: &Path, contents: &str) -> Result<FileOutcome> {
    if path.exists() {
        debug!(path = %path.display(), "already exists");
        return Ok(FileOutcome::AlreadyExists);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    // `create_new` keeps a file that appeared since the check intact.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(FileOutcome::AlreadyExists),
        Err(e) => return Err(e).with_context(|| format!("create file {}", path.display())),
    };
    file.write_all(contents.as_bytes())
        .with_context(|| format!("write file {}", path.display()))?;
    debug!(path = %path.display(), "created");
    Ok(FileOutcome::Created)
}
