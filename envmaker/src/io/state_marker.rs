//! Storage for the `installed.txt` state marker.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::types::InstallState;

/// Read the marker and parse it into an [`InstallState`].
pub fn read_state_marker(path: &Path) -> Result<InstallState> {
    debug!(path = %path.display(), "reading state marker");
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read state marker {}", path.display()))?;
    contents
        .parse()
        .with_context(|| format!("parse state marker {}", path.display()))
}

/// Atomically overwrite the marker (temp file + rename).
pub fn write_state_marker(path: &Path, state: InstallState) -> Result<()> {
    debug!(path = %path.display(), state = %state, "writing state marker");
    let tmp_path = path.with_extension("txt.tmp");
    fs::write(&tmp_path, state.as_marker())
        .with_context(|| format!("write temp state marker {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("replace state marker {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_overwrites_previous_value() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("installed.txt");

        write_state_marker(&path, InstallState::NotInstalled).expect("write 0");
        assert_eq!(fs::read_to_string(&path).expect("read"), "0");

        write_state_marker(&path, InstallState::Installed).expect("write 1");
        assert_eq!(fs::read_to_string(&path).expect("read"), "1");
        assert_eq!(read_state_marker(&path).expect("parse"), InstallState::Installed);
        assert!(!path.with_extension("txt.tmp").exists());
    }

    #[test]
    fn read_missing_marker_errors_with_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("installed.txt");
        let err = read_state_marker(&path).unwrap_err();
        assert!(err.to_string().contains("installed.txt"));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("absent").join("installed.txt");
        assert!(write_state_marker(&path, InstallState::Installed).is_err());
    }
}
