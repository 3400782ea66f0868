//! Marker inspection for `envmaker status`.

use anyhow::Result;

use crate::core::types::InstallState;
use crate::exit_codes;
use crate::io::paths::BootstrapPaths;
use crate::io::state_marker::read_state_marker;

/// Read the state marker for the configured paths.
pub fn install_state(paths: &BootstrapPaths) -> Result<InstallState> {
    read_state_marker(&paths.marker_path)
}

pub fn status_exit_code(state: InstallState) -> i32 {
    match state {
        InstallState::Installed => exit_codes::OK,
        InstallState::NotInstalled => exit_codes::NOT_INSTALLED,
    }
}
