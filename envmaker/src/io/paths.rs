//! Canonical bootstrap paths derived from configuration.

use std::path::{Path, PathBuf};

use crate::core::platform::{PlatformFamily, env_python_path};
use crate::io::config::EnvConfig;

pub const MANIFEST_FILE: &str = "requirements.txt";
pub const STATE_MARKER_FILE: &str = "installed.txt";

/// All paths the bootstrapper reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPaths {
    pub env_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub marker_path: PathBuf,
    pub env_python: PathBuf,
}

impl BootstrapPaths {
    pub fn new(
        env_parent: &Path,
        state_dir: &Path,
        env_name: &str,
        family: PlatformFamily,
    ) -> Self {
        // A parent of `.` keeps the environment path relative and bare (`.env`).
        let env_dir = if env_parent == Path::new(".") {
            PathBuf::from(env_name)
        } else {
            env_parent.join(env_name)
        };
        let env_python = env_python_path(&env_dir, family);
        Self {
            env_dir,
            manifest_path: state_dir.join(MANIFEST_FILE),
            marker_path: state_dir.join(STATE_MARKER_FILE),
            env_python,
        }
    }

    pub fn from_config(cfg: &EnvConfig) -> Self {
        Self::new(
            &cfg.env_parent,
            &cfg.state_dir,
            &cfg.env_name,
            PlatformFamily::current(),
        )
    }
}
