//! Bootstrap configuration stored in `envmaker.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::platform::PlatformFamily;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "envmaker.toml";

/// Bootstrap configuration (TOML).
///
/// Every field is optional in the file; missing fields fall back to
/// [`EnvConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvConfig {
    /// Directory the environment is created in. `.` means the working directory.
    pub env_parent: PathBuf,

    /// Directory holding `requirements.txt` and `installed.txt`.
    pub state_dir: PathBuf,

    /// Name of the environment directory.
    pub env_name: String,

    /// Base interpreter used to run `-m venv`.
    pub python: String,

    /// Kill external commands that run longer than this. `None` waits forever.
    pub command_timeout_secs: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            env_parent: PathBuf::from("."),
            state_dir: PathBuf::from("."),
            env_name: ".env".to_string(),
            python: PlatformFamily::current().default_python().to_string(),
            command_timeout_secs: None,
        }
    }
}

impl EnvConfig {
    pub fn validate(&self) -> Result<()> {
        let name = self.env_name.trim();
        if name.is_empty() {
            return Err(anyhow!("env_name must not be empty"));
        }
        if name.contains(['/', '\\']) {
            return Err(anyhow!(
                "env_name must be a single directory name, got {:?}",
                self.env_name
            ));
        }
        if self.python.trim().is_empty() {
            return Err(anyhow!("python must not be empty"));
        }
        if self.command_timeout_secs == Some(0) {
            return Err(anyhow!("command_timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EnvConfig::default()`.
pub fn load_config(path: &Path) -> Result<EnvConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = EnvConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EnvConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &EnvConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, EnvConfig::default());
        assert_eq!(cfg.env_name, ".env");
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("envmaker.toml");
        let cfg = EnvConfig {
            env_parent: PathBuf::from("envs"),
            command_timeout_secs: Some(600),
            ..EnvConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("envmaker.toml");
        fs::write(&path, "env_name = \"venv\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.env_name, "venv");
        assert_eq!(cfg.state_dir, PathBuf::from("."));
        assert_eq!(cfg.command_timeout_secs, None);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let nested = EnvConfig {
            env_name: "a/b".to_string(),
            ..EnvConfig::default()
        };
        assert!(nested.validate().is_err());

        let empty_python = EnvConfig {
            python: " ".to_string(),
            ..EnvConfig::default()
        };
        assert!(empty_python.validate().is_err());

        let zero_timeout = EnvConfig {
            command_timeout_secs: Some(0),
            ..EnvConfig::default()
        };
        let err = zero_timeout.validate().unwrap_err();
        assert!(err.to_string().contains("command_timeout_secs"));
    }
}
