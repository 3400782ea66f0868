//! Shared deterministic types for the bootstrap sequence.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

/// Last known outcome of dependency installation, as persisted in `installed.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallState {
    /// Marker content `0`.
    #[default]
    NotInstalled,
    /// Marker content `1`.
    Installed,
}

impl InstallState {
    /// Single-character marker content.
    pub fn as_marker(self) -> &'static str {
        match self {
            InstallState::NotInstalled => "0",
            InstallState::Installed => "1",
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_marker())
    }
}

impl FromStr for InstallState {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim() {
            "0" => Ok(InstallState::NotInstalled),
            "1" => Ok(InstallState::Installed),
            other => Err(anyhow!("invalid state marker content {other:?} (expected 0 or 1)")),
        }
    }
}

/// Result of an idempotent "create if missing" operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Created,
    AlreadyExists,
}

/// The ordered steps of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateEnvironment,
    CreateManifest,
    CreateStateMarker,
    UpgradeInstaller,
    InstallDependencies,
    MarkInstalled,
}

impl Step {
    /// Human-readable action used in `<< Failed: to ...` lines.
    pub fn action(self) -> &'static str {
        match self {
            Step::CreateEnvironment => "create virtual environment",
            Step::CreateManifest => "create requirements file",
            Step::CreateStateMarker => "create installed file",
            Step::UpgradeInstaller => "upgrade pip",
            Step::InstallDependencies => "install requirements",
            Step::MarkInstalled => "change state of installed file",
        }
    }

    /// Only a failed dependency install aborts the run.
    pub fn is_fatal(self) -> bool {
        matches!(self, Step::InstallDependencies)
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and succeeded.
    Done,
    /// The step found its target already present and did nothing.
    Skipped,
    /// The step failed; holds the rendered error chain.
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

impl From<FileOutcome> for StepOutcome {
    fn from(outcome: FileOutcome) -> Self {
        match outcome {
            FileOutcome::Created => StepOutcome::Done,
            FileOutcome::AlreadyExists => StepOutcome::Skipped,
        }
    }
}
