//! Toolchain abstraction for `venv` and `pip` invocations.
//!
//! The [`Toolchain`] trait decouples the bootstrap sequence from actually
//! spawning interpreters. Tests use a scripted toolchain that records
//! invocations and returns predetermined results without spawning processes.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{info, instrument};

use crate::io::process::run_command_inherited;

/// A single external command the bootstrapper wants to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `<python> -m venv <env_dir>`
    pub fn create_venv(python: &str, env_dir: &Path) -> Self {
        Self::new(
            python,
            [OsString::from("-m"), "venv".into(), env_dir.into()],
        )
    }

    /// `<env_python> -m pip install --upgrade pip`
    pub fn upgrade_pip(env_python: &Path) -> Self {
        Self::new(env_python, ["-m", "pip", "install", "--upgrade", "pip"])
    }

    /// `<env_python> -m pip install -r <manifest>`
    pub fn install_requirements(env_python: &Path, manifest: &Path) -> Self {
        Self::new(
            env_python,
            [
                OsString::from("-m"),
                "pip".into(),
                "install".into(),
                "-r".into(),
                manifest.into(),
            ],
        )
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Abstraction over the interpreter/installer backend.
pub trait Toolchain {
    /// Run the invocation to completion. A non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Toolchain that spawns real processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessToolchain {
    pub timeout: Option<Duration>,
}

impl ProcessToolchain {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Toolchain for ProcessToolchain {
    #[instrument(skip_all, fields(program = %invocation.program.display()))]
    fn run(&self, invocation: &Invocation) -> Result<()> {
        info!(command = %invocation, "running");
        let outcome = run_command_inherited(invocation.to_command(), self.timeout)?;
        if outcome.timed_out {
            let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
            bail!("command `{invocation}` timed out after {secs}s");
        }
        if !outcome.status.success() {
            match outcome.status.code() {
                Some(code) => bail!("command `{invocation}` returned non-zero exit status {code}"),
                None => bail!("command `{invocation}` was terminated by a signal"),
            }
        }
        Ok(())
    }
}
