//! Test-only helpers: scratch workspaces and a scripted toolchain.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::core::platform::PlatformFamily;
use crate::io::paths::BootstrapPaths;
use crate::io::toolchain::{Invocation, Toolchain};

/// Scratch directory with bootstrap paths rooted inside it.
pub struct TestWorkspace {
    dir: TempDir,
    paths: BootstrapPaths,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let paths = BootstrapPaths::new(dir.path(), dir.path(), ".env", PlatformFamily::current());
        Ok(Self { dir, paths })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &BootstrapPaths {
        &self.paths
    }
}

/// Scripted result for the next toolchain invocation.
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    Ok,
    Fail(String),
}

/// Toolchain that replays queued results and records every invocation.
///
/// A successful `-m venv <dir>` invocation creates `<dir>` so later steps see
/// an environment, as a real `venv` would.
pub struct ScriptedToolchain {
    runs: RefCell<VecDeque<ScriptedRun>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedToolchain {
    pub fn new(runs: Vec<ScriptedRun>) -> Self {
        Self {
            runs: RefCell::new(runs.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl Toolchain for ScriptedToolchain {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.borrow_mut().push(invocation.clone());
        let run = self
            .runs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted result left for `{invocation}`"))?;
        match run {
            ScriptedRun::Ok => {
                if let Some(env_dir) = venv_target(invocation) {
                    fs::create_dir_all(&env_dir)
                        .with_context(|| format!("create {}", env_dir.display()))?;
                }
                Ok(())
            }
            ScriptedRun::Fail(message) => Err(anyhow!(message))
                .with_context(|| format!("command `{invocation}` returned non-zero exit status 1")),
        }
    }
}

fn venv_target(invocation: &Invocation) -> Option<PathBuf> {
    match invocation.args.as_slice() {
        [flag, module, target] if flag == "-m" && module == "venv" => Some(PathBuf::from(target)),
        _ => None,
    }
}
