//! Platform-dependent layout of a virtual environment.

use std::path::{Path, PathBuf};

/// OS family that decides where `venv` places the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Windows,
    Unix,
}

impl PlatformFamily {
    /// Family of the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            PlatformFamily::Windows
        } else {
            PlatformFamily::Unix
        }
    }

    /// Default base interpreter used to run `-m venv`.
    pub fn default_python(self) -> &'static str {
        match self {
            PlatformFamily::Windows => "python",
            PlatformFamily::Unix => "python3",
        }
    }
}

/// Resolve the interpreter inside `env_dir` for the given platform family.
///
/// `<env>\Scripts\python.exe` on Windows, `<env>/bin/python` elsewhere.
pub fn env_python_path(env_dir: &Path, family: PlatformFamily) -> PathBuf {
    match family {
        PlatformFamily::Windows => env_dir.join("Scripts").join("python.exe"),
        PlatformFamily::Unix => env_dir.join("bin").join("python"),
    }
}
