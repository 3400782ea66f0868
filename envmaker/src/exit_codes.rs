//! Stable exit codes for envmaker CLI commands.

/// Command succeeded; for `bootstrap` this includes non-fatal step failures.
pub const OK: i32 = 0;
/// Dependency installation failed, or the command could not run at all
/// (invalid config, unreadable state marker).
pub const INSTALL_FAILED: i32 = 1;
/// `envmaker status` found the marker at `0`.
pub const NOT_INSTALLED: i32 = 2;
