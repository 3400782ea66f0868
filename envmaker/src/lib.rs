//! Python virtual environment bootstrapper.
//!
//! Creates a `venv`, makes sure `requirements.txt` and the `installed.txt`
//! state marker exist, upgrades `pip`, and installs the manifest. The marker
//! flips to `1` only after a successful install.
//!
//! - **[`core`]**: Pure logic (install state, step outcomes, platform layout).
//! - **[`io`]**: Side-effecting operations (config, files, child processes).
//!
//! [`bootstrap`] and [`status`] coordinate the two to implement CLI commands.

pub mod bootstrap;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
