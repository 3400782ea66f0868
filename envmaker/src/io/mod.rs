//! I/O helpers for bootstrap commands.

pub mod config;
pub mod paths;
pub mod process;
pub mod scaffold;
pub mod state_marker;
pub mod toolchain;
