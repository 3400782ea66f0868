//! `envmaker`: create a Python virtual environment and install its requirements.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use envmaker::bootstrap::run_bootstrap;
use envmaker::exit_codes;
use envmaker::io::config::{DEFAULT_CONFIG_FILE, EnvConfig, load_config};
use envmaker::io::paths::BootstrapPaths;
use envmaker::io::toolchain::ProcessToolchain;
use envmaker::logging;
use envmaker::status::{install_state, status_exit_code};

#[derive(Parser)]
#[command(
    name = "envmaker",
    version,
    about = "Create a Python virtual environment and install its requirements"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the environment, requirements.txt and installed.txt, then install.
    Bootstrap(ConfigArgs),
    /// Print the interpreter path inside the environment.
    PythonPath(ConfigArgs),
    /// Print installed.txt; exit 0 when installed, 2 when not.
    Status(ConfigArgs),
}

/// Overrides layered on top of `envmaker.toml`.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Config file (defaults to `envmaker.toml` if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory the environment is created in.
    #[arg(long)]
    env_parent: Option<PathBuf>,
    /// Directory holding requirements.txt and installed.txt.
    #[arg(long)]
    state_dir: Option<PathBuf>,
    /// Environment directory name.
    #[arg(long)]
    env_name: Option<String>,
    /// Base interpreter used to create the environment.
    #[arg(long)]
    python: Option<String>,
    /// Kill venv/pip commands running longer than this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INSTALL_FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Bootstrap(args) => cmd_bootstrap(&args),
        Command::PythonPath(args) => cmd_python_path(&args),
        Command::Status(args) => cmd_status(&args),
    }
}

fn cmd_bootstrap(args: &ConfigArgs) -> Result<i32> {
    let cfg = resolve_config(args)?;
    let paths = BootstrapPaths::from_config(&cfg);
    let toolchain = ProcessToolchain::new(cfg.command_timeout_secs.map(Duration::from_secs));
    let report = run_bootstrap(&paths, &cfg.python, &toolchain);
    Ok(report.exit_code())
}

fn cmd_python_path(args: &ConfigArgs) -> Result<i32> {
    let cfg = resolve_config(args)?;
    let paths = BootstrapPaths::from_config(&cfg);
    println!("{}", paths.env_python.display());
    Ok(exit_codes::OK)
}

fn cmd_status(args: &ConfigArgs) -> Result<i32> {
    let cfg = resolve_config(args)?;
    let state = install_state(&BootstrapPaths::from_config(&cfg))?;
    println!("{state}");
    Ok(status_exit_code(state))
}

/// Load the config file and apply CLI overrides.
fn resolve_config(args: &ConfigArgs) -> Result<EnvConfig> {
    let path = match &args.config {
        Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
        Some(path) => path.clone(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = load_config(&path)?;
    if let Some(env_parent) = &args.env_parent {
        cfg.env_parent = env_parent.clone();
    }
    if let Some(state_dir) = &args.state_dir {
        cfg.state_dir = state_dir.clone();
    }
    if let Some(env_name) = &args.env_name {
        cfg.env_name = env_name.clone();
    }
    if let Some(python) = &args.python {
        cfg.python = python.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        cfg.command_timeout_secs = Some(timeout_secs);
    }
    cfg.validate()?;
    debug!(?cfg, "resolved config");
    Ok(cfg)
}
