//! Orchestration for `envmaker bootstrap`.
//!
//! Runs the fixed step sequence (environment, manifest, marker, pip upgrade,
//! install). Every step is guarded: a failure is printed with its cause chain
//! and the sequence continues, except for dependency installation, whose
//! failure ends the run.

use anyhow::Error;
use tracing::{debug, info, instrument};

use crate::core::types::{InstallState, Step, StepOutcome};
use crate::exit_codes;
use crate::io::paths::BootstrapPaths;
use crate::io::scaffold::{create_manifest_if_missing, create_marker_if_missing};
use crate::io::state_marker::write_state_marker;
use crate::io::toolchain::{Invocation, Toolchain};

/// Per-step outcomes of one bootstrap run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub steps: Vec<(Step, StepOutcome)>,
}

impl BootstrapReport {
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| outcome)
    }

    /// True when a fatal step failed.
    pub fn aborted(&self) -> bool {
        self.steps
            .iter()
            .any(|(step, outcome)| step.is_fatal() && outcome.is_failed())
    }

    pub fn exit_code(&self) -> i32 {
        if self.aborted() {
            exit_codes::INSTALL_FAILED
        } else {
            exit_codes::OK
        }
    }

    fn record(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push((step, outcome));
    }
}

/// Run the whole bootstrap sequence.
///
/// `python` is the base interpreter used for `-m venv`; every later command
/// runs the interpreter inside `paths.env_dir`, whether or not it exists.
#[instrument(skip_all, fields(env_dir = %paths.env_dir.display()))]
pub fn run_bootstrap<T: Toolchain>(
    paths: &BootstrapPaths,
    python: &str,
    toolchain: &T,
) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    report.record(
        Step::CreateEnvironment,
        create_environment(paths, python, toolchain),
    );
    report.record(Step::CreateManifest, create_manifest(paths));
    report.record(Step::CreateStateMarker, create_state_marker(paths));
    report.record(Step::UpgradeInstaller, upgrade_installer(paths, toolchain));

    let install = install_dependencies(paths, toolchain);
    let installed = install == StepOutcome::Done;
    report.record(Step::InstallDependencies, install);
    if installed {
        report.record(
            Step::MarkInstalled,
            set_state(paths, InstallState::Installed),
        );
    }

    info!(aborted = report.aborted(), "bootstrap finished");
    report
}

/// Create the virtual environment unless its directory already exists.
pub fn create_environment<T: Toolchain>(
    paths: &BootstrapPaths,
    python: &str,
    toolchain: &T,
) -> StepOutcome {
    if paths.env_dir.exists() {
        println!("<< Environment already exists");
        return StepOutcome::Skipped;
    }
    println!("<< Creating environment...");
    match toolchain.run(&Invocation::create_venv(python, &paths.env_dir)) {
        Ok(()) => {
            println!("<< Success: Environment created");
            StepOutcome::Done
        }
        Err(err) => report_failure(Step::CreateEnvironment, &err),
    }
}

pub fn create_manifest(paths: &BootstrapPaths) -> StepOutcome {
    if paths.manifest_path.exists() {
        println!("<< Requirements file already exists");
        return StepOutcome::Skipped;
    }
    println!("<< Creating requirements file...");
    match create_manifest_if_missing(&paths.manifest_path) {
        Ok(outcome) => {
            println!("<< Success: Requirements file created");
            outcome.into()
        }
        Err(err) => report_failure(Step::CreateManifest, &err),
    }
}

pub fn create_state_marker(paths: &BootstrapPaths) -> StepOutcome {
    if paths.marker_path.exists() {
        println!("<< Installed file already exists");
        return StepOutcome::Skipped;
    }
    println!("<< Creating installed file...");
    match create_marker_if_missing(&paths.marker_path) {
        Ok(outcome) => {
            println!("<< Success: Installed file created");
            outcome.into()
        }
        Err(err) => report_failure(Step::CreateStateMarker, &err),
    }
}

/// `pip install --upgrade pip` inside the environment. Never fatal.
pub fn upgrade_installer<T: Toolchain>(paths: &BootstrapPaths, toolchain: &T) -> StepOutcome {
    println!("<< Upgrading pip...");
    match toolchain.run(&Invocation::upgrade_pip(&paths.env_python)) {
        Ok(()) => {
            println!("<< Success: Pip upgraded");
            StepOutcome::Done
        }
        Err(err) => report_failure(Step::UpgradeInstaller, &err),
    }
}

/// `pip install -r requirements.txt` inside the environment.
///
/// Does not touch the state marker; [`run_bootstrap`] marks success afterwards.
pub fn install_dependencies<T: Toolchain>(paths: &BootstrapPaths, toolchain: &T) -> StepOutcome {
    println!("<< Installing requirements...");
    let invocation = Invocation::install_requirements(&paths.env_python, &paths.manifest_path);
    match toolchain.run(&invocation) {
        Ok(()) => {
            println!("<< Success: Requirements installed");
            StepOutcome::Done
        }
        Err(err) => report_failure(Step::InstallDependencies, &err),
    }
}

/// Overwrite the state marker. Failures are reported, never propagated.
pub fn set_state(paths: &BootstrapPaths, state: InstallState) -> StepOutcome {
    match write_state_marker(&paths.marker_path, state) {
        Ok(()) => {
            println!("<< Success: State of installed file changed");
            StepOutcome::Done
        }
        Err(err) => report_failure(Step::MarkInstalled, &err),
    }
}

fn report_failure(step: Step, err: &Error) -> StepOutcome {
    eprintln!("<< Failed: to {}. Error: {err:#}", step.action());
    eprintln!("{err:?}");
    debug!(?step, fatal = step.is_fatal(), "step failed");
    StepOutcome::Failed(format!("{err:#}"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::io::state_marker::read_state_marker;
    use crate::test_support::{ScriptedRun, ScriptedToolchain, TestWorkspace};

    #[test]
    fn fresh_workspace_creates_env_manifest_and_marker() {
        let ws = TestWorkspace::new().expect("workspace");
        let toolchain =
            ScriptedToolchain::new(vec![ScriptedRun::Ok, ScriptedRun::Ok, ScriptedRun::Ok]);

        let report = run_bootstrap(ws.paths(), "python3", &toolchain);

        assert!(ws.paths().env_dir.is_dir());
        assert_eq!(fs::read_to_string(&ws.paths().manifest_path).expect("read"), "");
        assert_eq!(report.outcome(Step::CreateEnvironment), Some(&StepOutcome::Done));
        assert_eq!(report.outcome(Step::MarkInstalled), Some(&StepOutcome::Done));
        assert_eq!(
            read_state_marker(&ws.paths().marker_path).expect("marker"),
            InstallState::Installed
        );
        assert_eq!(report.exit_code(), exit_codes::OK);

        let calls = toolchain.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Invocation::create_venv("python3", &ws.paths().env_dir));
        assert_eq!(calls[1], Invocation::upgrade_pip(&ws.paths().env_python));
        assert_eq!(
            calls[2],
            Invocation::install_requirements(&ws.paths().env_python, &ws.paths().manifest_path)
        );
    }

    #[test]
    fn marker_is_zero_after_scaffolding_before_install() {
        let ws = TestWorkspace::new().expect("workspace");
        assert_eq!(create_state_marker(ws.paths()), StepOutcome::Done);
        assert_eq!(fs::read_to_string(&ws.paths().marker_path).expect("read"), "0");
    }

    #[test]
    fn rerun_skips_existing_environment_and_files() {
        let ws = TestWorkspace::new().expect("workspace");
        fs::create_dir_all(&ws.paths().env_dir).expect("env dir");
        fs::write(ws.paths().env_dir.join("keep"), "x").expect("sentinel");
        fs::write(&ws.paths().manifest_path, "requests\n").expect("manifest");
        fs::write(&ws.paths().marker_path, "0").expect("marker");
        let toolchain = ScriptedToolchain::new(vec![
            ScriptedRun::Ok,
            ScriptedRun::Fail("no index".to_string()),
        ]);

        let report = run_bootstrap(ws.paths(), "python3", &toolchain);

        assert_eq!(report.outcome(Step::CreateEnvironment), Some(&StepOutcome::Skipped));
        assert_eq!(report.outcome(Step::CreateManifest), Some(&StepOutcome::Skipped));
        assert_eq!(report.outcome(Step::CreateStateMarker), Some(&StepOutcome::Skipped));
        assert!(ws.paths().env_dir.join("keep").is_file());
        assert_eq!(
            fs::read_to_string(&ws.paths().manifest_path).expect("read"),
            "requests\n"
        );
        // Only pip was invoked; no venv call against an existing env.
        assert_eq!(toolchain.calls().len(), 2);
    }

    #[test]
    fn failed_install_keeps_marker_and_aborts() {
        let ws = TestWorkspace::new().expect("workspace");
        let toolchain = ScriptedToolchain::new(vec![
            ScriptedRun::Ok,
            ScriptedRun::Ok,
            ScriptedRun::Fail("No matching distribution found".to_string()),
        ]);

        let report = run_bootstrap(ws.paths(), "python3", &toolchain);

        assert!(report.aborted());
        assert_eq!(report.exit_code(), exit_codes::INSTALL_FAILED);
        assert!(matches!(
            report.outcome(Step::InstallDependencies),
            Some(StepOutcome::Failed(msg)) if msg.contains("No matching distribution")
        ));
        assert_eq!(report.outcome(Step::MarkInstalled), None);
        assert_eq!(
            read_state_marker(&ws.paths().marker_path).expect("marker"),
            InstallState::NotInstalled
        );
    }

    #[test]
    fn failed_install_preserves_previous_installed_marker() {
        let ws = TestWorkspace::new().expect("workspace");
        fs::create_dir_all(&ws.paths().env_dir).expect("env dir");
        fs::write(&ws.paths().marker_path, "1").expect("marker");
        let toolchain = ScriptedToolchain::new(vec![
            ScriptedRun::Ok,
            ScriptedRun::Fail("boom".to_string()),
        ]);

        let report = run_bootstrap(ws.paths(), "python3", &toolchain);

        assert!(report.aborted());
        assert_eq!(fs::read_to_string(&ws.paths().marker_path).expect("read"), "1");
    }

    #[test]
    fn failed_venv_and_upgrade_are_not_fatal() {
        let ws = TestWorkspace::new().expect("workspace");
        let toolchain = ScriptedToolchain::new(vec![
            ScriptedRun::Fail("venv missing".to_string()),
            ScriptedRun::Fail("no python".to_string()),
            ScriptedRun::Ok,
        ]);

        let report = run_bootstrap(ws.paths(), "python3", &toolchain);

        assert!(report.outcome(Step::CreateEnvironment).is_some_and(StepOutcome::is_failed));
        assert!(report.outcome(Step::UpgradeInstaller).is_some_and(StepOutcome::is_failed));
        // Later steps still run against the derived interpreter path.
        assert_eq!(toolchain.calls().len(), 3);
        assert!(ws.paths().manifest_path.is_file());
        assert_eq!(report.exit_code(), exit_codes::OK);
    }

    #[test]
    fn marker_write_failure_is_reported_not_fatal() {
        let ws = TestWorkspace::new().expect("workspace");
        // A directory in place of the marker makes the rename fail.
        fs::create_dir_all(&ws.paths().marker_path).expect("marker dir");

        let outcome = set_state(ws.paths(), InstallState::Installed);

        assert!(outcome.is_failed());
    }
}
