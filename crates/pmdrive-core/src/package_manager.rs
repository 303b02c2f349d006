//! Package-manager operations: resolve the manager, build the command, run it.

use std::path::PathBuf;
use std::process::Output;

use crate::command::{self, Action};
use crate::detect::{Probe, SystemProbe};
use crate::error::ProcessError;
use crate::exec::{self, ExecConfig};
use crate::log::Logger;
use crate::manager::PackageManagerKind;
use crate::selector::{self, Usability};

/// Per-invocation options from the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// Manager the user asked for.
    pub package_manager: PackageManagerKind,
    /// Hide the manager's output (ignored in verbose mode).
    pub silent: bool,
    /// Project root; the command runs here.
    pub root: PathBuf,
}

impl Options {
    pub fn new(package_manager: PackageManagerKind, root: impl Into<PathBuf>) -> Self {
        Options {
            package_manager,
            silent: false,
            root: root.into(),
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

/// What would run for an operation, without running it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    pub requested: PackageManagerKind,
    pub manager: PackageManagerKind,
    pub action: Action,
    pub argv: Vec<String>,
    pub usability: Usability,
}

impl Plan {
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

/// Drives package managers for a caller. `P` answers the detection questions.
pub struct Driver<P: Probe = SystemProbe> {
    probe: P,
    logger: Logger,
}

impl Driver<SystemProbe> {
    pub fn new(logger: Logger) -> Self {
        Driver {
            probe: SystemProbe,
            logger,
        }
    }
}

impl<P: Probe> Driver<P> {
    pub fn with_probe(probe: P, logger: Logger) -> Self {
        Driver { probe, logger }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Resolve the manager and build the argv for `action`.
    pub fn plan<S: AsRef<str>>(&self, package_names: &[S], action: Action, options: &Options) -> Plan {
        let (manager, usability) = selector::resolve_explained(options, &self.probe);
        let argv = command::build(manager, action, package_names);
        Plan {
            requested: options.package_manager,
            manager,
            action,
            argv,
            usability,
        }
    }

    pub fn exec_config(&self, options: &Options) -> ExecConfig {
        ExecConfig {
            root: options.root.clone(),
            silent: options.silent,
            verbose: self.logger.is_verbose(),
        }
    }

    /// Run a plan produced by [`Driver::plan`].
    pub fn run_plan(&self, plan: &Plan, options: &Options) -> Result<Output, ProcessError> {
        self.logger.log(&format!(
            "{}: requested {}, using {} in {} -> {}",
            plan.action,
            plan.requested,
            plan.manager,
            options.root.display(),
            plan.command_line()
        ));
        let result = exec::execute_argv(&plan.argv, &self.exec_config(options));
        if let Err(e) = &result {
            self.logger.log(&format!("{} failed: {}", plan.manager, e));
        }
        result
    }

    fn configure<S: AsRef<str>>(
        &self,
        package_names: &[S],
        action: Action,
        options: &Options,
    ) -> Result<Output, ProcessError> {
        let plan = self.plan(package_names, action, options);
        self.run_plan(&plan, options)
    }

    pub fn init(&self, options: &Options) -> Result<Output, ProcessError> {
        self.configure::<&str>(&[], Action::Init, options)
    }

    pub fn install<S: AsRef<str>>(&self, package_names: &[S], options: &Options) -> Result<Output, ProcessError> {
        self.configure(package_names, Action::Install, options)
    }

    pub fn install_dev<S: AsRef<str>>(&self, package_names: &[S], options: &Options) -> Result<Output, ProcessError> {
        self.configure(package_names, Action::InstallDev, options)
    }

    pub fn uninstall<S: AsRef<str>>(&self, package_names: &[S], options: &Options) -> Result<Output, ProcessError> {
        self.configure(package_names, Action::Uninstall, options)
    }

    pub fn install_all(&self, options: &Options) -> Result<Output, ProcessError> {
        self.configure::<&str>(&[], Action::InstallAll, options)
    }

    /// Whether `kind` passes the usability check for these options.
    pub fn should_use(&self, kind: PackageManagerKind, options: &Options) -> bool {
        selector::should_use(kind, options, &self.probe)
    }
}
