//! Host detection: lock markers in the project and manager binaries on PATH.
//! Neither check ever fails; anything unexpected reads as "not there".

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::exec::command_for;
use crate::manager::PackageManagerKind;

pub const VERSION_PROBE_TIMEOUT_SECS: u64 = 15;

/// Whether a manager binary can be run on this host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Availability {
    Missing,
    /// Binary ran; `version` is `None` when it printed nothing usable.
    Installed { version: Option<String> },
}

impl Availability {
    pub fn is_installed(&self) -> bool {
        matches!(self, Availability::Installed { .. })
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            Availability::Installed { version } => version.as_deref(),
            Availability::Missing => None,
        }
    }
}

/// Oracles the selector consults. `SystemProbe` asks the real host.
pub trait Probe {
    fn is_project_using(&self, kind: PackageManagerKind, root: &Path) -> bool;
    fn availability(&self, kind: PackageManagerKind) -> Availability;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProbe;

impl Probe for SystemProbe {
    fn is_project_using(&self, kind: PackageManagerKind, root: &Path) -> bool {
        find_lock_marker(kind, root).is_some()
    }

    fn availability(&self, kind: PackageManagerKind) -> Availability {
        tool_availability(kind.executable())
    }
}

/// Find the nearest lock marker for `kind`, starting at `root` and walking up.
/// Workspace packages share the lockfile at the monorepo root.
pub fn find_lock_marker(kind: PackageManagerKind, root: &Path) -> Option<PathBuf> {
    let mut dir = Some(root);
    while let Some(current) = dir {
        for marker in kind.lock_markers() {
            let candidate = current.join(marker);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        dir = current.parent();
    }
    None
}

/// Run `<program> --version` and report what came back.
pub fn tool_availability(program: &str) -> Availability {
    match run_command_timeout(program, &["--version"], VERSION_PROBE_TIMEOUT_SECS) {
        Ok(out) if out.status.success() => Availability::Installed {
            version: first_line(&out.stdout),
        },
        _ => Availability::Missing,
    }
}

fn first_line(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(String::from)
}

/// Run a short-lived command with captured output; kill it after `timeout_secs`.
pub fn run_command_timeout(program: &str, args: &[&str], timeout_secs: u64) -> io::Result<Output> {
    let child = command_for(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let pid = child.id();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(child.wait_with_output());
    });

    match rx.recv_timeout(Duration::from_secs(timeout_secs)) {
        Ok(out) => out,
        Err(_) => {
            #[cfg(unix)]
            {
                let _ = Command::new("kill").arg("-9").arg(pid.to_string()).output();
            }
            #[cfg(windows)]
            {
                let _ = Command::new("taskkill")
                    .args(["/T", "/F", "/PID", &pid.to_string()])
                    .output();
            }
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{} did not exit within {}s", program, timeout_secs),
            ))
        }
    }
}
