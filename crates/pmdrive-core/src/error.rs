//! Failure of a spawned package-manager process.

use std::fmt;
use std::io;
use std::process::ExitStatus;

/// What went wrong running a child process. Carries the raw process result;
/// exit codes are not interpreted.
#[derive(Debug)]
pub enum ProcessError {
    /// The process could not be started (binary missing, bad cwd, ...).
    Spawn { program: String, source: io::Error },
    /// The process ran and exited unsuccessfully. Output is empty unless it was captured.
    Exit {
        program: String,
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
}

impl ProcessError {
    pub fn program(&self) -> &str {
        match self {
            ProcessError::Spawn { program, .. } | ProcessError::Exit { program, .. } => program,
        }
    }

    /// Child's exit code; `None` for spawn failures and signal termination.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::Exit { status, .. } => status.code(),
            ProcessError::Spawn { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcessError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Spawn { program, source } => {
                write!(f, "failed to run {}: {}", program, source)
            }
            ProcessError::Exit {
                program,
                status,
                stderr,
                ..
            } => {
                match status.code() {
                    Some(code) => write!(f, "{} exited with status {}", program, code)?,
                    None => write!(f, "{} was terminated by a signal", program)?,
                }
                let captured = String::from_utf8_lossy(stderr);
                let captured = captured.trim();
                if !captured.is_empty() {
                    write!(f, "\n{}", captured)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Spawn { source, .. } => Some(source),
            ProcessError::Exit { .. } => None,
        }
    }
}
