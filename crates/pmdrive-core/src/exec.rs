//! Run a package-manager command as a child process in the project root.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::ProcessError;

/// How a command is run. Verbosity is passed in, never read from globals.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecConfig {
    pub root: PathBuf,
    pub silent: bool,
    pub verbose: bool,
}

impl ExecConfig {
    /// Output is hidden only for silent runs; verbose mode always shows it.
    pub fn suppress_output(&self) -> bool {
        self.silent && !self.verbose
    }
}

/// `Command` for `program`. Windows package managers ship as `.cmd` scripts,
/// so a bare name is resolved against PATH and PATHEXT first. Spawning the
/// script path directly keeps std's batch argument quoting, so `a@>=1` and
/// `b@^2` arrive intact. An unresolved name is spawned as is and fails with
/// `NotFound`.
pub fn command_for(program: &str) -> Command {
    #[cfg(windows)]
    {
        let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        let exts: Vec<&str> = exts.split(';').filter(|e| !e.is_empty()).collect();
        let resolved = std::env::var_os("PATH").and_then(|path| find_program_in(program, &path, &exts));
        match resolved {
            Some(path) => Command::new(path),
            None => Command::new(program),
        }
    }
    #[cfg(not(windows))]
    {
        Command::new(program)
    }
}

/// First `<dir>/<program><ext>` that is a file, walking `path_var` in order
/// and trying `exts` in order within each dir. Names that already carry a
/// directory or an extension are left alone.
pub fn find_program_in(program: &str, path_var: &OsStr, exts: &[&str]) -> Option<PathBuf> {
    let as_path = Path::new(program);
    if as_path.components().count() != 1 || as_path.extension().is_some() {
        return None;
    }
    std::env::split_paths(path_var).find_map(|dir| {
        exts.iter()
            .map(|ext| dir.join(format!("{}{}", program, ext)))
            .find(|candidate| candidate.is_file())
    })
}

/// Run `program args...` with cwd = `config.root` and wait for it.
///
/// Silent runs capture stdout/stderr into the returned `Output` (and into the
/// error on failure); otherwise stdio is inherited and the captured buffers are
/// empty. A non-zero exit is an error; the status is passed through as is.
pub fn execute<S: AsRef<str>>(
    program: &str,
    args: &[S],
    config: &ExecConfig,
) -> Result<Output, ProcessError> {
    let mut cmd = command_for(program);
    cmd.args(args.iter().map(|a| a.as_ref()))
        .current_dir(&config.root);

    let spawn_err = |source: std::io::Error| ProcessError::Spawn {
        program: program.to_string(),
        source,
    };

    let output = if config.suppress_output() {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(spawn_err)?
    } else {
        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(spawn_err)?;
        Output {
            status,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    };

    if output.status.success() {
        Ok(output)
    } else {
        Err(ProcessError::Exit {
            program: program.to_string(),
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Run a full argv (`argv[0]` is the program).
pub fn execute_argv(argv: &[String], config: &ExecConfig) -> Result<Output, ProcessError> {
    match argv.split_first() {
        Some((program, args)) => execute(program, args, config),
        None => Err(ProcessError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: PathBuf, silent: bool, verbose: bool) -> ExecConfig {
        ExecConfig {
            root,
            silent,
            verbose,
        }
    }

    #[test]
    fn verbose_overrides_silent() {
        assert!(config(PathBuf::new(), true, false).suppress_output());
        assert!(!config(PathBuf::new(), true, true).suppress_output());
        assert!(!config(PathBuf::new(), false, false).suppress_output());
        assert!(!config(PathBuf::new(), false, true).suppress_output());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let td = tempfile::tempdir().expect("tmp");
        let cfg = config(td.path().to_path_buf(), true, false);
        let err = execute("pmdrive-no-such-manager", &["install"], &cfg).expect_err("spawn");
        assert!(matches!(err, ProcessError::Spawn { .. }), "{}", err);
        assert!(err.is_not_found(), "{}", err);
    }

    #[test]
    fn finds_script_shim_on_path() {
        let first = tempfile::tempdir().expect("tmp");
        let second = tempfile::tempdir().expect("tmp");
        std::fs::write(second.path().join("yarn.cmd"), "@echo off").expect("write shim");
        std::fs::write(second.path().join("yarn.bat"), "@echo off").expect("write shim");
        let path_var = std::env::join_paths([first.path(), second.path()]).expect("join");

        let found = find_program_in("yarn", &path_var, &[".exe", ".cmd", ".bat"]);
        assert_eq!(found, Some(second.path().join("yarn.cmd")));
    }

    #[test]
    fn earlier_path_entry_wins() {
        let first = tempfile::tempdir().expect("tmp");
        let second = tempfile::tempdir().expect("tmp");
        std::fs::write(first.path().join("pnpm.cmd"), "").expect("write shim");
        std::fs::write(second.path().join("pnpm.cmd"), "").expect("write shim");
        let path_var = std::env::join_paths([first.path(), second.path()]).expect("join");

        let found = find_program_in("pnpm", &path_var, &[".cmd"]).expect("shim");
        assert_eq!(found, first.path().join("pnpm.cmd"));
    }

    #[test]
    fn paths_and_extensions_are_not_resolved() {
        let td = tempfile::tempdir().expect("tmp");
        std::fs::write(td.path().join("npm.cmd"), "").expect("write shim");
        let path_var = td.path().as_os_str();
        assert_eq!(find_program_in("npm.cmd", path_var, &[".cmd"]), None);
        assert_eq!(find_program_in("bin/npm", path_var, &[".cmd"]), None);
        assert_eq!(find_program_in("bun", path_var, &[".cmd"]), None);
    }

    #[cfg(windows)]
    #[test]
    fn batch_specifiers_arrive_verbatim() {
        let td = tempfile::tempdir().expect("tmp");
        let shim = td.path().join("echo-args.cmd");
        std::fs::write(&shim, "@echo off\r\necho %*\r\n").expect("write shim");
        let cfg = config(td.path().to_path_buf(), true, false);

        let program = shim.to_string_lossy().into_owned();
        let out = execute(&program, &["x@>=1", "a@^1"], &cfg).expect("run shim");
        let printed = String::from_utf8_lossy(&out.stdout);
        assert!(printed.contains("x@>=1"), "stdout: {}", printed);
        assert!(printed.contains("a@^1"), "stdout: {}", printed);
        assert!(!td.path().join("=1").exists(), "'>' was read as a redirect");
    }

    #[test]
    fn empty_argv_is_rejected() {
        let err = execute_argv(&[], &ExecConfig::default()).expect_err("empty");
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn silent_run_captures_output_in_root() {
        let td = tempfile::tempdir().expect("tmp");
        let root = td.path().canonicalize().expect("canonical root");
        let cfg = config(root.clone(), true, false);

        let out = execute("sh", &["-c", "pwd"], &cfg).expect("run pwd");
        let printed = String::from_utf8_lossy(&out.stdout);
        assert_eq!(PathBuf::from(printed.trim()), root);
    }

    #[cfg(unix)]
    #[test]
    fn inherited_run_captures_nothing() {
        let td = tempfile::tempdir().expect("tmp");
        let cfg = config(td.path().to_path_buf(), true, true);
        let out = execute("sh", &["-c", "true"], &cfg).expect("run true");
        assert!(out.status.success());
        assert!(out.stdout.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_passed_through() {
        let td = tempfile::tempdir().expect("tmp");
        let cfg = config(td.path().to_path_buf(), true, false);
        let err = execute("sh", &["-c", "echo boom >&2; exit 3"], &cfg).expect_err("exit 3");
        assert_eq!(err.exit_code(), Some(3));
        match err {
            ProcessError::Exit { stderr, .. } => {
                assert_eq!(String::from_utf8_lossy(&stderr).trim(), "boom")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn nonexistent_root_fails_at_spawn() {
        let td = tempfile::tempdir().expect("tmp");
        let cfg = config(td.path().join("missing"), true, false);
        let err = execute("sh", &["-c", "true"], &cfg).expect_err("bad cwd");
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn argv_runs_first_token_as_program() {
        let td = tempfile::tempdir().expect("tmp");
        let cfg = config(td.path().to_path_buf(), true, false);
        let argv = vec!["sh".to_string(), "-c".to_string(), "printf ok".to_string()];
        let out = execute_argv(&argv, &cfg).expect("run argv");
        assert_eq!(out.stdout, b"ok");
    }
}
