//! Timestamped log file plus verbose echo to stderr.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

pub const LOG_FILE: &str = "pmdrive.log";

/// Directory for pmdrive's own files. `PMDRIVE_CACHE_DIR` wins; otherwise the
/// platform cache dir (`~/.cache/pmdrive`, `~/Library/Caches/pmdrive`, ...).
pub fn get_cache_dir() -> PathBuf {
    if let Ok(dir) = env::var("PMDRIVE_CACHE_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::cache_dir()
        .map(|d| d.join("pmdrive"))
        .unwrap_or_else(|| PathBuf::from(".pmdrive-cache"))
}

/// Logging handle passed to whoever needs it. Holds the verbosity flag the
/// executor consults, so there is no process-wide verbose switch.
#[derive(Clone, Debug, Default)]
pub struct Logger {
    verbose: bool,
    file: Option<PathBuf>,
}

impl Logger {
    /// Logger writing to `<cache dir>/pmdrive.log`.
    pub fn new(verbose: bool) -> Self {
        Logger {
            verbose,
            file: Some(get_cache_dir().join(LOG_FILE)),
        }
    }

    /// Logger that never touches the filesystem.
    pub fn without_file(verbose: bool) -> Self {
        Logger { verbose, file: None }
    }

    pub fn with_file(verbose: bool, file: PathBuf) -> Self {
        Logger {
            verbose,
            file: Some(file),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn log_path(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    /// Record a line; echo it to stderr in verbose mode.
    pub fn log(&self, message: &str) {
        let line = stamp(message);
        if self.verbose {
            eprintln!("{}", line);
        }
        self.append(&line);
    }

    /// Record a line and always print the message to stderr.
    pub fn log_error(&self, message: &str) {
        eprintln!("{}", message);
        self.append(&stamp(message));
    }

    // Append-only; failures to write the log never surface.
    fn append(&self, line: &str) {
        let Some(path) = &self.file else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", line);
        }
    }
}

fn stamp(message: &str) -> String {
    format!("[{}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message)
}
