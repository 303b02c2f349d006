//! Optional config from .pmdriverc or ~/.pmdriverc (JSON). Merged with env and CLI.

use std::env;
use std::path::{Path, PathBuf};

use crate::manager::PackageManagerKind;

pub const CONFIG_FILE: &str = ".pmdriverc";

/// Settings that may come from a file, the environment or the command line.
/// `None` means "not set here"; later layers override earlier ones.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub package_manager: Option<PackageManagerKind>,
    pub silent: Option<bool>,
    pub verbose: Option<bool>,
}

impl Config {
    /// Layer `over` on top of `self`.
    pub fn merge(self, over: Config) -> Config {
        Config {
            package_manager: over.package_manager.or(self.package_manager),
            silent: over.silent.or(self.silent),
            verbose: over.verbose.or(self.verbose),
        }
    }

    pub fn package_manager(&self) -> PackageManagerKind {
        self.package_manager.unwrap_or_default()
    }

    pub fn silent(&self) -> bool {
        self.silent.unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }
}

/// Load config from .pmdriverc in dir, then ~/.pmdriverc. Missing or invalid file = default.
pub fn load_config(dir: &Path) -> Config {
    let mut candidates = vec![dir.join(CONFIG_FILE)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(CONFIG_FILE));
    }
    load_config_from(&candidates)
}

/// First existing file in `candidates` wins.
pub fn load_config_from(candidates: &[PathBuf]) -> Config {
    let mut cfg = Config::default();
    for path in candidates {
        if path.is_file() {
            if let Ok(s) = std::fs::read_to_string(path) {
                if let Ok(v) = serde_json::from_str::<serde_json::Value>(&s) {
                    if let Some(pm) = v.get("packageManager").and_then(|x| x.as_str()) {
                        cfg.package_manager = pm.parse().ok();
                    }
                    if let Some(silent) = v.get("silent").and_then(|x| x.as_bool()) {
                        cfg.silent = Some(silent);
                    }
                    if let Some(verbose) = v.get("verbose").and_then(|x| x.as_bool()) {
                        cfg.verbose = Some(verbose);
                    }
                }
            }
            break;
        }
    }
    cfg
}

/// Settings from `PMDRIVE_PACKAGE_MANAGER`, `PMDRIVE_SILENT` and `PMDRIVE_VERBOSE`.
pub fn env_config() -> Config {
    env_config_from(|key| env::var(key).ok())
}

pub fn env_config_from<F>(lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    Config {
        package_manager: lookup("PMDRIVE_PACKAGE_MANAGER").and_then(|v| v.parse().ok()),
        silent: lookup("PMDRIVE_SILENT").and_then(|v| parse_flag(&v)),
        verbose: lookup("PMDRIVE_VERBOSE").and_then(|v| parse_flag(&v)),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// File config for `dir`, then env, then `cli` on top.
pub fn effective_config(dir: &Path, cli: Config) -> Config {
    load_config(dir).merge(env_config()).merge(cli)
}
