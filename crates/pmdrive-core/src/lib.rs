//! Core library for pmdrive: choose a JavaScript package manager for a project,
//! build its command line, and run it. Also carries the minimum tool versions
//! used by diagnostics.

pub mod command;
pub mod config;
pub mod detect;
pub mod doctor;
pub mod error;
pub mod exec;
pub mod log;
pub mod manager;
pub mod package_manager;
pub mod selector;
pub mod versions;

// Re-export main API for CLI
pub use command::{build, Action};
pub use config::{effective_config, load_config, Config};
pub use detect::{find_lock_marker, tool_availability, Availability, Probe, SystemProbe};
pub use doctor::{check_tools, is_healthy, CheckStatus, ToolCheck};
pub use error::ProcessError;
pub use exec::{execute, execute_argv, ExecConfig};
pub use log::{get_cache_dir, Logger};
pub use manager::PackageManagerKind;
pub use package_manager::{Driver, Options, Plan};
pub use selector::{choose, resolve, Usability};
pub use versions::{range_for, Tool, VersionRanges, VERSION_RANGES};
