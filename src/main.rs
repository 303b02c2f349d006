//! Thin CLI layer: parse args, styled output, and call into pmdrive-core.
//! Crash-proof: panic caught and reported; all errors return Result.

use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pmdrive_core::{Action, Config, Driver, Logger, Options, PackageManagerKind, ProcessError};
use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::Output;
use std::thread::{self, JoinHandle};
use std::time::Duration;

// ---- UI helpers (no-op when stdout isn't a TTY) ----

fn use_color() -> bool {
    std::io::stdout().is_terminal() && env::var("NO_COLOR").unwrap_or_default().is_empty()
}

fn success(msg: &str) {
    if use_color() {
        println!("{}", msg.green());
    } else {
        println!("{}", msg);
    }
}

fn error(msg: &str) {
    if use_color() {
        eprintln!("{}", msg.red());
    } else {
        eprintln!("{}", msg);
    }
}

fn warning(msg: &str) {
    if use_color() {
        eprintln!("{}", msg.yellow());
    } else {
        eprintln!("{}", msg);
    }
}

fn info(msg: &str) {
    if use_color() {
        println!("{}", msg.cyan());
    } else {
        println!("{}", msg);
    }
}

fn dim(msg: &str) {
    if use_color() {
        println!("{}", msg.dimmed());
    } else {
        println!("{}", msg);
    }
}

/// CLI failure: message plus the exit code to leave with.
struct CliError {
    message: String,
    code: i32,
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        CliError { message, code: 1 }
    }
}

impl From<ProcessError> for CliError {
    fn from(e: ProcessError) -> Self {
        let code = match e.exit_code() {
            Some(c) if c != 0 => c,
            _ => 1,
        };
        let message = if e.is_not_found() {
            format!("{} (is {} installed and on PATH?)", e, e.program())
        } else {
            e.to_string()
        };
        CliError { message, code }
    }
}

/// Run a blocking task; when `spin` is set show a spinner until it returns.
fn run_with_spinner<T, F>(message: &str, spin: bool, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    if !spin || !std::io::stderr().is_terminal() {
        return f();
    }
    let worker = thread::spawn(f);
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⠈⠐⠠⠰⠸⠹")
        .template("{spinner:.dim} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    wait_with_spinner(worker, &spinner)
}

/// Tick `spinner` until `worker` ends, then hand back its result.
fn wait_with_spinner<T>(worker: JoinHandle<T>, spinner: &ProgressBar) -> T {
    let tick = Duration::from_millis(80);
    while !worker.is_finished() {
        spinner.tick();
        thread::sleep(tick);
    }
    spinner.finish_and_clear();
    // Worker panicked; re-raise so main reports it.
    worker
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

fn global_args() -> [Arg; 4] {
    [
        Arg::new("pm")
            .long("pm")
            .visible_alias("package-manager")
            .global(true)
            .value_parser(["yarn", "npm", "bun", "pnpm"])
            .help("Preferred package manager (default: npm, or packageManager in .pmdriverc)"),
        Arg::new("root")
            .long("root")
            .global(true)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Project root to run in (default: current directory)"),
        Arg::new("silent")
            .short('s')
            .long("silent")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Hide package manager output; show a spinner instead"),
        Arg::new("verbose")
            .long("verbose")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Log decisions to stderr and never hide package manager output"),
    ]
}

fn dry_run_arg() -> Arg {
    Arg::new("dry-run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("Print the command that would run without running it")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output machine-readable JSON")
}

fn cli() -> Command {
    Command::new("pmdrive")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run the right JavaScript package manager (yarn, npm, bun or pnpm) for a project")
        .after_help(
            "Examples:\n  pmdrive install react react-dom\n  pmdrive --pm yarn install -D typescript\n  pmdrive install\n  pmdrive which --pm bun\n  pmdrive ranges --json",
        )
        .args(global_args())
        .subcommand(
            Command::new("init")
                .about("Create a package.json with the resolved package manager")
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("install")
                .visible_alias("add")
                .about("Add packages, or install everything from package.json when none are given")
                .arg(
                    Arg::new("package")
                        .required(false)
                        .num_args(0..)
                        .help("Package(s) to add, passed through verbatim and in order"),
                )
                .arg(
                    Arg::new("dev")
                        .short('D')
                        .long("dev")
                        .action(ArgAction::SetTrue)
                        .help("Add as devDependencies"),
                )
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("uninstall")
                .visible_alias("remove")
                .about("Remove packages")
                .arg(
                    Arg::new("package")
                        .required(true)
                        .num_args(1..)
                        .help("Package(s) to remove"),
                )
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("which")
                .about("Show which package manager would run, and why")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("ranges")
                .about("Print the supported tool version ranges")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check installed tools against the supported version ranges")
                .arg(json_arg()),
        )
}

/// CLI flags as the top config layer.
fn cli_config(m: &ArgMatches) -> Config {
    Config {
        package_manager: m
            .get_one::<String>("pm")
            .and_then(|s| s.parse::<PackageManagerKind>().ok()),
        silent: m.get_flag("silent").then_some(true),
        verbose: m.get_flag("verbose").then_some(true),
    }
}

fn project_root(m: &ArgMatches) -> Result<PathBuf, String> {
    match m.get_one::<PathBuf>("root") {
        Some(p) => Ok(p.clone()),
        None => env::current_dir().map_err(|e| format!("Cannot read current directory: {}", e)),
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), String> {
    let s = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", s);
    Ok(())
}

/// Resolve, then either print (dry run) or execute the command for `action`.
fn run_action(
    driver: Driver,
    options: Options,
    action: Action,
    packages: Vec<String>,
    dry_run: bool,
) -> Result<(), CliError> {
    let plan = driver.plan(&packages, action, &options);
    if dry_run {
        println!("{}", plan.command_line());
        return Ok(());
    }
    if plan.manager != plan.requested {
        driver.logger().log(&format!(
            "{} is not usable here; falling back to {}",
            plan.requested, plan.manager
        ));
    }

    let spin = options.silent && !driver.logger().is_verbose();
    if !spin {
        dim(&format!("$ {}", plan.command_line()));
    }
    let message = format!("Running {} …", plan.command_line());
    let task_plan = plan.clone();
    let result: Result<Output, ProcessError> =
        run_with_spinner(&message, spin, move || driver.run_plan(&task_plan, &options));
    result?;

    let label = match action {
        Action::Init => "Initialized project".to_string(),
        Action::InstallAll => "Installed dependencies".to_string(),
        Action::Uninstall => format!("Removed {}", packages.join(", ")),
        Action::Install | Action::InstallDev => format!("Added {}", packages.join(", ")),
    };
    success(&format!("{} with {}.", label, plan.manager));
    Ok(())
}

fn run() -> Result<(), CliError> {
    let matches = cli().get_matches();

    let root = project_root(&matches)?;
    let cfg = pmdrive_core::effective_config(&root, cli_config(&matches));
    let logger = Logger::new(cfg.verbose());
    let options = Options::new(cfg.package_manager(), root).silent(cfg.silent());
    let driver = Driver::new(logger);

    match matches.subcommand() {
        Some(("init", sub)) => {
            run_action(driver, options, Action::Init, Vec::new(), sub.get_flag("dry-run"))?;
        }
        Some(("install", sub)) => {
            let packages: Vec<String> = sub
                .get_many::<String>("package")
                .map(|v| v.cloned().collect())
                .unwrap_or_default();
            let action = if packages.is_empty() {
                if sub.get_flag("dev") {
                    warning("--dev has no effect without package names; installing everything.");
                }
                Action::InstallAll
            } else if sub.get_flag("dev") {
                Action::InstallDev
            } else {
                Action::Install
            };
            run_action(driver, options, action, packages, sub.get_flag("dry-run"))?;
        }
        Some(("uninstall", sub)) => {
            let packages: Vec<String> = sub
                .get_many::<String>("package")
                .map(|v| v.cloned().collect())
                .unwrap_or_default();
            run_action(driver, options, Action::Uninstall, packages, sub.get_flag("dry-run"))?;
        }
        Some(("which", sub)) => {
            let none: [&str; 0] = [];
            let plan = driver.plan(&none, Action::InstallAll, &options);
            if sub.get_flag("json") {
                print_json(&serde_json::json!({
                    "requested": plan.requested,
                    "manager": plan.manager,
                    "root": options.root.display().to_string(),
                    "usable": {
                        "yarn": plan.usability.yarn,
                        "bun": plan.usability.bun,
                        "pnpm": plan.usability.pnpm,
                    },
                }))?;
            } else {
                info(&plan.manager.to_string());
                let usable: Vec<&str> = [
                    ("yarn", plan.usability.yarn),
                    ("bun", plan.usability.bun),
                    ("pnpm", plan.usability.pnpm),
                ]
                .iter()
                .filter(|(_, ok)| *ok)
                .map(|(name, _)| *name)
                .collect();
                let usable = if usable.is_empty() {
                    "none".to_string()
                } else {
                    usable.join(", ")
                };
                dim(&format!("requested: {}; usable: {}", plan.requested, usable));
            }
        }
        Some(("ranges", sub)) => {
            if sub.get_flag("json") {
                let v = serde_json::to_value(pmdrive_core::VERSION_RANGES).map_err(|e| e.to_string())?;
                print_json(&v)?;
            } else {
                for tool in pmdrive_core::Tool::ALL {
                    println!("{:<12} {}", tool.key(), tool.range());
                }
            }
        }
        Some(("doctor", sub)) => {
            let checks = run_with_spinner("Checking tools …", true, pmdrive_core::check_tools);
            let healthy = pmdrive_core::is_healthy(&checks);
            if sub.get_flag("json") {
                let v = serde_json::to_value(&checks).map_err(|e| e.to_string())?;
                print_json(&serde_json::json!({ "healthy": healthy, "tools": v }))?;
            } else {
                for c in &checks {
                    let version = c.version.as_deref().unwrap_or("-");
                    let range = c.range.unwrap_or("any");
                    let line = format!("{:<10} {:<12} {:<12} {:?}", c.name, version, range, c.status);
                    match c.status {
                        pmdrive_core::CheckStatus::Ok => success(&line),
                        pmdrive_core::CheckStatus::Unknown => dim(&line),
                        pmdrive_core::CheckStatus::Missing | pmdrive_core::CheckStatus::Outdated => {
                            warning(&line)
                        }
                    }
                }
            }
            if !healthy {
                return Err(CliError {
                    message: "Some required tools are missing or too old.".to_string(),
                    code: 1,
                });
            }
        }
        _ => {
            if use_color() {
                println!("{}", "pmdrive".bright_cyan().bold());
                dim("Run the right package manager for a project: yarn, npm, bun or pnpm.");
            } else {
                println!("pmdrive: run the right package manager for a project");
            }
            dim("\nRun `pmdrive --help` for details.");
        }
    }

    Ok(())
}

fn main() {
    if !use_color() {
        colored::control::set_override(false);
    }

    let code = match std::panic::catch_unwind(run) {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            error(&e.message);
            e.code
        }
        Err(_) => {
            error("An unexpected error occurred. Please report this issue.");
            1
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_returns_worker_result() {
        let worker = thread::spawn(|| {
            thread::sleep(Duration::from_millis(200));
            42
        });
        assert_eq!(wait_with_spinner(worker, &ProgressBar::hidden()), 42);
    }

    #[test]
    fn spinner_reraises_worker_panic() {
        let worker = thread::spawn(|| -> u8 { panic!("worker failed") });
        let spinner = ProgressBar::hidden();
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            wait_with_spinner(worker, &spinner)
        }));
        assert!(caught.is_err());
    }
}
