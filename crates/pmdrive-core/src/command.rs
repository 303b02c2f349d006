//! Command table: (manager, action) -> fixed argv tokens.

use std::fmt;

use crate::manager::PackageManagerKind;

/// Logical package-management operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Init,
    Install,
    InstallDev,
    Uninstall,
    InstallAll,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Init,
        Action::Install,
        Action::InstallDev,
        Action::Uninstall,
        Action::InstallAll,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Init => "init",
            Action::Install => "install",
            Action::InstallDev => "installDev",
            Action::Uninstall => "uninstall",
            Action::InstallAll => "installAll",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed tokens the manager takes for an action, before any package names.
pub fn flags(manager: PackageManagerKind, action: Action) -> &'static [&'static str] {
    use Action::*;
    use PackageManagerKind::*;

    match (manager, action) {
        (Yarn, Init) => &["init", "-y"],
        (Yarn, Install) => &["add"],
        (Yarn, InstallDev) => &["add", "-D"],
        (Yarn, Uninstall) => &["remove"],
        (Yarn, InstallAll) => &["install"],

        (Npm, Init) => &["init", "-y"],
        (Npm, Install) => &["install", "--save", "--save-exact"],
        (Npm, InstallDev) => &["install", "--save-dev", "--save-exact"],
        (Npm, Uninstall) => &["uninstall", "--save"],
        (Npm, InstallAll) => &["install"],

        (Bun, Init) => &["init", "-y"],
        (Bun, Install) => &["add", "--exact"],
        (Bun, InstallDev) => &["add", "--dev", "--exact"],
        (Bun, Uninstall) => &["remove"],
        (Bun, InstallAll) => &["install"],

        (Pnpm, Init) => &["init"],
        (Pnpm, Install) => &["add", "--save-exact"],
        (Pnpm, InstallDev) => &["add", "-D", "--save-exact"],
        (Pnpm, Uninstall) => &["remove"],
        (Pnpm, InstallAll) => &["install"],
    }
}

/// Full argv for `manager` running `action` on `package_names`.
/// argv[0] is the executable; names follow the fixed flags in caller order.
pub fn build<S: AsRef<str>>(
    manager: PackageManagerKind,
    action: Action,
    package_names: &[S],
) -> Vec<String> {
    let fixed = flags(manager, action);
    let mut argv = Vec::with_capacity(1 + fixed.len() + package_names.len());
    argv.push(manager.executable().to_string());
    argv.extend(fixed.iter().map(|s| s.to_string()));
    argv.extend(package_names.iter().map(|s| s.as_ref().to_string()));
    argv
}
