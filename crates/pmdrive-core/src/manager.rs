//! The four package managers pmdrive knows how to drive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which package manager to invoke.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Yarn,
    Npm,
    Bun,
    Pnpm,
}

impl PackageManagerKind {
    pub const ALL: [PackageManagerKind; 4] = [
        PackageManagerKind::Yarn,
        PackageManagerKind::Npm,
        PackageManagerKind::Bun,
        PackageManagerKind::Pnpm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PackageManagerKind::Yarn => "yarn",
            PackageManagerKind::Npm => "npm",
            PackageManagerKind::Bun => "bun",
            PackageManagerKind::Pnpm => "pnpm",
        }
    }

    /// Executable spawned for this manager. On Windows these are `.cmd` shims,
    /// which `exec::command_for` resolves on PATH.
    pub fn executable(self) -> &'static str {
        self.as_str()
    }

    /// Files whose presence means the project was set up with this manager.
    /// Bun switched from the binary `bun.lockb` to the text `bun.lock` in 1.2.
    pub fn lock_markers(self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Yarn => &["yarn.lock"],
            PackageManagerKind::Npm => &["package-lock.json"],
            PackageManagerKind::Bun => &["bun.lockb", "bun.lock"],
            PackageManagerKind::Pnpm => &["pnpm-lock.yaml"],
        }
    }
}

impl Default for PackageManagerKind {
    fn default() -> Self {
        PackageManagerKind::Npm
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManagerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yarn" => Ok(PackageManagerKind::Yarn),
            "npm" => Ok(PackageManagerKind::Npm),
            "bun" => Ok(PackageManagerKind::Bun),
            "pnpm" => Ok(PackageManagerKind::Pnpm),
            other => Err(format!(
                "unknown package manager '{}' (expected yarn, npm, bun or pnpm)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Yarn".parse::<PackageManagerKind>(), Ok(PackageManagerKind::Yarn));
        assert_eq!(" pnpm ".parse::<PackageManagerKind>(), Ok(PackageManagerKind::Pnpm));
        assert!("deno".parse::<PackageManagerKind>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for kind in PackageManagerKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
            assert_eq!(kind.as_str().parse::<PackageManagerKind>(), Ok(kind));
        }
    }

    #[test]
    fn every_manager_has_a_lock_marker() {
        for kind in PackageManagerKind::ALL {
            assert!(!kind.lock_markers().is_empty());
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&PackageManagerKind::Pnpm).expect("serialize");
        assert_eq!(json, "\"pnpm\"");
        let back: PackageManagerKind = serde_json::from_str("\"bun\"").expect("deserialize");
        assert_eq!(back, PackageManagerKind::Bun);
    }
}
