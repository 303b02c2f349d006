//! Decide which package manager actually runs, given what the caller asked for
//! and what the project and host have.

use crate::detect::Probe;
use crate::manager::PackageManagerKind;
use crate::package_manager::Options;

/// Which of the non-default managers passed the usability check.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Usability {
    pub yarn: bool,
    pub bun: bool,
    pub pnpm: bool,
}

/// Priority policy over precomputed usability.
///
/// A bun request falls back through yarn and pnpm before npm; yarn and pnpm
/// requests fall straight back to npm. npm is never verified.
pub fn choose(requested: PackageManagerKind, usable: Usability) -> PackageManagerKind {
    match requested {
        PackageManagerKind::Bun => {
            if usable.bun {
                PackageManagerKind::Bun
            } else if usable.yarn {
                PackageManagerKind::Yarn
            } else if usable.pnpm {
                PackageManagerKind::Pnpm
            } else {
                PackageManagerKind::Npm
            }
        }
        PackageManagerKind::Yarn if usable.yarn => PackageManagerKind::Yarn,
        PackageManagerKind::Pnpm if usable.pnpm => PackageManagerKind::Pnpm,
        _ => PackageManagerKind::Npm,
    }
}

/// A manager is usable when it was requested or its lock marker is in the
/// project, and in both cases its binary runs.
pub fn should_use<P: Probe + ?Sized>(kind: PackageManagerKind, options: &Options, probe: &P) -> bool {
    if options.package_manager == kind {
        return probe.availability(kind).is_installed();
    }
    probe.is_project_using(kind, &options.root) && probe.availability(kind).is_installed()
}

pub fn usability<P: Probe + ?Sized>(options: &Options, probe: &P) -> Usability {
    Usability {
        yarn: should_use(PackageManagerKind::Yarn, options, probe),
        bun: should_use(PackageManagerKind::Bun, options, probe),
        pnpm: should_use(PackageManagerKind::Pnpm, options, probe),
    }
}

/// Resolve the manager to invoke for `options`.
pub fn resolve<P: Probe + ?Sized>(options: &Options, probe: &P) -> PackageManagerKind {
    resolve_explained(options, probe).0
}

/// Same as [`resolve`], also returning the usability the choice was based on.
pub fn resolve_explained<P: Probe + ?Sized>(
    options: &Options,
    probe: &P,
) -> (PackageManagerKind, Usability) {
    let usable = usability(options, probe);
    (choose(options.package_manager, usable), usable)
}
