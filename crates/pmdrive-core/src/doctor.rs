//! Check installed tools against the version-range table.

use serde::Serialize;

use crate::detect::{self, Availability};
use crate::versions::Tool;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Outdated,
    Missing,
    /// Installed, but its version could not be read or compared.
    Unknown,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ToolCheck {
    pub name: &'static str,
    pub program: &'static str,
    pub range: Option<&'static str>,
    pub version: Option<String>,
    pub status: CheckStatus,
}

/// (display name, executable, range it is checked against)
const CHECKED_TOOLS: [(&str, &str, Option<Tool>); 6] = [
    ("Node.js", "node", Some(Tool::NodeJs)),
    ("npm", "npm", Some(Tool::Npm)),
    ("Yarn", "yarn", Some(Tool::Yarn)),
    ("pnpm", "pnpm", None),
    ("Bun", "bun", None),
    ("CocoaPods", "pod", Some(Tool::Cocoapods)),
];

/// Probe every tool on this host.
pub fn check_tools() -> Vec<ToolCheck> {
    check_tools_with(detect::tool_availability)
}

/// Same as [`check_tools`] with a custom probe.
pub fn check_tools_with<F>(probe: F) -> Vec<ToolCheck>
where
    F: Fn(&str) -> Availability,
{
    CHECKED_TOOLS
        .iter()
        .map(|&(name, program, tool)| {
            let availability = probe(program);
            let version = availability.version().map(String::from);
            let status = classify(&availability, tool);
            ToolCheck {
                name,
                program,
                range: tool.map(Tool::range),
                version,
                status,
            }
        })
        .collect()
}

fn classify(availability: &Availability, tool: Option<Tool>) -> CheckStatus {
    match (availability, tool) {
        (Availability::Missing, _) => CheckStatus::Missing,
        (Availability::Installed { .. }, None) => CheckStatus::Ok,
        (Availability::Installed { version: None }, Some(_)) => CheckStatus::Unknown,
        (Availability::Installed { version: Some(v) }, Some(tool)) => match tool.satisfied_by(v) {
            Ok(true) => CheckStatus::Ok,
            Ok(false) => CheckStatus::Outdated,
            Err(_) => CheckStatus::Unknown,
        },
    }
}

/// True when nothing required is missing or too old. pnpm, Bun and CocoaPods are optional.
pub fn is_healthy(checks: &[ToolCheck]) -> bool {
    checks.iter().all(|c| match c.program {
        "node" | "npm" => c.status == CheckStatus::Ok || c.status == CheckStatus::Unknown,
        _ => c.status != CheckStatus::Outdated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(v: &str) -> Availability {
        Availability::Installed {
            version: Some(v.to_string()),
        }
    }

    #[test]
    fn classifies_each_tool() {
        let checks = check_tools_with(|program| match program {
            "node" => installed("v20.11.0"),
            "npm" => installed("10.2.4"),
            "yarn" => installed("1.9.4"),
            "pnpm" => installed("9.1.0"),
            "bun" => Availability::Missing,
            "pod" => Availability::Installed { version: None },
            _ => Availability::Missing,
        });
        let status: Vec<(&str, CheckStatus)> = checks.iter().map(|c| (c.program, c.status)).collect();
        assert_eq!(
            status,
            vec![
                ("node", CheckStatus::Ok),
                ("npm", CheckStatus::Ok),
                ("yarn", CheckStatus::Outdated),
                ("pnpm", CheckStatus::Ok),
                ("bun", CheckStatus::Missing),
                ("pod", CheckStatus::Unknown),
            ]
        );
        assert_eq!(checks[0].range, Some(">= 14"));
        assert_eq!(checks[3].range, None);
        assert!(!is_healthy(&checks), "outdated yarn is unhealthy");
    }

    #[test]
    fn missing_node_is_unhealthy_missing_bun_is_not() {
        let without_bun = check_tools_with(|program| match program {
            "node" => installed("18.0.0"),
            "npm" => installed("9.0.0"),
            _ => Availability::Missing,
        });
        assert!(is_healthy(&without_bun));

        let without_node = check_tools_with(|program| match program {
            "npm" => installed("9.0.0"),
            _ => Availability::Missing,
        });
        assert!(!is_healthy(&without_node));
    }

    #[test]
    fn serializes_status_lowercase() {
        let json = serde_json::to_value(CheckStatus::Outdated).expect("serialize");
        assert_eq!(json, serde_json::json!("outdated"));
    }
}
