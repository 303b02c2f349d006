//! Minimum tool versions for React Native development, as semver range strings.
//! Diagnostics compare installed versions against these.

use semver::{Version, VersionReq};
use serde::Serialize;

// Common
pub const NODE_JS: &str = ">= 14";
pub const YARN: &str = ">= 1.10.x";
pub const NPM: &str = ">= 4.x";
pub const JAVA: &str = ">= 11";
// Android
pub const ANDROID_SDK: &str = ">= 33.x";
pub const ANDROID_NDK: &str = ">= 23.x";
// iOS
pub const XCODE: &str = ">= 12.x";
pub const COCOAPODS: &str = ">= 1.10.0";

/// The whole table; serializes with the uppercase keys.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VersionRanges {
    pub node_js: &'static str,
    pub yarn: &'static str,
    pub npm: &'static str,
    pub java: &'static str,
    pub android_sdk: &'static str,
    pub android_ndk: &'static str,
    pub xcode: &'static str,
    pub cocoapods: &'static str,
}

pub const VERSION_RANGES: VersionRanges = VersionRanges {
    node_js: NODE_JS,
    yarn: YARN,
    npm: NPM,
    java: JAVA,
    android_sdk: ANDROID_SDK,
    android_ndk: ANDROID_NDK,
    xcode: XCODE,
    cocoapods: COCOAPODS,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Tool {
    NodeJs,
    Yarn,
    Npm,
    Java,
    AndroidSdk,
    AndroidNdk,
    Xcode,
    Cocoapods,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::NodeJs,
        Tool::Yarn,
        Tool::Npm,
        Tool::Java,
        Tool::AndroidSdk,
        Tool::AndroidNdk,
        Tool::Xcode,
        Tool::Cocoapods,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Tool::NodeJs => "NODE_JS",
            Tool::Yarn => "YARN",
            Tool::Npm => "NPM",
            Tool::Java => "JAVA",
            Tool::AndroidSdk => "ANDROID_SDK",
            Tool::AndroidNdk => "ANDROID_NDK",
            Tool::Xcode => "XCODE",
            Tool::Cocoapods => "COCOAPODS",
        }
    }

    pub fn from_key(key: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn range(self) -> &'static str {
        match self {
            Tool::NodeJs => VERSION_RANGES.node_js,
            Tool::Yarn => VERSION_RANGES.yarn,
            Tool::Npm => VERSION_RANGES.npm,
            Tool::Java => VERSION_RANGES.java,
            Tool::AndroidSdk => VERSION_RANGES.android_sdk,
            Tool::AndroidNdk => VERSION_RANGES.android_ndk,
            Tool::Xcode => VERSION_RANGES.xcode,
            Tool::Cocoapods => VERSION_RANGES.cocoapods,
        }
    }

    /// Parsed requirement. The table only holds ranges this accepts.
    pub fn requirement(self) -> Result<VersionReq, String> {
        parse_range(self.range())
    }

    /// Whether an installed `version` (as the tool prints it) meets the range.
    pub fn satisfied_by(self, version: &str) -> Result<bool, String> {
        let req = self.requirement()?;
        let v = parse_loose_version(version)
            .ok_or_else(|| format!("cannot read a version from '{}'", version))?;
        Ok(req.matches(&v))
    }
}

/// Look up a range by its uppercase key.
pub fn range_for(key: &str) -> Option<&'static str> {
    Tool::from_key(key).map(Tool::range)
}

/// Parse npm-style range syntax with `semver`: allows a space after the
/// operator and trailing `.x` wildcards (`>= 1.10.x` reads as `>=1.10`).
pub fn parse_range(range: &str) -> Result<VersionReq, String> {
    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in range.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let (op, rest) = split_operator(token);
        if rest.is_empty() {
            pending_op.push_str(op);
            continue;
        }
        let version = strip_wildcards(rest);
        let op = format!("{}{}", pending_op, op);
        pending_op.clear();
        if version == "*" {
            comparators.push("*".to_string());
        } else {
            comparators.push(format!("{}{}", op, version));
        }
    }
    if comparators.is_empty() {
        return Err(format!("empty version range '{}'", range));
    }
    VersionReq::parse(&comparators.join(", ")).map_err(|e| format!("invalid range '{}': {}", range, e))
}

fn split_operator(token: &str) -> (&str, &str) {
    let rest = token.trim_start_matches(|c| matches!(c, '<' | '>' | '=' | '~' | '^'));
    (&token[..token.len() - rest.len()], rest)
}

fn strip_wildcards(version: &str) -> &str {
    let mut v = version.trim_start_matches(['v', 'V']);
    loop {
        if let Some(rest) = v
            .strip_suffix(".x")
            .or_else(|| v.strip_suffix(".X"))
            .or_else(|| v.strip_suffix(".*"))
        {
            v = rest;
        } else {
            break;
        }
    }
    if v.is_empty() || v == "x" || v == "X" {
        "*"
    } else {
        v
    }
}

/// Read a version out of tool output such as `v18.12.1`, `1.22.19`, `17` or
/// `11.0.2+8`. Missing components are zero; pre-release and build tags are dropped.
pub fn parse_loose_version(raw: &str) -> Option<Version> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut parts = digits.split('.').filter(|p| !p.is_empty()).map(str::parse::<u64>);
    let major = parts.next()?.ok()?;
    let minor = parts.next().transpose().ok()?.unwrap_or(0);
    let patch = parts.next().transpose().ok()?.unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_range_is_fourteen_and_up() {
        assert_eq!(VERSION_RANGES.node_js, ">= 14");
        assert_eq!(range_for("NODE_JS"), Some(">= 14"));
    }

    #[test]
    fn all_eight_keys_present_and_non_empty() {
        let json = serde_json::to_value(VERSION_RANGES).expect("serialize");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 8);
        for tool in Tool::ALL {
            let value = obj.get(tool.key()).and_then(|v| v.as_str()).expect(tool.key());
            assert!(!value.is_empty());
            assert_eq!(value, tool.range());
        }
    }

    #[test]
    fn unknown_key_has_no_range() {
        assert_eq!(range_for("node_js"), None);
        assert_eq!(range_for("GRADLE"), None);
    }

    #[test]
    fn every_range_parses() {
        for tool in Tool::ALL {
            tool.requirement().unwrap_or_else(|e| panic!("{}: {}", tool.key(), e));
        }
    }

    #[test]
    fn wildcard_ranges_compare_by_prefix() {
        assert_eq!(Tool::Yarn.satisfied_by("1.22.19"), Ok(true));
        assert_eq!(Tool::Yarn.satisfied_by("1.10.0"), Ok(true));
        assert_eq!(Tool::Yarn.satisfied_by("1.9.4"), Ok(false));
        assert_eq!(Tool::Npm.satisfied_by("3.10.10"), Ok(false));
        assert_eq!(Tool::Npm.satisfied_by("10.2.4"), Ok(true));
    }

    #[test]
    fn loose_versions_from_tool_output() {
        assert_eq!(Tool::NodeJs.satisfied_by("v18.12.1"), Ok(true));
        assert_eq!(Tool::NodeJs.satisfied_by("v12.22.0"), Ok(false));
        assert_eq!(Tool::Java.satisfied_by("17"), Ok(true));
        assert_eq!(Tool::Java.satisfied_by("1.8.0_292"), Ok(false));
        assert_eq!(Tool::Cocoapods.satisfied_by("1.10.0"), Ok(true));
        assert_eq!(Tool::Xcode.satisfied_by("Xcode 15.0"), Ok(true));
        assert!(Tool::NodeJs.satisfied_by("not installed").is_err());
    }

    #[test]
    fn parse_range_handles_compound_ranges() {
        let req = parse_range(">= 1.2.x < 2").expect("range");
        assert!(req.matches(&Version::new(1, 5, 0)));
        assert!(!req.matches(&Version::new(2, 0, 0)));
        assert!(parse_range("  ").is_err());
    }
}
