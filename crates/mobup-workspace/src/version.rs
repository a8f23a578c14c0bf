//! Lenient ordering for Go module versions

use std::cmp::Ordering;
use std::fmt;

/// A version as written in `modules.txt`.
///
/// Parseable versions compare by semver precedence, so pre-releases and Go
/// pseudo-versions sort below the release they precede. Anything that does
/// not parse ranks below every parseable version.
#[derive(Debug, Clone)]
pub struct ModuleVersion {
    raw: String,
    parsed: Option<semver::Version>,
}

impl ModuleVersion {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            parsed: parse_lenient(raw),
        }
    }

    /// Placeholder for a module line that carries no version
    pub fn unknown() -> Self {
        Self {
            raw: String::new(),
            parsed: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn semver(&self) -> Option<&semver::Version> {
        self.parsed.as_ref()
    }

    /// Strictly higher than `other`; equal versions are not newer
    pub fn is_newer(&self, other: &ModuleVersion) -> bool {
        self.cmp(other) == Ordering::Greater
    }
}

/// Strips a leading `v` and pads missing minor/patch components
fn parse_lenient(raw: &str) -> Option<semver::Version> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
    if body.is_empty() {
        return None;
    }

    let core_end = body.find(['-', '+']).unwrap_or(body.len());
    let (core, suffix) = body.split_at(core_end);
    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    semver::Version::parse(&format!("{}{}", parts.join("."), suffix)).ok()
}

impl PartialEq for ModuleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ModuleVersion {}

impl PartialOrd for ModuleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.parsed, &other.parsed) {
            (Some(a), Some(b)) => a.cmp_precedence(b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> ModuleVersion {
        ModuleVersion::parse(raw)
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(v("v1.12").semver().unwrap().to_string(), "1.12.0");
        assert_eq!(v("1").semver().unwrap().to_string(), "1.0.0");
        assert_eq!(v("v2.0.1").semver().unwrap().to_string(), "2.0.1");
        assert!(v("v0.0.0-20190312151545-0bb0c0a6e846").semver().is_some());
        assert!(v("v2.0.0+incompatible").semver().is_some());
        assert!(v("latest").semver().is_none());
        assert!(v("").semver().is_none());
        assert!(v("1..2").semver().is_none());
    }

    #[test]
    fn test_ordering() {
        assert!(v("v1.3.0").is_newer(&v("v1.2.0")));
        assert!(!v("v1.2.0").is_newer(&v("v1.3.0")));
        assert!(v("v1.10.0").is_newer(&v("v1.9.9")));
        assert!(v("v1.0.0").is_newer(&v("v1.0.0-rc.1")));
        assert!(v("v0.0.1").is_newer(&v("v0.0.0-20190312151545-0bb0c0a6e846")));
    }

    #[test]
    fn test_equal_versions_are_not_newer() {
        assert!(!v("v1.2").is_newer(&v("v1.2.0")));
        assert!(!v("v2.0.0+incompatible").is_newer(&v("v2.0.0")));
    }

    #[test]
    fn test_unparseable_ranks_lowest() {
        assert!(v("v0.0.1").is_newer(&v("garbage")));
        assert!(!v("garbage").is_newer(&v("v0.0.1")));
        assert!(!v("garbage").is_newer(&ModuleVersion::unknown()));
    }
}
