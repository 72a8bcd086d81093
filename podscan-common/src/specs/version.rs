// podscan-common/src/specs/version.rs
// CocoaPods-style version strings and constraints on top of `semver`.

use std::fmt;

use semver::Version;

use crate::error::{PodscanError, Result};

/// Parses a pod version, padding short forms (`2.7` -> `2.7.0`).
pub fn parse_version(raw: &str) -> Result<Version> {
    let raw = raw.trim();
    let (core, pre) = match raw.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (raw, None),
    };
    let segments = core.split('.').count();
    if core.is_empty() || segments > 3 {
        return Err(PodscanError::VersionError(format!(
            "Invalid version '{raw}'"
        )));
    }
    let mut padded = core.to_string();
    for _ in segments..3 {
        padded.push_str(".0");
    }
    if let Some(pre) = pre {
        padded.push('-');
        padded.push_str(pre);
    }
    Version::parse(&padded)
        .map_err(|e| PodscanError::VersionError(format!("Invalid version '{raw}': {e}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// `~>`: at least this version, below the next release of the
    /// second-to-last given segment.
    Pessimistic,
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Pessimistic => "~>",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: ConstraintOp,
    version: Version,
    /// Number of release segments written in the constraint, needed for `~>`.
    segments: usize,
}

impl Comparator {
    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let ops = [
            ("~>", ConstraintOp::Pessimistic),
            (">=", ConstraintOp::Ge),
            ("<=", ConstraintOp::Le),
            ("!=", ConstraintOp::Ne),
            ("=", ConstraintOp::Eq),
            (">", ConstraintOp::Gt),
            ("<", ConstraintOp::Lt),
        ];
        let (op, rest) = ops
            .iter()
            .find_map(|(prefix, op)| raw.strip_prefix(*prefix).map(|rest| (*op, rest)))
            .unwrap_or((ConstraintOp::Eq, raw));
        let rest = rest.trim();
        let segments = rest
            .split_once('-')
            .map_or(rest, |(core, _)| core)
            .split('.')
            .count();
        Ok(Self {
            op,
            version: parse_version(rest)?,
            segments,
        })
    }

    fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            ConstraintOp::Eq => candidate == &self.version,
            ConstraintOp::Ne => candidate != &self.version,
            ConstraintOp::Gt => candidate > &self.version,
            ConstraintOp::Ge => candidate >= &self.version,
            ConstraintOp::Lt => candidate < &self.version,
            ConstraintOp::Le => candidate <= &self.version,
            ConstraintOp::Pessimistic => {
                candidate >= &self.version && candidate < &self.pessimistic_upper_bound()
            }
        }
    }

    fn pessimistic_upper_bound(&self) -> Version {
        let v = &self.version;
        match self.segments {
            0 | 1 | 2 => Version::new(v.major + 1, 0, 0),
            _ => Version::new(v.major, v.minor + 1, 0),
        }
    }
}

/// A comma-separated list of comparators, all of which must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    raw: String,
    comparators: Vec<Comparator>,
}

impl VersionConstraint {
    pub fn parse(raw: &str) -> Result<Self> {
        let comparators = raw
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Comparator::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            raw: raw.trim().to_string(),
            comparators,
        })
    }

    /// Matches everything.
    pub fn any() -> Self {
        Self {
            raw: String::new(),
            comparators: Vec::new(),
        }
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comparators.is_empty() {
            f.write_str("*")
        } else {
            f.write_str(&self.raw)
        }
    }
}

/// Parses an optional constraint string; `None` matches any version.
pub fn constraint_for(version: Option<&str>) -> Result<VersionConstraint> {
    match version {
        Some(raw) => VersionConstraint::parse(raw),
        None => Ok(VersionConstraint::any()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    #[test]
    fn pads_short_versions() {
        assert_eq!(v("2.7"), Version::new(2, 7, 0));
        assert_eq!(v("4"), Version::new(4, 0, 0));
        assert_eq!(v("3.0.0-beta.13").pre.as_str(), "beta.13");
        assert_eq!(v("1.2-rc1").to_string(), "1.2.0-rc1");
    }

    #[test]
    fn rejects_bad_versions() {
        assert!(parse_version("").is_err());
        assert!(parse_version("1.2.3.4").is_err());
        assert!(parse_version("abc").is_err());
    }

    #[test]
    fn bare_version_is_exact() {
        let c = VersionConstraint::parse("4.2").unwrap();
        assert!(c.matches(&v("4.2.0")));
        assert!(!c.matches(&v("4.2.1")));
    }

    #[test]
    fn pessimistic_two_segments() {
        let c = VersionConstraint::parse("~> 1.2").unwrap();
        assert!(c.matches(&v("1.2")));
        assert!(c.matches(&v("1.9.9")));
        assert!(!c.matches(&v("2.0")));
        assert!(!c.matches(&v("1.1")));
    }

    #[test]
    fn pessimistic_three_segments() {
        let c = VersionConstraint::parse("~> 1.2.3").unwrap();
        assert!(c.matches(&v("1.2.3")));
        assert!(c.matches(&v("1.2.9")));
        assert!(!c.matches(&v("1.3.0")));
    }

    #[test]
    fn compound_range() {
        let c = VersionConstraint::parse(">= 1.0, < 2, != 1.5").unwrap();
        assert!(c.matches(&v("1.0")));
        assert!(c.matches(&v("1.9")));
        assert!(!c.matches(&v("1.5")));
        assert!(!c.matches(&v("2.0")));
        assert!(!c.matches(&v("0.9")));
    }

    #[test]
    fn missing_constraint_matches_anything() {
        let c = constraint_for(None).unwrap();
        assert!(c.matches(&v("0.0.1")));
        assert!(c.matches(&v("99.0")));
        assert_eq!(c.to_string(), "*");
    }

    #[test]
    fn invalid_constraint_is_version_error() {
        let err = VersionConstraint::parse("~> banana").unwrap_err();
        assert!(matches!(err, PodscanError::VersionError(_)));
    }
}
