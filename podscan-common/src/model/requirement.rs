// podscan-common/src/model/requirement.rs
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between a pod name and a subspec path (`SDWebImage/GIF`).
pub const SUBSPEC_SEPARATOR: char = '/';

/// Returns the pod name of a possibly qualified name (`Texture/Core` -> `Texture`).
pub fn root_name(name: &str) -> &str {
    name.split_once(SUBSPEC_SEPARATOR)
        .map_or(name, |(root, _)| root)
}

/// Which subspecs of a pod a requirement asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubspecSelection {
    /// No subspec named: the pod's full set of subspecs is included.
    #[default]
    Unqualified,
    /// Only the named subspec paths (relative to the pod, e.g. `GIF` or `Core/Cache`).
    Qualified(BTreeSet<String>),
}

impl SubspecSelection {
    pub fn qualified<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Qualified(paths.into_iter().map(Into::into).collect())
    }

    pub fn is_unqualified(&self) -> bool {
        matches!(self, Self::Unqualified)
    }

    /// Combines two selections for the same pod. Unqualified absorbs everything.
    pub fn merge(&mut self, other: &SubspecSelection) {
        match (&mut *self, other) {
            (Self::Unqualified, _) => {}
            (_, Self::Unqualified) => *self = Self::Unqualified,
            (Self::Qualified(mine), Self::Qualified(theirs)) => {
                mine.extend(theirs.iter().cloned());
            }
        }
    }
}

/// One requested pod: name, optional version constraint, subspec selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub subspecs: SubspecSelection,
}

impl Requirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            subspecs: SubspecSelection::Unqualified,
        }
    }

    /// Parses a possibly qualified name. `Pod/Sub/Nested` becomes pod `Pod`
    /// with the single subspec path `Sub/Nested`.
    pub fn parse(qualified_name: &str) -> Self {
        match qualified_name.split_once(SUBSPEC_SEPARATOR) {
            Some((root, path)) if !path.is_empty() => Self {
                name: root.to_string(),
                version: None,
                subspecs: SubspecSelection::qualified([path]),
            },
            _ => Self::new(root_name(qualified_name)),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_subspecs<I, S>(mut self, subspecs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requested = SubspecSelection::qualified(subspecs);
        if self.subspecs.is_unqualified() {
            self.subspecs = requested;
        } else {
            self.subspecs.merge(&requested);
        }
        self
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let SubspecSelection::Qualified(paths) = &self.subspecs {
            let joined: Vec<&str> = paths.iter().map(String::as_str).collect();
            write!(f, "/{{{}}}", joined.join(","))?;
        }
        if let Some(v) = &self.version {
            write!(f, " ({v})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_name_is_unqualified() {
        let req = Requirement::parse("Masonry");
        assert_eq!(req.name, "Masonry");
        assert!(req.subspecs.is_unqualified());
    }

    #[test]
    fn parse_splits_at_first_separator() {
        let req = Requirement::parse("PINRemoteImage/Core/Cache");
        assert_eq!(req.name, "PINRemoteImage");
        assert_eq!(
            req.subspecs,
            SubspecSelection::qualified(["Core/Cache"])
        );
    }

    #[test]
    fn parse_trailing_separator_falls_back_to_pod() {
        let req = Requirement::parse("SDWebImage/");
        assert_eq!(req.name, "SDWebImage");
        assert!(req.subspecs.is_unqualified());
    }

    #[test]
    fn root_name_strips_subspec_path() {
        assert_eq!(root_name("Texture/PINRemoteImage"), "Texture");
        assert_eq!(root_name("Yoga"), "Yoga");
    }

    #[test]
    fn unqualified_absorbs_on_merge() {
        let mut sel = SubspecSelection::qualified(["GIF"]);
        sel.merge(&SubspecSelection::qualified(["WebP"]));
        assert_eq!(sel, SubspecSelection::qualified(["GIF", "WebP"]));

        sel.merge(&SubspecSelection::Unqualified);
        assert!(sel.is_unqualified());
    }

    #[test]
    fn display_shows_subspecs_and_version() {
        let req = Requirement::new("Texture")
            .with_version("2.7")
            .with_subspecs(["Yoga", "IGListKit"]);
        assert_eq!(req.to_string(), "Texture/{IGListKit,Yoga} (2.7)");
    }
}
