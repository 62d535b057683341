//! Provides / Requires / Conflicts / Obsoletes relation primitives (§3, §4.2).

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::version::{relation_holds, RelOp, Version};

/// A capability a package advertises. Version-less Provides match only
/// version-less Depends.
#[derive(Debug, Clone)]
pub struct Provides {
    name: Arc<str>,
    version: Option<Version>,
}

impl Provides {
    /// Creates a Provides with an optional version.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, version: Option<Version>) -> Self {
        Self { name: name.into(), version }
    }

    /// The capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The advertised version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

impl fmt::Display for Provides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

impl PartialEq for Provides {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}
impl Eq for Provides {}

impl PartialOrd for Provides {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Provides {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then_with(|| self.version.cmp(&other.version))
    }
}

/// The shared shape of Requires / Conflicts / Obsoletes: `(name, relation, version)`.
#[derive(Debug, Clone)]
pub struct Depends {
    name: Arc<str>,
    relation: RelOp,
    version: Option<Version>,
}

impl Depends {
    /// Creates a Depends. `version` should be `None` iff `relation` is `RelOp::None`.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, relation: RelOp, version: Option<Version>) -> Self {
        Self { name: name.into(), relation, version }
    }

    /// The required/conflicting/obsoleted capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The relation operator.
    #[must_use]
    pub const fn relation(&self) -> RelOp {
        self.relation
    }

    /// The version operand, if the relation carries one.
    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Whether this Depends is satisfied by the given Provides.
    ///
    /// Returns false if names differ. Returns true if neither side carries a
    /// version. Otherwise delegates to the version algebra; an absent
    /// Provides version with a present Depends version never matches.
    #[must_use]
    pub fn matches(&self, provides: &Provides) -> bool {
        if self.name.as_ref() != provides.name() {
            return false;
        }
        match (provides.version(), &self.version) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(_), None) => self.relation == RelOp::None,
            (Some(pv), Some(dv)) => relation_holds(self.relation, pv, dv),
        }
    }
}

impl fmt::Display for Depends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}{}{}", self.name, self.relation, v),
            None => write!(f, "{}", self.name),
        }
    }
}

impl PartialEq for Depends {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.relation == other.relation && self.version == other.version
    }
}
impl Eq for Depends {}

impl PartialOrd for Depends {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Depends {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.relation.cmp(&other.relation))
            .then_with(|| self.version.cmp(&other.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ver(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn versionless_provides_matches_only_versionless_depends() {
        let p = Provides::new("libx", None);
        let d = Depends::new("libx", RelOp::None, None);
        assert!(d.matches(&p));

        let d2 = Depends::new("libx", RelOp::Ge, Some(ver("1.0")));
        assert!(!d2.matches(&p));
    }

    #[test]
    fn name_only_match_when_depends_has_no_relation() {
        let p = Provides::new("libx", Some(ver("1.2")));
        let d = Depends::new("libx", RelOp::None, None);
        assert!(d.matches(&p));
    }

    #[test]
    fn versioned_match_delegates_to_version_algebra() {
        let p = Provides::new("libx", Some(ver("1.2")));
        let ok = Depends::new("libx", RelOp::Ge, Some(ver("1.0")));
        let bad = Depends::new("libx", RelOp::Ge, Some(ver("2.0")));
        assert!(ok.matches(&p));
        assert!(!bad.matches(&p));
    }

    #[test]
    fn name_mismatch_never_matches() {
        let p = Provides::new("liby", Some(ver("1.2")));
        let d = Depends::new("libx", RelOp::None, None);
        assert!(!d.matches(&p));
    }

    #[test]
    fn ordering_is_lexicographic_on_name_relation_version() {
        let a = Depends::new("a", RelOp::Eq, Some(ver("1.0")));
        let b = Depends::new("b", RelOp::None, None);
        assert!(a < b);
    }
}
