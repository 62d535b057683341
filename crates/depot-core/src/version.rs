//! RPM-style version algebra: `[epoch:]upstream[-release]`.
//!
//! Comparison proceeds epoch, then upstream, then release. Within a segment
//! a version is split into maximal runs of digits and non-digits; digit runs
//! compare numerically (leading zeros stripped), non-digit runs compare
//! character-wise with a tilde sorting before the empty string.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::RwLock;

use ahash::AHashMap;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

/// A single run of characters within a version segment: either all digits
/// or all non-digits.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Run {
    Digits(String),
    Chars(String),
}

fn split_runs(s: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        let is_digit = c.is_ascii_digit();
        let mut buf = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() == is_digit {
                buf.push(c);
                chars.next();
            } else {
                break;
            }
        }
        runs.push(if is_digit { Run::Digits(buf) } else { Run::Chars(buf) });
    }
    runs
}

/// Compares two non-digit runs character by character. A tilde sorts before
/// the empty string (and thus before everything else); beyond that, plain
/// byte-order comparison is used (letters already sort after digits because
/// runs alternate kind, so within a `Chars` run we never see digits).
fn compare_chars(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars();
    let mut bi = b.chars();
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(c)) => return if c == '~' { Ordering::Greater } else { Ordering::Less },
            (Some(c), None) => return if c == '~' { Ordering::Less } else { Ordering::Greater },
            (Some(x), Some(y)) => {
                if x == y {
                    continue;
                }
                return match (x == '~', y == '~') {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => x.cmp(&y),
                };
            }
        }
    }
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    if a.len() != b.len() {
        return a.len().cmp(&b.len());
    }
    a.cmp(b)
}

/// Compares two version segments (upstream or release) per the run-splitting
/// rule in §4.1. A run of one kind is always "lower" than a run of the other
/// kind would be *if the other side ran out of runs*; when both sides still
/// have runs, a digit run only ever compares against a digit run because
/// both strings are split the same way from their start — unless the two
/// segments start with a different kind, which the tilde rule below handles
/// via the missing-run branch.
fn compare_segment(a: &str, b: &str) -> Ordering {
    let ra = split_runs(a);
    let rb = split_runs(b);
    let mut ia = ra.iter();
    let mut ib = rb.iter();
    loop {
        match (ia.next(), ib.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(r)) => {
                return match r {
                    Run::Chars(s) if s.starts_with('~') => Ordering::Greater,
                    _ => Ordering::Less,
                };
            }
            (Some(r), None) => {
                return match r {
                    Run::Chars(s) if s.starts_with('~') => Ordering::Less,
                    _ => Ordering::Greater,
                };
            }
            (Some(Run::Digits(x)), Some(Run::Digits(y))) => {
                let ord = compare_digits(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(Run::Chars(x)), Some(Run::Chars(y))) => {
                let ord = compare_chars(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            // Mismatched run kinds: a digit run outranks a non-digit run,
            // except the non-digit run is a leading tilde, which outranks
            // everything lower.
            (Some(Run::Digits(_)), Some(Run::Chars(y))) => {
                return if y.starts_with('~') { Ordering::Greater } else { Ordering::Less };
            }
            (Some(Run::Chars(x)), Some(Run::Digits(_))) => {
                return if x.starts_with('~') { Ordering::Less } else { Ordering::Greater };
            }
        }
    }
}

/// A parsed `[epoch:]upstream[-release]` version.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    upstream: String,
    release: Option<String>,
    raw: String,
}

const VERSION_CACHE_LIMIT: usize = 4096;

static VERSION_CACHE: Lazy<RwLock<AHashMap<String, Version>>> =
    Lazy::new(|| RwLock::new(AHashMap::new()));

impl Version {
    /// Parses a version string, consulting the process-wide parse cache first.
    pub fn parse(input: &str) -> Result<Self> {
        if let Some(cached) = VERSION_CACHE.read().unwrap().get(input) {
            return Ok(cached.clone());
        }
        let parsed = Self::parse_uncached(input)?;
        let mut cache = VERSION_CACHE.write().unwrap();
        if cache.len() >= VERSION_CACHE_LIMIT {
            // Half-evict: drop every other entry rather than clearing entirely,
            // so hot versions parsed early in a run stay cached.
            let keys: Vec<String> = cache.keys().step_by(2).cloned().collect();
            for key in keys {
                cache.remove(&key);
            }
        }
        cache.insert(input.to_string(), parsed.clone());
        Ok(parsed)
    }

    fn parse_uncached(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::version_parse(input, "version string is empty"));
        }
        let (epoch_str, rest) = match input.split_once(':') {
            Some((e, r)) => (Some(e), r),
            None => (None, input),
        };
        let epoch = match epoch_str {
            None => 0,
            Some(e) => e
                .parse::<u64>()
                .map_err(|_| Error::version_parse(input, format!("epoch '{e}' is not an integer")))?,
        };
        if rest.is_empty() {
            return Err(Error::version_parse(input, "upstream component is empty"));
        }
        let (upstream, release) = match rest.rsplit_once('-') {
            Some((u, r)) => (u.to_string(), Some(r.to_string())),
            None => (rest.to_string(), None),
        };
        if upstream.is_empty() {
            return Err(Error::version_parse(input, "upstream component is empty"));
        }
        Ok(Version {
            epoch,
            upstream,
            release,
            raw: input.to_string(),
        })
    }

    /// The epoch component (`0` when absent from the source string).
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The upstream component.
    #[must_use]
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// The release component, if present.
    #[must_use]
    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }

    /// The original string this version was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Three-way comparison per §4.1: epoch, then upstream, then release.
    /// A missing release on either side (when both are missing) compares
    /// equal; when exactly one side has a release, the side with a release
    /// sorts higher.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.epoch != other.epoch {
            return self.epoch.cmp(&other.epoch);
        }
        let ord = compare_segment(&self.upstream, &other.upstream);
        if ord != Ordering::Equal {
            return ord;
        }
        match (&self.release, &other.release) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => compare_segment(a, b),
        }
    }

    /// A string that two versions share iff `compare` calls them equal.
    ///
    /// `compare` normalizes away an implicit vs. explicit zero epoch and
    /// leading zeros within a digit run (`"1.0"` and `"0:1.0"` compare
    /// equal, as do `"1.09"` and `"1.9"`), so the raw input string is not a
    /// valid hash/identity key on its own. This rebuilds each segment from
    /// its runs with digit runs trimmed the same way `compare_digits` trims
    /// them, which is exactly the normalization equality depends on.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        let mut out = String::with_capacity(self.raw.len() + 8);
        out.push_str(&self.epoch.to_string());
        out.push('\u{1}');
        push_canonical_segment(&mut out, &self.upstream);
        out.push('\u{1}');
        match &self.release {
            Some(release) => {
                out.push('S');
                push_canonical_segment(&mut out, release);
            }
            None => out.push('N'),
        }
        out
    }
}

fn push_canonical_segment(out: &mut String, segment: &str) {
    for run in split_runs(segment) {
        match run {
            Run::Digits(d) => {
                let trimmed = d.trim_start_matches('0');
                out.push_str(if trimmed.is_empty() { "0" } else { trimmed });
            }
            Run::Chars(c) => out.push_str(&c),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_key().hash(state);
    }
}

/// The relation operators a [`crate::relation::Depends`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelOp {
    /// No version constraint; matches any Provides of the same name.
    None,
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        };
        write!(f, "{s}")
    }
}

/// Evaluates `provides_version rel depends_version` per §4.1.
///
/// A missing release on the depends side is a wildcard when the relation is
/// `=`: it matches any release of a matching upstream. An explicit release
/// requires an exact match.
#[must_use]
pub fn relation_holds(rel: RelOp, provides_version: &Version, depends_version: &Version) -> bool {
    if rel == RelOp::Eq && depends_version.release().is_none() {
        return provides_version.epoch() == depends_version.epoch()
            && compare_segment(provides_version.upstream(), depends_version.upstream()) == Ordering::Equal;
    }
    let ord = provides_version.compare(depends_version);
    match rel {
        RelOp::None => true,
        RelOp::Eq => ord == Ordering::Equal,
        RelOp::Ne => ord != Ordering::Equal,
        RelOp::Lt => ord == Ordering::Less,
        RelOp::Le => ord != Ordering::Greater,
        RelOp::Gt => ord == Ordering::Greater,
        RelOp::Ge => ord != Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn hash_of(v: &Version) -> u64 {
        use std::hash::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn compare_is_reflexive() {
        for s in ["1.0", "0:1.0-1", "2:1.0", "1.0-2", "1.0a", "1.0~rc1"] {
            assert_eq!(v(s).compare(&v(s)), Ordering::Equal, "{s}");
        }
    }

    #[test]
    fn missing_epoch_is_zero() {
        assert_eq!(v("1.0").compare(&v("0:1.0")), Ordering::Equal);
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert_eq!(v("1.9").compare(&v("1.10")), Ordering::Less);
        assert_eq!(v("1.09").compare(&v("1.9")), Ordering::Equal);
    }

    #[test]
    fn equal_versions_hash_equal() {
        let pairs = [("1.0", "0:1.0"), ("1.09", "1.9"), ("1.0", "1.0"), ("1.2-3", "1.2-03")];
        for (a, b) in pairs {
            let (va, vb) = (v(a), v(b));
            assert_eq!(va, vb, "{a} vs {b} should compare equal");
            assert_eq!(hash_of(&va), hash_of(&vb), "{a} vs {b} should hash equal");
        }
    }

    #[test]
    fn distinguishes_missing_release_from_empty_release() {
        assert_ne!(v("1.0"), v("1.0-"));
        assert_ne!(hash_of(&v("1.0")), hash_of(&v("1.0-")));
    }

    #[test]
    fn tilde_sorts_before_empty() {
        assert_eq!(v("1.0~rc1").compare(&v("1.0")), Ordering::Less);
        assert_eq!(v("1.0~rc1").compare(&v("1.0~rc2")), Ordering::Less);
    }

    #[test]
    fn higher_epoch_always_wins() {
        assert_eq!(v("2:1.0").compare(&v("1:99.0")), Ordering::Greater);
    }

    #[test]
    fn release_presence_breaks_ties() {
        assert_eq!(v("1.0").compare(&v("1.0-1")), Ordering::Less);
        assert_eq!(v("1.0-1").compare(&v("1.0-2")), Ordering::Less);
    }

    #[test]
    fn eq_relation_without_release_is_wildcard() {
        let provides = v("1.2-3");
        let depends = v("1.2");
        assert!(relation_holds(RelOp::Eq, &provides, &depends));
    }

    #[test]
    fn eq_relation_with_release_is_exact() {
        let provides = v("1.2-3");
        let depends = v("1.2-4");
        assert!(!relation_holds(RelOp::Eq, &provides, &depends));
        assert!(relation_holds(RelOp::Eq, &provides, &v("1.2-3")));
    }

    #[test]
    fn ge_relation() {
        assert!(relation_holds(RelOp::Ge, &v("1.2"), &v("1.0")));
        assert!(!relation_holds(RelOp::Ge, &v("1.0"), &v("1.2")));
    }

    #[test]
    fn rejects_empty_upstream() {
        assert!(Version::parse("1:").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn total_ordering_is_transitive_on_a_sample() {
        let samples = ["0.9", "1.0~rc1", "1.0~rc2", "1.0", "1.0-1", "1.0-2", "1:0.1", "2:0.0"];
        let versions: Vec<Version> = samples.iter().map(|s| v(s)).collect();
        for i in 0..versions.len() {
            for j in 0..versions.len() {
                for k in 0..versions.len() {
                    if versions[i] <= versions[j] && versions[j] <= versions[k] {
                        assert!(versions[i] <= versions[k], "{i} {j} {k}");
                    }
                }
            }
        }
    }
}
