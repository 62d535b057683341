//! `package-locks`: names or simple globs that forbid a state change (§4.6).

/// A set of lock patterns (`*`/`?` globs over package names).
#[derive(Debug, Clone, Default)]
pub struct LockSet {
    patterns: Vec<String>,
}

impl LockSet {
    /// Builds a lock set from raw pattern strings.
    #[must_use]
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Whether `name` is covered by any lock pattern.
    #[must_use]
    pub fn is_locked(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| glob_match(p, name))
    }

    /// The raw patterns, for display.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn glob_match(pattern: &str, candidate: &str) -> bool {
    fn rec(p: &[char], c: &[char]) -> bool {
        match p.first() {
            None => c.is_empty(),
            Some('*') => rec(&p[1..], c) || (!c.is_empty() && rec(p, &c[1..])),
            Some('?') => !c.is_empty() && rec(&p[1..], &c[1..]),
            Some(pc) => c.first().is_some_and(|cc| cc == pc) && rec(&p[1..], &c[1..]),
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let c: Vec<char> = candidate.chars().collect();
    rec(&p, &c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_name_is_locked() {
        let locks = LockSet::new(vec!["foo".to_string()]);
        assert!(locks.is_locked("foo"));
        assert!(!locks.is_locked("bar"));
    }

    #[test]
    fn glob_locks_a_family_of_names() {
        let locks = LockSet::new(vec!["lib-*".to_string()]);
        assert!(locks.is_locked("lib-a"));
        assert!(locks.is_locked("lib-"));
        assert!(!locks.is_locked("tool"));
    }
}
