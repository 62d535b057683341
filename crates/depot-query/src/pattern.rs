//! Name matching: exact, shell glob, or regex (§4.5).

use depot_core::{Error, Result};
use regex::Regex;

/// A compiled name matcher.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches only the exact string.
    Exact(String),
    /// `*`/`?` shell glob, translated to an anchored regex.
    Glob(Regex),
    /// A user-supplied regex, used verbatim (anchored by the caller's intent,
    /// not by us — `^foo$` and `foo` both work as the user wrote them).
    Regex(Regex),
}

impl Pattern {
    /// Builds a pattern. When `regex` is true, `text` is compiled as a regex;
    /// otherwise `text` is treated as an exact match unless it contains glob
    /// metacharacters (`*`, `?`, `[`), in which case it is translated to one.
    pub fn compile(text: &str, regex: bool) -> Result<Self> {
        if regex {
            return Regex::new(text).map(Self::Regex).map_err(|e| Error::pattern(text, e.to_string()));
        }
        if text.contains(['*', '?', '[']) {
            let translated = glob_to_regex(text);
            return Regex::new(&translated).map(Self::Glob).map_err(|e| Error::pattern(text, e.to_string()));
        }
        Ok(Self::Exact(text.to_string()))
    }

    /// Whether `candidate` matches this pattern.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(s) => s == candidate,
            Self::Glob(re) | Self::Regex(re) => re.is_match(candidate),
        }
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' | ']' => out.push(c),
            '.' | '+' | '(' | ')' | '|' | '^' | '$' | '\\' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_pattern_matches_only_identical_text() {
        let p = Pattern::compile("libx", false).unwrap();
        assert!(p.matches("libx"));
        assert!(!p.matches("libx2"));
    }

    #[test]
    fn glob_star_matches_any_suffix() {
        let p = Pattern::compile("lib*", false).unwrap();
        assert!(p.matches("libx"));
        assert!(p.matches("lib"));
        assert!(!p.matches("mylib"));
    }

    #[test]
    fn regex_mode_compiles_text_verbatim() {
        let p = Pattern::compile("^lib[xy]$", true).unwrap();
        assert!(p.matches("libx"));
        assert!(p.matches("liby"));
        assert!(!p.matches("libz"));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(Pattern::compile("(unterminated", true).is_err());
    }
}
