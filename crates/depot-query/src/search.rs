//! Package search: exact/glob/regex hits, falling back to fuzzy suggestions (§4.5).

use depot_cache::Cache;
use depot_core::{Package, PackageId, Result};

use crate::fuzzy::{ratio, DEFAULT_MIN_RATIO};
use crate::pattern::Pattern;

/// A fuzzy suggestion: a package name and its similarity ratio to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// The candidate package.
    pub package: PackageId,
    /// Similarity ratio in `[0, 1]`.
    pub ratio: f64,
}

/// The outcome of a search: exact/glob/regex hits, or — if there were none —
/// fuzzy suggestions ranked by descending ratio.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Packages whose name matched the pattern.
    pub hits: Vec<PackageId>,
    /// Ranked fuzzy suggestions, populated only when `hits` is empty.
    pub suggestions: Vec<Suggestion>,
}

/// Searches `cache` for packages whose name matches `text`.
///
/// `text` is compiled via [`Pattern::compile`] (exact, glob, or regex per
/// `regex`). On a miss, every known package name is scored against `text`
/// with [`ratio`] and names scoring at or above [`DEFAULT_MIN_RATIO`] are
/// returned as suggestions, installed packages first among ties, then by
/// descending ratio.
pub fn search(cache: &Cache, text: &str, regex: bool) -> Result<SearchOutcome> {
    let pattern = Pattern::compile(text, regex)?;
    let hits: Vec<PackageId> = cache
        .get_packages(None)
        .filter(|p| pattern.matches(p.name()))
        .map(Package::id)
        .collect();
    if !hits.is_empty() {
        return Ok(SearchOutcome { hits, suggestions: Vec::new() });
    }

    let mut suggestions: Vec<Suggestion> = cache
        .get_packages(None)
        .map(|p| Suggestion { package: p.id(), ratio: ratio(text, p.name()) })
        .filter(|s| s.ratio >= DEFAULT_MIN_RATIO)
        .collect();
    suggestions.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(std::cmp::Ordering::Equal));
    suggestions.dedup_by_key(|s| s.package);
    Ok(SearchOutcome { hits: Vec::new(), suggestions })
}

/// Like [`search`] but restricted to installed packages, the shape
/// `reinstall` needs when filtering fuzzy suggestions to only installed
/// matches.
pub fn search_installed_suggestions(cache: &Cache, text: &str) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = cache
        .get_packages(None)
        .filter(|p| p.installed())
        .map(|p| Suggestion { package: p.id(), ratio: ratio(text, p.name()) })
        .filter(|s| s.ratio >= DEFAULT_MIN_RATIO)
        .collect();
    suggestions.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(std::cmp::Ordering::Equal));
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::LoadSink;
    use depot_core::LoaderId;

    fn fixture() -> Cache {
        let mut cache = Cache::new();
        cache.declare_package(LoaderId(0), "foo", "1.0", "", false).unwrap();
        cache.declare_package(LoaderId(0), "foobar", "1.0", "", false).unwrap();
        cache.declare_package(LoaderId(0), "quux", "1.0", "", true).unwrap();
        cache
    }

    #[test]
    fn exact_text_returns_that_package_only() {
        let cache = fixture();
        let outcome = search(&cache, "foo", false).unwrap();
        assert_eq!(outcome.hits.len(), 1);
        assert!(outcome.suggestions.is_empty());
    }

    #[test]
    fn glob_text_returns_every_matching_package() {
        let cache = fixture();
        let outcome = search(&cache, "foo*", false).unwrap();
        assert_eq!(outcome.hits.len(), 2);
    }

    #[test]
    fn miss_falls_back_to_ranked_suggestions() {
        let cache = fixture();
        let outcome = search(&cache, "fo", false).unwrap();
        assert!(outcome.hits.is_empty());
        assert!(!outcome.suggestions.is_empty());
        assert!(outcome.suggestions.windows(2).all(|w| w[0].ratio >= w[1].ratio));
    }

    #[test]
    fn no_suggestion_below_the_ratio_floor() {
        let cache = fixture();
        let outcome = search(&cache, "zzz-nothing-like-it", false).unwrap();
        assert!(outcome.suggestions.is_empty());
    }
}
