//! Search and relation-query engine (§4.5): exact/glob/regex package search
//! with fuzzy suggestions, plus the `whoprovides`/`whorequires`/
//! `whoconflicts`/`whoobsoletes` grammar.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod fuzzy;
pub mod pattern;
pub mod relation_query;
pub mod search;

pub use fuzzy::{ratio, DEFAULT_MIN_RATIO};
pub use pattern::Pattern;
pub use relation_query::{who_conflicts, who_obsoletes, who_provides, who_requires, Spec};
pub use search::{search as search_packages, search_installed_suggestions, SearchOutcome, Suggestion};
