//! Error types shared across every depot crate.
//!
//! Each error carries:
//! - a stable error code (e.g. `E0601`) for documentation lookups
//! - a human message
//! - suggestions for how to recover, when the source command has any to offer

use std::fmt;
use thiserror::Error;

/// Stable error codes, grouped by the component that raises them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Version algebra (E01xx)
    /// Malformed version string.
    E0101,
    /// Malformed relation operator.
    E0102,

    // Channel / loader (E02xx)
    /// Channel record is missing a required field or has an invalid type.
    E0201,
    /// Loader could not parse backend metadata.
    E0202,

    // Fetch (E03xx)
    /// Network, checksum, or decompression failure.
    E0301,

    // Cache (E04xx)
    /// An internal cache invariant was violated.
    E0401,

    // Query (E05xx)
    /// Malformed search pattern (bad glob or regex).
    E0501,

    // Policy / resolver (E06xx)
    /// Unsatisfiable requirement or irresolvable conflict.
    E0601,
    /// A locked package would need to change state.
    E0602,
    /// No candidate provider meets policy constraints.
    E0603,
    /// Changeset was inconsistent after propagation reached fixpoint.
    E0604,

    // Commit (E07xx)
    /// Backend refused or aborted a step.
    E0701,

    // Config / CLI (E08xx)
    /// Argument parsing or CLI misuse.
    E0801,
    /// Persisted configuration could not be parsed.
    E0802,
}

impl ErrorCode {
    /// The `Exxxx` string form of this code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0301 => "E0301",
            Self::E0401 => "E0401",
            Self::E0501 => "E0501",
            Self::E0601 => "E0601",
            Self::E0602 => "E0602",
            Self::E0603 => "E0603",
            Self::E0604 => "E0604",
            Self::E0701 => "E0701",
            Self::E0801 => "E0801",
            Self::E0802 => "E0802",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wrapper so `ErrorCode` can sit behind thiserror's `#[source]`.
#[derive(Debug)]
pub struct ErrorCodeSource(pub ErrorCode);

impl fmt::Display for ErrorCodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

impl std::error::Error for ErrorCodeSource {}

/// The error type shared by every depot crate.
#[derive(Error, Debug)]
pub enum Error {
    /// CLI argument parsing or misuse.
    #[error("[{code}] usage error: {message}")]
    Usage {
        #[source]
        code: ErrorCodeSource,
        message: String,
        suggestions: Vec<String>,
    },

    /// A channel record was malformed (missing `baseurl`, non-integer `priority`, ...).
    #[error("[{code}] invalid channel '{alias}': {message}")]
    ChannelData {
        #[source]
        code: ErrorCodeSource,
        alias: String,
        message: String,
        suggestions: Vec<String>,
    },

    /// A loader failed to parse backend metadata.
    #[error("[{code}] loader error: {message}")]
    Loader {
        #[source]
        code: ErrorCodeSource,
        message: String,
        suggestions: Vec<String>,
    },

    /// Network, checksum, or decompression failure for one fetched item.
    #[error("[{code}] fetch failed for {url}: {message}")]
    Fetch {
        #[source]
        code: ErrorCodeSource,
        url: String,
        message: String,
        suggestions: Vec<String>,
    },

    /// Unsatisfiable requirement or irresolvable conflict.
    #[error("[{code}] dependency error: {message}")]
    Dependency {
        #[source]
        code: ErrorCodeSource,
        message: String,
        /// The chain of unmet relations, innermost first.
        chain: Vec<String>,
        suggestions: Vec<String>,
    },

    /// A locked package would need to change state.
    #[error("[{code}] '{package}' is locked and cannot change state")]
    Locked {
        #[source]
        code: ErrorCodeSource,
        package: String,
        suggestions: Vec<String>,
    },

    /// No candidate provider meets policy constraints.
    #[error("[{code}] policy error: {message}")]
    Policy {
        #[source]
        code: ErrorCodeSource,
        message: String,
        suggestions: Vec<String>,
    },

    /// The changeset was inconsistent after propagation reached fixpoint.
    /// Should not happen; indicates a solver bug.
    #[error("[{code}] transaction error: {message}")]
    Transaction {
        #[source]
        code: ErrorCodeSource,
        message: String,
    },

    /// The backend refused or aborted a step during commit.
    #[error("[{code}] commit failed at step {step}: {message}")]
    Commit {
        #[source]
        code: ErrorCodeSource,
        step: String,
        message: String,
    },

    /// A version string did not parse as `[epoch:]upstream[-release]`.
    #[error("[{code}] invalid version '{input}': {message}")]
    VersionParse {
        #[source]
        code: ErrorCodeSource,
        input: String,
        message: String,
    },

    /// A search pattern was not a valid glob or regex.
    #[error("[{code}] invalid search pattern '{pattern}': {message}")]
    Pattern {
        #[source]
        code: ErrorCodeSource,
        pattern: String,
        message: String,
    },

    /// Persisted configuration did not parse.
    #[error("[{code}] config error: {message}")]
    Config {
        #[source]
        code: ErrorCodeSource,
        message: String,
        suggestions: Vec<String>,
    },
}

impl Error {
    /// The stable error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Usage { code, .. }
            | Self::ChannelData { code, .. }
            | Self::Loader { code, .. }
            | Self::Fetch { code, .. }
            | Self::Dependency { code, .. }
            | Self::Locked { code, .. }
            | Self::Policy { code, .. }
            | Self::Transaction { code, .. }
            | Self::Commit { code, .. }
            | Self::VersionParse { code, .. }
            | Self::Pattern { code, .. }
            | Self::Config { code, .. } => code.0,
        }
    }

    /// Suggestions for fixing this error, if any were attached.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Usage { suggestions, .. }
            | Self::ChannelData { suggestions, .. }
            | Self::Loader { suggestions, .. }
            | Self::Fetch { suggestions, .. }
            | Self::Dependency { suggestions, .. }
            | Self::Locked { suggestions, .. }
            | Self::Policy { suggestions, .. }
            | Self::Config { suggestions, .. } => suggestions,
            Self::Transaction { .. } | Self::Commit { .. } | Self::VersionParse { .. } | Self::Pattern { .. } => &[],
        }
    }

    /// Format this error together with its suggestions, for the CLI's `--explain` path.
    #[must_use]
    pub fn display_with_suggestions(&self) -> String {
        let mut output = format!("{self}");
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\n\nSuggestions:");
            for suggestion in suggestions {
                output.push_str(&format!("\n  - {suggestion}"));
            }
        }
        output
    }

    /// Build a [`Error::Dependency`] carrying the unmet-relation chain, as surfaced by S4.
    #[must_use]
    pub fn dependency(message: impl Into<String>, chain: Vec<String>) -> Self {
        Self::Dependency {
            code: ErrorCodeSource(ErrorCode::E0601),
            message: message.into(),
            chain,
            suggestions: vec![],
        }
    }

    /// Build a [`Error::Locked`] citing the offending package, as surfaced by S5.
    #[must_use]
    pub fn locked(package: impl Into<String>) -> Self {
        Self::Locked {
            code: ErrorCodeSource(ErrorCode::E0602),
            package: package.into(),
            suggestions: vec!["remove the lock before requesting this change".to_string()],
        }
    }

    /// Build a [`Error::Policy`] error.
    #[must_use]
    pub fn policy(message: impl Into<String>) -> Self {
        Self::Policy {
            code: ErrorCodeSource(ErrorCode::E0603),
            message: message.into(),
            suggestions: vec![],
        }
    }

    /// Build a [`Error::Transaction`] error; reaching this is a solver bug.
    #[must_use]
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction {
            code: ErrorCodeSource(ErrorCode::E0604),
            message: message.into(),
        }
    }

    /// Build a [`Error::VersionParse`] error.
    #[must_use]
    pub fn version_parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::VersionParse {
            code: ErrorCodeSource(ErrorCode::E0101),
            input: input.into(),
            message: message.into(),
        }
    }

    /// Build a [`Error::Pattern`] error.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            code: ErrorCodeSource(ErrorCode::E0501),
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Build a [`Error::Usage`] error with suggestions.
    #[must_use]
    pub fn usage(message: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::Usage {
            code: ErrorCodeSource(ErrorCode::E0801),
            message: message.into(),
            suggestions,
        }
    }

    /// Build a [`Error::ChannelData`] error for a malformed channel record.
    #[must_use]
    pub fn channel_data(alias: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ChannelData {
            code: ErrorCodeSource(ErrorCode::E0201),
            alias: alias.into(),
            message: message.into(),
            suggestions: vec![],
        }
    }

    /// Build a [`Error::Config`] error for a persisted state tree that failed to parse.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCodeSource(ErrorCode::E0802),
            message: message.into(),
            suggestions: vec![],
        }
    }
}

/// Result type for depot operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_error_carries_chain() {
        let err = Error::dependency("no provider for missing>=1", vec!["missing>=1".to_string()]);
        assert_eq!(err.code().as_str(), "E0601");
        assert!(format!("{err}").contains("dependency error"));
    }

    #[test]
    fn display_with_suggestions_lists_each_one() {
        let err = Error::locked("alpha-1.0");
        let text = err.display_with_suggestions();
        assert!(text.contains("Suggestions:"));
        assert!(text.contains("remove the lock"));
    }
}
