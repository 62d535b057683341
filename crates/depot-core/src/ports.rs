//! External collaborator ports (§6): fetcher and interface.
//!
//! The core consumes these as trait objects; no implementation here performs
//! real network I/O or terminal rendering. `depot-cli` supplies the
//! reference implementations.

use std::fmt;

/// Outcome of fetching a single enqueued item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The item was retrieved (and, if a digest was supplied, verified).
    Succeeded,
    /// The item could not be retrieved or failed verification.
    Failed,
}

/// A single fetch request and its outcome.
pub trait FetchItem: fmt::Debug {
    /// The outcome of this fetch, once `Fetcher::run` has completed.
    fn status(&self) -> FetchStatus;
    /// The URL that was requested.
    fn url(&self) -> &str;
    /// Human-readable failure reason, when `status() == Failed`.
    fn failed_reason(&self) -> Option<&str>;
    /// The local path the content was written to, when `status() == Succeeded`.
    fn target_path(&self) -> Option<&std::path::Path>;
}

/// Progress sink handed to `Fetcher::run`.
pub trait Progress {
    /// Advances the progress indicator by `amount` units.
    fn add(&mut self, amount: u64);
}

/// The fetcher port (§6): network/checksum/decompression, entirely external
/// to the core. Guarantees checksum verification when a digest is supplied
/// and decompression when requested.
pub trait Fetcher {
    /// Clears any previously enqueued items.
    fn reset(&mut self);

    /// Enqueues a URL for retrieval. `md5`/`sha1` request checksum
    /// verification; `uncomp` requests decompression after a successful
    /// download, with `uncomp_md5` verifying the decompressed content.
    fn enqueue(
        &mut self,
        url: &str,
        md5: Option<&str>,
        sha1: Option<&str>,
        uncomp_md5: Option<&str>,
        uncomp: bool,
    ) -> Box<dyn FetchItem>;

    /// Runs all enqueued fetches to completion, reporting progress.
    fn run(&mut self, progress: &mut dyn Progress);
}

/// The interface port (§6): progress, warnings, confirmation.
pub trait Interface {
    /// Reports a non-fatal problem.
    fn warning(&mut self, msg: &str);
    /// Reports a fatal-to-the-current-operation problem.
    fn error(&mut self, msg: &str);
    /// Reports an informational message.
    fn info(&mut self, msg: &str);
    /// Begins a labeled status display (e.g. a spinner).
    fn show_status(&mut self, label: &str);
    /// Ends the current status display.
    fn hide_status(&mut self);
    /// Asks the user a yes/no question; returning false must abort cleanly
    /// with no side effect on the cache.
    fn ask_yes_no(&mut self, question: &str) -> bool;
}
