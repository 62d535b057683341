//! Mock `Fetcher` port implementation (§6).
//!
//! Real network/checksum/decompression fetching is out of scope; this
//! fetcher reports every enqueued item as already fetched to the path it was
//! requested at, so the execution-preview modes (`--urls`, `--metalink`,
//! `--download`, `--stepped`) have something to render against.

#![allow(dead_code)]

use std::path::PathBuf;

use depot_core::{FetchItem, FetchStatus, Fetcher, Progress};

#[derive(Debug, Clone)]
struct MockFetchItem {
    url: String,
    target: PathBuf,
}

impl FetchItem for MockFetchItem {
    fn status(&self) -> FetchStatus {
        FetchStatus::Succeeded
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn failed_reason(&self) -> Option<&str> {
        None
    }

    fn target_path(&self) -> Option<&std::path::Path> {
        Some(&self.target)
    }
}

/// A fetcher that records enqueued items and reports them as successful
/// without performing any I/O.
#[derive(Debug, Default)]
pub struct MockFetcher {
    items: Vec<MockFetchItem>,
}

impl Fetcher for MockFetcher {
    fn reset(&mut self) {
        self.items.clear();
    }

    fn enqueue(
        &mut self,
        url: &str,
        _md5: Option<&str>,
        _sha1: Option<&str>,
        _uncomp_md5: Option<&str>,
        _uncomp: bool,
    ) -> Box<dyn FetchItem> {
        let target = PathBuf::from("/dev/null").join(url.rsplit('/').next().unwrap_or(url));
        let item = MockFetchItem { url: url.to_string(), target };
        self.items.push(item.clone());
        Box::new(item)
    }

    fn run(&mut self, progress: &mut dyn Progress) {
        progress.add(self.items.len() as u64);
    }
}
