//! Core dependency model for the depot package manager.
//!
//! This crate provides the foundational types consumed by every other depot
//! crate:
//! - the RPM-style version algebra
//! - Provides / Requires / Conflicts / Obsoletes relation primitives
//! - package identity
//! - the loader, fetcher, and interface port contracts
//! - the shared error type

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod loader;
pub mod package;
pub mod ports;
pub mod relation;
pub mod version;

pub use error::{Error, ErrorCode, Result};
pub use loader::{LoadSink, Loader};
pub use package::{Identity, LoaderId, Package, PackageId};
pub use ports::{FetchItem, FetchStatus, Fetcher, Interface, Progress};
pub use relation::{Depends, Provides};
pub use version::{relation_holds, RelOp, Version};

// Re-export commonly used small-data-structure crates so downstream crates
// share one version of each.
pub use ahash::{AHashMap, AHashSet};
pub use smallvec::SmallVec;
