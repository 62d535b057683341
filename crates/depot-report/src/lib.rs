//! Change-report classification and backend execution ordering (§4.8, §4.9).

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod order;

pub use classify::{build as build_report, PackageChangeDetail, Report};
pub use order::{order, Op, Step};
