//! Benchmark harness crate for the cache and solver.
//!
//! # Running benchmarks
//!
//! ```bash
//! cargo bench --package depot-bench
//! ```
