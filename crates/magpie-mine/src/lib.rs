//! Commit mining pipeline: obtain one diff per commit URL, scan it, and
//! collect per-commit records.
//!
//! Diff acquisition prefers a local clone (git2, run on the blocking pool)
//! and falls back to fetching the commit URL's `.diff` document over HTTP.
//! Commits are processed by a bounded worker pool; each task records its own
//! failure instead of poisoning the batch.

pub mod fetch;
pub mod report;
pub mod runner;

pub use fetch::DiffFetcher;
pub use report::MineReport;
pub use runner::{mine, CommitRecord};
