//! Local version-control collaborators for magpie.
//!
//! Everything I/O-shaped that the diff scanner must not do itself lives
//! here: producing a commit's unified diff via git2, reading the current
//! branch, walking a checkout for test files, and parsing commit web URLs.

pub mod diff;
pub mod url;
pub mod walk;

pub use diff::{commit_diff, current_branch};
pub use url::CommitUrl;
pub use walk::tree_has_tests;
