//! Line-to-function attribution over unified diff text.
//!
//! Classifies each diff line, filters out noise (blank lines, imports,
//! comments), attributes the remaining changed lines to their enclosing
//! function by scanning backward for a signature, and aggregates per-commit
//! counts into a [`CommitDiffSummary`](magpie_core::CommitDiffSummary).
//!
//! Everything here is deliberately heuristic and line-oriented: there is no
//! parser, and multi-line signatures, generics, and lambdas are recognized
//! only as far as a single-line regex can see. The scan is total over
//! arbitrary input; malformed lines degrade to "no classification" rather
//! than erroring.

pub mod aggregate;
pub mod attributor;
pub mod classify;
pub mod noise;

pub use aggregate::{DiffScanner, ScanOptions};
pub use attributor::FunctionAttributor;
