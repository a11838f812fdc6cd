//! Core types, configuration, and error handling for magpie.
//!
//! This crate provides the shared foundation used by all other magpie crates:
//! - [`MagpieError`] — unified error type using `thiserror`
//! - [`MagpieConfig`] — configuration loaded from `.magpie.toml`
//! - Shared types: [`CommitDiffSummary`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{MagpieConfig, MineConfig, ScanConfig};
pub use error::MagpieError;
pub use types::{CommitDiffSummary, OutputFormat};

/// A convenience `Result` type for magpie operations.
pub type Result<T> = std::result::Result<T, MagpieError>;
