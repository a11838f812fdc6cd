use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Aggregate analysis of one commit's unified diff.
///
/// Built once per diff by the scanner and immutable afterwards, except that
/// the mining pipeline may upgrade [`test_case_present`] from a working-tree
/// check when the diff itself touched no test-like file.
///
/// [`test_case_present`]: CommitDiffSummary::test_case_present
///
/// # Examples
///
/// ```
/// use magpie_core::CommitDiffSummary;
///
/// let summary = CommitDiffSummary {
///     file_count: 2,
///     tracked_file_count: 1,
///     hunk_count: 3,
///     function_names: vec!["save".into(), "load".into()],
///     test_case_present: false,
/// };
/// assert_eq!(summary.function_names.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDiffSummary {
    /// Non-test file sections seen in the diff.
    pub file_count: usize,
    /// Non-test sections with a tracked extension.
    pub tracked_file_count: usize,
    /// Maximal runs of meaningful changed lines in tracked sections.
    pub hunk_count: usize,
    /// Distinct attributed function names, in first-seen order.
    /// Unattributed hunks count toward `hunk_count` but appear nowhere here.
    pub function_names: Vec<String>,
    /// Whether the diff touched a test-like file, or (after the mining
    /// fallback) whether the checked-out tree contains one.
    pub test_case_present: bool,
}

impl fmt::Display for CommitDiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files:     {} ({} tracked)", self.file_count, self.tracked_file_count)?;
        writeln!(f, "Hunks:     {}", self.hunk_count)?;
        writeln!(f, "Functions: {}", self.function_names.len())?;
        for name in &self.function_names {
            writeln!(f, "  - {name}")?;
        }
        writeln!(
            f,
            "Tests:     {}",
            if self.test_case_present { "present" } else { "absent" }
        )
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use magpie_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
