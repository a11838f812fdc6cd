//! Rendering of mining results.

use std::fmt;

use serde::Serialize;

use crate::runner::CommitRecord;

/// Complete report over one mining run.
///
/// # Examples
///
/// ```
/// use magpie_mine::MineReport;
///
/// let report = MineReport::new(Vec::new());
/// assert_eq!(report.summary.total_commits, 0);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MineReport {
    /// Per-commit records, in input order.
    pub records: Vec<CommitRecord>,
    /// High-level summary statistics.
    pub summary: MineSummary,
}

/// Summary statistics for a mining run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MineSummary {
    /// Number of commit URLs processed.
    pub total_commits: usize,
    /// Commits that produced a summary.
    pub analyzed: usize,
    /// Commits that produced an error record.
    pub failed: usize,
}

impl MineReport {
    /// Build a report from the records of one run.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_mine::{CommitRecord, MineReport};
    ///
    /// let records = vec![CommitRecord {
    ///     index: 1,
    ///     url: "https://github.com/acme/widget/commit/8a41d07".into(),
    ///     repo: Some("widget".into()),
    ///     branch: None,
    ///     summary: None,
    ///     error: Some("fetch error: HTTP 404".into()),
    /// }];
    /// let report = MineReport::new(records);
    /// assert_eq!(report.summary.failed, 1);
    /// assert_eq!(report.summary.analyzed, 0);
    /// ```
    pub fn new(records: Vec<CommitRecord>) -> Self {
        let total_commits = records.len();
        let failed = records.iter().filter(|r| r.error.is_some()).count();
        Self {
            summary: MineSummary {
                total_commits,
                analyzed: total_commits - failed,
                failed,
            },
            records,
        }
    }

    /// Render the report as a markdown string.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_mine::MineReport;
    ///
    /// let md = MineReport::new(Vec::new()).to_markdown();
    /// assert!(md.contains("# Mining Report"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Mining Report\n\n");

        if !self.records.is_empty() {
            out.push_str("| # | Repo | Files | Tracked | Hunks | Tests | Functions |\n");
            out.push_str("|---|------|-------|---------|-------|-------|-----------|\n");
            for record in &self.records {
                let repo = record.repo.as_deref().unwrap_or("?");
                match &record.summary {
                    Some(s) => out.push_str(&format!(
                        "| {} | {} | {} | {} | {} | {} | {} |\n",
                        record.index,
                        repo,
                        s.file_count,
                        s.tracked_file_count,
                        s.hunk_count,
                        if s.test_case_present { "yes" } else { "no" },
                        s.function_names.join(", "),
                    )),
                    None => out.push_str(&format!(
                        "| {} | {} | — | — | — | — | {} |\n",
                        record.index,
                        repo,
                        record.error.as_deref().unwrap_or("failed"),
                    )),
                }
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "**Summary:** {} commits, {} analyzed, {} failed\n",
            self.summary.total_commits, self.summary.analyzed, self.summary.failed
        ));
        out
    }
}

impl fmt::Display for MineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mining Report")?;
        writeln!(f, "=============")?;

        if !self.records.is_empty() {
            writeln!(
                f,
                "{:<4} {:<24} {:>5} {:>7} {:>5} {:>5}  Functions",
                "#", "Repo", "Files", "Tracked", "Hunks", "Tests"
            )?;
            writeln!(f, "{}", "-".repeat(78))?;
            for record in &self.records {
                let repo = record.repo.as_deref().unwrap_or("?");
                match &record.summary {
                    Some(s) => writeln!(
                        f,
                        "{:<4} {:<24} {:>5} {:>7} {:>5} {:>5}  {}",
                        record.index,
                        repo,
                        s.file_count,
                        s.tracked_file_count,
                        s.hunk_count,
                        if s.test_case_present { "yes" } else { "no" },
                        s.function_names.join(", "),
                    )?,
                    None => writeln!(
                        f,
                        "{:<4} {:<24} failed: {}",
                        record.index,
                        repo,
                        record.error.as_deref().unwrap_or("unknown error"),
                    )?,
                }
            }
        }

        writeln!(
            f,
            "\nSummary: {} commits, {} analyzed, {} failed",
            self.summary.total_commits, self.summary.analyzed, self.summary.failed
        )
    }
}
