//! Bounded-concurrency mining over commit URLs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use magpie_core::{CommitDiffSummary, MagpieConfig, MagpieError};
use magpie_diffscan::{DiffScanner, ScanOptions};
use magpie_vcs::CommitUrl;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::fetch::DiffFetcher;

/// Outcome of mining one commit URL.
///
/// Exactly one of `summary` and `error` is set. A failed commit is a normal
/// record, never a batch failure: one bad clone or dead URL must not block
/// the rest of the input.
///
/// # Examples
///
/// ```
/// use magpie_mine::CommitRecord;
///
/// let record = CommitRecord {
///     index: 1,
///     url: "https://github.com/acme/widget/commit/8a41d07".into(),
///     repo: Some("widget".into()),
///     branch: None,
///     summary: None,
///     error: Some("git error: failed to open repository".into()),
/// };
/// assert!(record.summary.is_none());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Position of the URL in the input (1-based, stable across runs).
    pub index: usize,
    /// The commit URL as given.
    pub url: String,
    /// Repository name parsed from the URL.
    pub repo: Option<String>,
    /// Branch checked out in the local clone, when one was available.
    pub branch: Option<String>,
    /// Scan result, when a diff was obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CommitDiffSummary>,
    /// Why this commit produced no summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommitRecord {
    fn failed(index: usize, url: String, repo: Option<String>, error: String) -> Self {
        Self {
            index,
            url,
            repo,
            branch: None,
            summary: None,
            error: Some(error),
        }
    }
}

/// Mine every URL in `urls`, at most `config.mine.jobs` at a time.
///
/// Records come back in input order regardless of completion order. Diff
/// acquisition per commit: the local clone under `repos_dir` first (git2 on
/// the blocking pool), then — when the local diff is missing, failed, or
/// empty — the HTTP `.diff` fallback if enabled. An empty diff that was
/// genuinely obtained yields a zero summary; failing to obtain any diff
/// yields an error record.
///
/// When the diff touched no test-like file but a local clone exists, the
/// test answer is upgraded by walking the checkout.
///
/// # Errors
///
/// Returns [`MagpieError::Fetch`] only if the shared HTTP client cannot be
/// built. Per-commit failures are reported inside the records.
///
/// # Examples
///
/// ```no_run
/// use magpie_core::MagpieConfig;
/// use magpie_mine::mine;
///
/// # async fn run() {
/// let config = MagpieConfig::default();
/// let urls = vec!["https://github.com/acme/widget/commit/8a41d07".to_string()];
/// let records = mine(urls, &config).await.unwrap();
/// assert_eq!(records.len(), 1);
/// # }
/// ```
pub async fn mine(
    urls: Vec<String>,
    config: &MagpieConfig,
) -> Result<Vec<CommitRecord>, MagpieError> {
    let scanner = Arc::new(DiffScanner::new(ScanOptions::from_config(&config.scan)));
    let fetcher = if config.mine.fetch_fallback {
        Some(Arc::new(DiffFetcher::new(Duration::from_secs(
            config.mine.timeout_secs,
        ))?))
    } else {
        None
    };
    let keywords = Arc::new(config.scan.test_keywords.clone());
    let repos_dir = config.mine.repos_dir.clone();
    let semaphore = Arc::new(Semaphore::new(config.mine.jobs.max(1)));

    let mut join_set = JoinSet::new();
    for (i, url) in urls.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        let scanner = scanner.clone();
        let fetcher = fetcher.clone();
        let keywords = keywords.clone();
        let repos_dir = repos_dir.clone();

        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            process_commit(i + 1, url, scanner, fetcher, repos_dir, keywords).await
        });
    }

    let mut records = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        if let Ok(record) = joined {
            records.push(record);
        }
    }
    records.sort_by_key(|r| r.index);
    Ok(records)
}

async fn process_commit(
    index: usize,
    url: String,
    scanner: Arc<DiffScanner>,
    fetcher: Option<Arc<DiffFetcher>>,
    repos_dir: Option<PathBuf>,
    keywords: Arc<Vec<String>>,
) -> CommitRecord {
    let parsed = match CommitUrl::parse(&url) {
        Ok(p) => p,
        Err(e) => return CommitRecord::failed(index, url, None, e.to_string()),
    };
    let repo = Some(parsed.repo.clone());

    let repo_path = repos_dir
        .map(|dir| dir.join(&parsed.repo))
        .filter(|path| path.is_dir());

    let mut diff_text: Option<String> = None;
    let mut acquire_error: Option<String> = None;

    if let Some(path) = repo_path.clone() {
        let hash = parsed.hash.clone();
        match tokio::task::spawn_blocking(move || magpie_vcs::commit_diff(&path, &hash)).await {
            Ok(Ok(text)) => diff_text = Some(text),
            Ok(Err(e)) => acquire_error = Some(e.to_string()),
            Err(e) => acquire_error = Some(format!("local diff task failed: {e}")),
        }
    }

    // An empty local diff usually means a stale clone; try the web copy.
    let local_is_empty = diff_text.as_ref().is_some_and(String::is_empty);
    if diff_text.is_none() || local_is_empty {
        if let Some(fetcher) = &fetcher {
            match fetcher.fetch(&url).await {
                Ok(text) => {
                    diff_text = Some(text);
                    acquire_error = None;
                }
                Err(e) => {
                    // Keep an empty-but-successful local diff as a valid
                    // zero result; otherwise record the combined failure.
                    if diff_text.is_none() {
                        acquire_error = Some(match acquire_error.take() {
                            Some(local) => format!("{local}; {e}"),
                            None => e.to_string(),
                        });
                    }
                }
            }
        }
    }

    let Some(text) = diff_text else {
        let error = acquire_error
            .unwrap_or_else(|| "no local clone and fetch fallback disabled".to_string());
        return CommitRecord::failed(index, url, repo, error);
    };

    let mut summary = scanner.scan(&text);

    if !summary.test_case_present {
        if let Some(path) = repo_path.clone() {
            let keywords = keywords.clone();
            if let Ok(found) =
                tokio::task::spawn_blocking(move || magpie_vcs::tree_has_tests(&path, &keywords))
                    .await
            {
                summary.test_case_present = found;
            }
        }
    }

    let branch = match repo_path {
        Some(path) => tokio::task::spawn_blocking(move || magpie_vcs::current_branch(&path))
            .await
            .ok()
            .and_then(Result::ok)
            .flatten(),
        None => None,
    };

    CommitRecord {
        index,
        url,
        repo,
        branch,
        summary: Some(summary),
        error: None,
    }
}
