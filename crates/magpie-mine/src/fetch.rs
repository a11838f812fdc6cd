//! HTTP fallback for commit diffs.

use std::time::Duration;

use magpie_core::MagpieError;

/// Fetches the `.diff` rendering of a commit web URL.
///
/// No authentication: the fallback targets the public diff document that
/// code-hosting sites serve next to the commit page.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use magpie_mine::DiffFetcher;
///
/// # async fn run() {
/// let fetcher = DiffFetcher::new(Duration::from_secs(30)).unwrap();
/// let diff = fetcher
///     .fetch("https://github.com/acme/widget/commit/8a41d07")
///     .await
///     .unwrap();
/// assert!(diff.contains("diff --git"));
/// # }
/// ```
pub struct DiffFetcher {
    http: reqwest::Client,
}

impl DiffFetcher {
    /// Build a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MagpieError::Fetch`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, MagpieError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("magpie")
            .build()
            .map_err(|e| MagpieError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// GET `<commit_url>.diff` and return the body.
    ///
    /// A successful response with an empty body is returned as-is: an empty
    /// diff is a valid result, distinct from the failure cases.
    ///
    /// # Errors
    ///
    /// Returns [`MagpieError::Fetch`] on connection errors, timeouts, or
    /// non-success status codes.
    pub async fn fetch(&self, commit_url: &str) -> Result<String, MagpieError> {
        let url = format!("{commit_url}.diff");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MagpieError::Fetch(format!("failed to fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MagpieError::Fetch(format!("HTTP {status} fetching {url}")));
        }

        response
            .text()
            .await
            .map_err(|e| MagpieError::Fetch(format!("failed to read diff body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_timeout() {
        assert!(DiffFetcher::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn invalid_url_is_a_fetch_error() {
        let fetcher = DiffFetcher::new(Duration::from_secs(5)).unwrap();
        let result = fetcher.fetch("not-a-url").await;
        assert!(matches!(result, Err(MagpieError::Fetch(_))));
    }
}
