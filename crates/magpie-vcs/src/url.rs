//! Commit web-URL parsing.

use magpie_core::MagpieError;
use regex::Regex;

/// A commit reference recovered from a code-hosting web URL.
///
/// # Examples
///
/// ```
/// use magpie_vcs::CommitUrl;
///
/// let commit = CommitUrl::parse("https://github.com/acme/widget/commit/8a41d07").unwrap();
/// assert_eq!(commit.owner, "acme");
/// assert_eq!(commit.repo, "widget");
/// assert_eq!(commit.hash, "8a41d07");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitUrl {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Commit hash as it appears in the URL.
    pub hash: String,
}

impl CommitUrl {
    /// Parse `.../<owner>/<repo>/commit/<hash>` out of a URL.
    ///
    /// Fragments (`#diff-...`) and query strings after the hash are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MagpieError::Config`] if the URL does not contain an
    /// `owner/repo/commit/hash` segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_vcs::CommitUrl;
    ///
    /// let commit =
    ///     CommitUrl::parse("https://github.com/acme/widget/commit/8a41d07#diff-3f9c").unwrap();
    /// assert_eq!(commit.hash, "8a41d07");
    ///
    /// assert!(CommitUrl::parse("https://github.com/acme/widget").is_err());
    /// ```
    pub fn parse(url: &str) -> Result<Self, MagpieError> {
        let pattern =
            Regex::new(r"/([^/]+)/([^/]+)/commit/([^/#?]+)").expect("commit url pattern");

        let caps = pattern.captures(url).ok_or_else(|| {
            MagpieError::Config(format!(
                "invalid commit URL '{url}', expected .../owner/repo/commit/hash"
            ))
        })?;

        Ok(Self {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            hash: caps[3].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commit_url() {
        let commit = CommitUrl::parse("https://github.com/rails/rails/commit/abc123def").unwrap();
        assert_eq!(commit.owner, "rails");
        assert_eq!(commit.repo, "rails");
        assert_eq!(commit.hash, "abc123def");
    }

    #[test]
    fn strips_fragment_from_hash() {
        let commit =
            CommitUrl::parse("https://github.com/a/b/commit/0011223344#diff-aabb").unwrap();
        assert_eq!(commit.hash, "0011223344");
    }

    #[test]
    fn strips_query_from_hash() {
        let commit = CommitUrl::parse("https://github.com/a/b/commit/0011223344?w=1").unwrap();
        assert_eq!(commit.hash, "0011223344");
    }

    #[test]
    fn url_without_commit_segment_is_rejected() {
        assert!(CommitUrl::parse("https://github.com/a/b/pull/17").is_err());
        assert!(CommitUrl::parse("not a url at all").is_err());
    }

    #[test]
    fn non_github_hosts_still_parse() {
        let commit = CommitUrl::parse("https://gitlab.example.com/team/svc/commit/ff00aa").unwrap();
        assert_eq!(commit.owner, "team");
        assert_eq!(commit.repo, "svc");
        assert_eq!(commit.hash, "ff00aa");
    }
}
