use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MagpieError;

/// Top-level configuration loaded from `.magpie.toml`.
///
/// Resolution order: CLI flags > local config file > defaults.
///
/// # Examples
///
/// ```
/// use magpie_core::MagpieConfig;
///
/// let config = MagpieConfig::default();
/// assert_eq!(config.mine.jobs, 4);
/// assert!(config.scan.tracked_extensions.contains(&"java".to_string()));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagpieConfig {
    /// Diff scanning settings.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Commit mining settings.
    #[serde(default)]
    pub mine: MineConfig,
}

impl MagpieConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MagpieError::Io`] if the file cannot be read, or
    /// [`MagpieError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use magpie_core::MagpieConfig;
    /// use std::path::Path;
    ///
    /// let config = MagpieConfig::from_file(Path::new(".magpie.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, MagpieError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`MagpieError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_core::MagpieConfig;
    ///
    /// let toml = r#"
    /// [mine]
    /// jobs = 8
    /// "#;
    /// let config = MagpieConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.mine.jobs, 8);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, MagpieError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Diff scanning configuration.
///
/// Controls which file sections of a diff are analyzed and how test files
/// are recognized.
///
/// # Examples
///
/// ```
/// use magpie_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.tracked_extensions, vec!["java", "jsp", "jspx", "xml"]);
/// assert_eq!(config.test_keywords, vec!["test"]);
/// assert!(config.skip_patterns.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions whose sections are analyzed (default: Java-web set).
    #[serde(default = "default_tracked_extensions")]
    pub tracked_extensions: Vec<String>,
    /// Case-insensitive keywords marking a file name/path as a test file.
    #[serde(default = "default_test_keywords")]
    pub test_keywords: Vec<String>,
    /// Glob patterns for paths to exclude from tracked counts.
    #[serde(default)]
    pub skip_patterns: Vec<String>,
}

fn default_tracked_extensions() -> Vec<String> {
    vec!["java".into(), "jsp".into(), "jspx".into(), "xml".into()]
}

fn default_test_keywords() -> Vec<String> {
    vec!["test".into()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tracked_extensions: default_tracked_extensions(),
            test_keywords: default_test_keywords(),
            skip_patterns: Vec::new(),
        }
    }
}

/// Commit mining configuration.
///
/// # Examples
///
/// ```
/// use magpie_core::MineConfig;
///
/// let config = MineConfig::default();
/// assert_eq!(config.jobs, 4);
/// assert!(config.fetch_fallback);
/// assert_eq!(config.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineConfig {
    /// Maximum number of commits processed concurrently (default: 4).
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Directory containing pre-cloned repositories, one per repo name.
    pub repos_dir: Option<PathBuf>,
    /// Fetch `<url>.diff` over HTTP when the local diff is missing or empty
    /// (default: true).
    #[serde(default = "default_fetch_fallback")]
    pub fetch_fallback: bool,
    /// Timeout for HTTP diff fetches, in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_jobs() -> usize {
    4
}

fn default_fetch_fallback() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            repos_dir: None,
            fetch_fallback: default_fetch_fallback(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
