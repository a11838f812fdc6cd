use std::path::PathBuf;

/// Errors that can occur across the magpie workspace.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
///
/// The diff scanner itself never produces errors: it is total over arbitrary
/// text input. Only the collaborators that *obtain* inputs (git, network,
/// filesystem, config) can fail, and "failed to obtain a diff" must stay
/// distinguishable from "obtained an empty diff".
///
/// # Examples
///
/// ```
/// use magpie_core::MagpieError;
///
/// let err = MagpieError::Config("missing tracked extensions".into());
/// assert!(err.to_string().contains("missing tracked extensions"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum MagpieError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    Git(String),

    /// Network fetch of a diff document failed.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MagpieError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = MagpieError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn fetch_error_displays_message() {
        let err = MagpieError::Fetch("HTTP 404".into());
        assert_eq!(err.to_string(), "fetch error: HTTP 404");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = MagpieError::FileNotFound(PathBuf::from("/tmp/urls.txt"));
        assert!(err.to_string().contains("/tmp/urls.txt"));
    }
}
