//! Working-tree test detection.

use std::path::Path;

/// Whether any file under `root` carries a test keyword in its name or in
/// one of its directory components.
///
/// Used as the fallback answer for "does this project have tests" when the
/// commit's diff itself touched no test-like file. Walks with the `ignore`
/// crate, so `.gitignore`d and hidden entries are skipped; unreadable
/// entries are ignored rather than reported.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use magpie_vcs::tree_has_tests;
///
/// let keywords = vec!["test".to_string()];
/// if tree_has_tests(Path::new("/srv/clones/acme"), &keywords) {
///     println!("checkout contains test files");
/// }
/// ```
pub fn tree_has_tests(root: &Path, keywords: &[String]) -> bool {
    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    for entry in ignore::WalkBuilder::new(root).build() {
        let Ok(entry) = entry else {
            continue;
        };
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let haystack = relative.to_string_lossy().to_lowercase();
        if lowered.iter().any(|k| haystack.contains(k.as_str())) {
            return true;
        }
    }

    false
}
