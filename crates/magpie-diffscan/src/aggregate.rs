//! Per-commit aggregation: file sections, hunks, and distinct functions.

use magpie_core::{CommitDiffSummary, ScanConfig};

use crate::attributor::FunctionAttributor;
use crate::classify::{self, LineKind};
use crate::noise;

/// Which file sections are analyzed and how test files are recognized.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::ScanOptions;
///
/// let options = ScanOptions::default_options();
/// assert!(options.is_tracked("Foo.java"));
/// assert!(!options.is_tracked("Makefile"));
/// ```
pub struct ScanOptions {
    tracked_extensions: Vec<String>,
    test_keywords: Vec<String>,
    skip_patterns: Vec<glob::Pattern>,
}

impl ScanOptions {
    /// Options with the default Java-web extension set and `test` keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_diffscan::ScanOptions;
    ///
    /// let options = ScanOptions::default_options();
    /// assert!(options.is_test_header("diff --git a/FooTest.java b/FooTest.java"));
    /// ```
    pub fn default_options() -> Self {
        Self::from_config(&ScanConfig::default())
    }

    /// Build options from scan configuration.
    ///
    /// Invalid glob patterns are dropped silently; the remaining patterns
    /// still apply.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_core::ScanConfig;
    /// use magpie_diffscan::ScanOptions;
    ///
    /// let config = ScanConfig {
    ///     tracked_extensions: vec!["rs".into()],
    ///     ..ScanConfig::default()
    /// };
    /// let options = ScanOptions::from_config(&config);
    /// assert!(options.is_tracked("lib.rs"));
    /// assert!(!options.is_tracked("Foo.java"));
    /// ```
    pub fn from_config(config: &ScanConfig) -> Self {
        let mut skip_patterns = Vec::new();
        for pat in &config.skip_patterns {
            if let Ok(p) = glob::Pattern::new(pat) {
                skip_patterns.push(p);
            }
        }

        Self {
            tracked_extensions: config.tracked_extensions.clone(),
            test_keywords: config.test_keywords.clone(),
            skip_patterns,
        }
    }

    /// Whether a file name carries a tracked extension.
    pub fn is_tracked(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.tracked_extensions
            .iter()
            .any(|tracked| ext.eq_ignore_ascii_case(tracked))
    }

    /// Whether a file header line names a test file.
    ///
    /// Case-insensitive: any test keyword anywhere in the header marks the
    /// section as a test file, matching the usual `FooTest.java`,
    /// `test_helper.jsp`, and `src/test/...` conventions at once.
    pub fn is_test_header(&self, header_line: &str) -> bool {
        let lowered = header_line.to_lowercase();
        self.test_keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    }

    fn is_skipped(&self, path: &str) -> bool {
        self.skip_patterns.iter().any(|pat| pat.matches(path))
    }
}

/// One file section currently being scanned.
struct Section {
    start: usize,
    tracked: bool,
    test: bool,
}

/// Scans one commit's unified diff into a [`CommitDiffSummary`].
///
/// Holds the compiled attribution patterns so repeated scans (one per
/// commit) don't recompile them. A scanner is immutable and can be shared
/// across threads; every `scan` call owns its own buffers and counters.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::{DiffScanner, ScanOptions};
///
/// let scanner = DiffScanner::new(ScanOptions::default_options());
/// let diff = "\
/// diff --git a/Foo.java b/Foo.java
/// --- a/Foo.java
/// +++ b/Foo.java
/// @@ -1,4 +1,7 @@
/// +public int bar() {
/// +    int x = compute();
/// +}
/// ";
/// let summary = scanner.scan(diff);
/// assert_eq!(summary.hunk_count, 1);
/// assert_eq!(summary.function_names, vec!["bar"]);
/// ```
pub struct DiffScanner {
    options: ScanOptions,
    attributor: FunctionAttributor,
}

impl DiffScanner {
    /// Create a scanner over the given options.
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            attributor: FunctionAttributor::new(),
        }
    }

    /// Aggregate one diff into a summary.
    ///
    /// Total over arbitrary input: malformed lines classify as context,
    /// empty input yields the zero summary, and a missing enclosing function
    /// leaves the hunk counted but unnamed. Lines outside a tracked,
    /// non-test file section are never assessed or attributed.
    ///
    /// A hunk is one maximal run of consecutive meaningful changed lines;
    /// any non-change line ends the run. Noise changed lines neither extend
    /// nor end it.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_diffscan::{DiffScanner, ScanOptions};
    ///
    /// let scanner = DiffScanner::new(ScanOptions::default_options());
    /// let summary = scanner.scan("");
    /// assert_eq!(summary, Default::default());
    /// ```
    pub fn scan(&self, input: &str) -> CommitDiffSummary {
        let lines: Vec<&str> = input.lines().collect();
        let mut summary = CommitDiffSummary::default();
        let mut section: Option<Section> = None;
        let mut in_block_comment = false;
        let mut hunk_open = false;

        for (i, line) in lines.iter().enumerate() {
            match classify::classify(line) {
                LineKind::FileHeader => {
                    // Noise-filter and hunk state never leak across sections.
                    in_block_comment = false;
                    hunk_open = false;

                    let test = self.options.is_test_header(line);
                    let name = classify::header_file_name(line).unwrap_or("");
                    let path = classify::header_path(line).unwrap_or(name);
                    let tracked =
                        !test && self.options.is_tracked(name) && !self.options.is_skipped(path);

                    if test {
                        summary.test_case_present = true;
                    } else {
                        summary.file_count += 1;
                        if tracked {
                            summary.tracked_file_count += 1;
                        }
                    }
                    section = Some(Section {
                        start: i,
                        tracked,
                        test,
                    });
                }
                LineKind::HunkHeader | LineKind::Context => {
                    hunk_open = false;
                }
                LineKind::Added | LineKind::Removed => {
                    let Some(sec) = section.as_ref() else {
                        continue;
                    };
                    if sec.test || !sec.tracked {
                        continue;
                    }

                    let code = &line[1..];
                    let verdict = noise::assess(code, in_block_comment);
                    in_block_comment = verdict.in_block_comment;
                    if !verdict.meaningful {
                        continue;
                    }

                    if !hunk_open {
                        summary.hunk_count += 1;
                        hunk_open = true;
                    }
                    if let Some(name) = self.attributor.attribute(&lines, i, sec.start) {
                        if !summary.function_names.contains(&name) {
                            summary.function_names.push(name);
                        }
                    }
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> DiffScanner {
        DiffScanner::new(ScanOptions::default_options())
    }

    #[test]
    fn empty_input_yields_zero_summary() {
        let summary = scanner().scan("");
        assert_eq!(summary, CommitDiffSummary::default());
    }

    #[test]
    fn no_changed_lines_means_no_hunks_or_names() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,3 +1,3 @@
 public void untouched() {
 }
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.tracked_file_count, 1);
        assert_eq!(summary.hunk_count, 0);
        assert!(summary.function_names.is_empty());
    }

    #[test]
    fn added_line_attributes_to_enclosing_function() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -10,4 +10,7 @@
+public int bar() {
+    int y = 0;
+
+    int x = compute();
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.hunk_count, 1);
        assert_eq!(summary.function_names, vec!["bar"]);
    }

    #[test]
    fn context_line_splits_hunks() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,8 +1,10 @@
 public void act() {
+    first();
 }
+    second();
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.hunk_count, 2);
    }

    #[test]
    fn blank_changed_line_does_not_split_a_hunk() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,6 +1,9 @@
 public void act() {
+    first();
+
+    second();
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.hunk_count, 1);
    }

    #[test]
    fn comment_only_changes_count_nothing() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,4 +1,5 @@
 public void act() {
+// comment
 }
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.hunk_count, 0);
        assert!(summary.function_names.is_empty());
    }

    #[test]
    fn unterminated_block_comment_swallows_added_lines() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,4 +1,7 @@
 public void act() {
+/* explanation
+second line
+third line
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.hunk_count, 0);
        assert!(summary.function_names.is_empty());
    }

    #[test]
    fn block_comment_state_resets_at_section_boundary() {
        let diff = "\
diff --git a/A.java b/A.java
--- a/A.java
+++ b/A.java
@@ -1,3 +1,4 @@
+/* left open
diff --git a/B.java b/B.java
--- a/B.java
+++ b/B.java
@@ -1,3 +1,4 @@
 public void fresh() {
+    call();
";
        let summary = scanner().scan(diff);
        // B.java's change is meaningful despite A.java's dangling opener.
        assert_eq!(summary.hunk_count, 1);
        assert_eq!(summary.function_names, vec!["fresh"]);
    }

    #[test]
    fn test_files_are_excluded_but_flagged() {
        let diff = "\
diff --git a/FooTest.java b/FooTest.java
--- a/FooTest.java
+++ b/FooTest.java
@@ -1,4 +1,5 @@
 public void testAct() {
+    assertTrue(ok);
 }
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.file_count, 0);
        assert_eq!(summary.tracked_file_count, 0);
        assert_eq!(summary.hunk_count, 0);
        assert!(summary.test_case_present);
    }

    #[test]
    fn test_path_convention_is_recognized() {
        let diff = "\
diff --git a/src/test/java/FooIT.java b/src/test/java/FooIT.java
--- a/src/test/java/FooIT.java
+++ b/src/test/java/FooIT.java
@@ -1,3 +1,4 @@
+    verify();
";
        let summary = scanner().scan(diff);
        assert!(summary.test_case_present);
        assert_eq!(summary.tracked_file_count, 0);
    }

    #[test]
    fn untracked_extensions_count_as_files_only() {
        let diff = "\
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1,2 +1,3 @@
+New paragraph of prose.
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.tracked_file_count, 0);
        assert_eq!(summary.hunk_count, 0);
    }

    #[test]
    fn unattributed_hunks_count_without_names() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,3 +1,4 @@
+    orphan();
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.hunk_count, 1);
        assert!(summary.function_names.is_empty());
    }

    #[test]
    fn distinct_names_are_deduplicated_in_first_seen_order() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,12 +1,14 @@
 public void alpha() {
+    one();
 }
 public void beta() {
+    two();
 }
@@ -20,6 +22,7 @@
 public void alpha() {
+    three();
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.function_names, vec!["alpha", "beta"]);
        assert_eq!(summary.hunk_count, 3);
    }

    #[test]
    fn multiple_files_are_counted_independently() {
        let diff = "\
diff --git a/A.java b/A.java
--- a/A.java
+++ b/A.java
@@ -1,4 +1,5 @@
 public void inA() {
+    a();
 }
diff --git a/b.css b/b.css
--- a/b.css
+++ b/b.css
@@ -1,2 +1,3 @@
+.rule { color: red; }
";
        let summary = scanner().scan(diff);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.tracked_file_count, 1);
        assert_eq!(summary.hunk_count, 1);
        assert_eq!(summary.function_names, vec!["inA"]);
    }

    #[test]
    fn skip_patterns_untrack_matching_paths() {
        let config = ScanConfig {
            skip_patterns: vec!["generated/**".into()],
            ..ScanConfig::default()
        };
        let scanner = DiffScanner::new(ScanOptions::from_config(&config));
        let diff = "\
diff --git a/generated/Gen.java b/generated/Gen.java
--- a/generated/Gen.java
+++ b/generated/Gen.java
@@ -1,2 +1,3 @@
+    emitted();
";
        let summary = scanner.scan(diff);
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.tracked_file_count, 0);
        assert_eq!(summary.hunk_count, 0);
    }

    #[test]
    fn changed_lines_before_any_header_are_ignored() {
        let diff = "\
+stray added line
@@ -1,2 +1,3 @@
+another stray
";
        let summary = scanner().scan(diff);
        assert_eq!(summary, CommitDiffSummary::default());
    }

    #[test]
    fn scan_is_idempotent() {
        let diff = "\
diff --git a/Foo.java b/Foo.java
--- a/Foo.java
+++ b/Foo.java
@@ -1,6 +1,8 @@
 public void act() {
+    first();
 }
+// note
+    second();
";
        let scanner = scanner();
        let first = scanner.scan(diff);
        let second = scanner.scan(diff);
        assert_eq!(first, second);
    }
}
