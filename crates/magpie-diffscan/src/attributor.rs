//! Backward-scanning attribution of changed lines to enclosing functions.

use regex::Regex;

use crate::classify::{self, LineKind};

/// Identifiers that look like function names to the signature pattern but
/// are control-flow keywords. A match on one of these is a false positive;
/// the scan continues upward past it.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "switch", "catch", "finally", "try",
];

/// Finds the nearest enclosing function for a changed line by scanning the
/// diff buffer backward.
///
/// Both patterns are compiled once at construction. Signature detection is
/// a single-line regex and therefore approximate: multi-line signatures,
/// generics in the return position, and lambdas are out of its reach. That
/// is the contract, not a gap to fix with a parser.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::FunctionAttributor;
///
/// let attributor = FunctionAttributor::new();
/// let lines = vec![
///     "diff --git a/Foo.java b/Foo.java",
///     "@@ -1,4 +1,5 @@",
///     "+public int bar() {",
///     "+    int x = compute();",
/// ];
/// assert_eq!(attributor.attribute(&lines, 3, 0), Some("bar".to_string()));
/// ```
pub struct FunctionAttributor {
    signature: Regex,
    hunk_context: Regex,
}

impl Default for FunctionAttributor {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionAttributor {
    /// Compile the signature and hunk-context patterns.
    pub fn new() -> Self {
        let signature = Regex::new(
            r"(?:\b(?:public|private|protected|static|final|synchronized|abstract|native)\s+)*(?:[\w$]+(?:\[\])?\s+)?([A-Za-z_$][\w$]*)\s*\(.*?\)\s*\{",
        )
        .expect("signature pattern");
        let hunk_context = Regex::new(r"@@.*?@@\s*(.+?)\s*\(").expect("hunk context pattern");
        Self {
            signature,
            hunk_context,
        }
    }

    /// Name the enclosing function of the changed line at `index`, or `None`.
    ///
    /// Scans `lines` backward from `index - 1` down to `section_start` (the
    /// file header opening the current section; the scan never crosses it).
    /// Stop conditions, in the order they are evaluated at each prior line:
    ///
    /// - the signature pattern matches and the identifier is not a control
    ///   keyword: accept the identifier;
    /// - the signature pattern matches a control keyword: keep scanning;
    /// - the line is a hunk header: accept its trailing context text if the
    ///   header carries one, otherwise stop unattributed;
    /// - the line is a file header: section boundary, stop unattributed;
    /// - anything else (other changed lines, context): keep scanning —
    ///   consecutive changed lines can share one signature further back.
    ///
    /// The nearest valid signature always wins; hunk-header context is only
    /// a fallback. Attribution is deterministic in the line buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use magpie_diffscan::FunctionAttributor;
    ///
    /// let attributor = FunctionAttributor::new();
    /// let lines = vec![
    ///     "diff --git a/Foo.java b/Foo.java",
    ///     "@@ -8,3 +8,4 @@ public void onReady(Event e)",
    ///     "+        queue.flush();",
    /// ];
    /// // No signature inside the hunk body: fall back to the header echo.
    /// assert_eq!(
    ///     attributor.attribute(&lines, 2, 0),
    ///     Some("public void onReady".to_string())
    /// );
    /// ```
    pub fn attribute(&self, lines: &[&str], index: usize, section_start: usize) -> Option<String> {
        let index = index.min(lines.len());
        for j in (section_start..index).rev() {
            let prior = lines[j];

            if let Some(caps) = self.signature.captures(prior) {
                let ident = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                if CONTROL_KEYWORDS.contains(&ident) {
                    continue;
                }
                return Some(ident.to_string());
            }

            match classify::classify(prior) {
                LineKind::HunkHeader => {
                    return self
                        .hunk_context
                        .captures(prior)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().trim().to_string());
                }
                LineKind::FileHeader => return None,
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributor() -> FunctionAttributor {
        FunctionAttributor::new()
    }

    #[test]
    fn nearest_signature_wins() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -1,9 +1,10 @@",
            "+public int far() {",
            " }",
            "+public int near() {",
            "+    int x = 1;",
        ];
        assert_eq!(attributor().attribute(&lines, 5, 0), Some("near".into()));
    }

    #[test]
    fn signature_on_changed_line_is_found() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -1,4 +1,5 @@",
            "+public int bar() {",
            "+    int y = 0;",
            "+    int x = compute();",
        ];
        assert_eq!(attributor().attribute(&lines, 4, 0), Some("bar".into()));
    }

    #[test]
    fn control_keywords_are_rejected_and_scan_continues() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -1,9 +1,10 @@",
            " public void handle(Request r) {",
            "     if (r.valid()) {",
            "+        r.apply();",
        ];
        assert_eq!(attributor().attribute(&lines, 4, 0), Some("handle".into()));
    }

    #[test]
    fn all_control_keywords_are_rejected() {
        let attributor = attributor();
        for kw in ["if", "else", "for", "while", "switch", "catch", "finally", "try"] {
            let header = format!(" {kw} (x) {{");
            let lines = vec![
                "diff --git a/Foo.java b/Foo.java",
                "@@ -1,3 +1,4 @@",
                header.as_str(),
                "+    work();",
            ];
            assert_eq!(
                attributor.attribute(&lines, 3, 0),
                None,
                "keyword {kw} must not be attributed"
            );
        }
    }

    #[test]
    fn hunk_header_context_is_fallback() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -20,6 +20,7 @@ private void rebuildIndex(Path root)",
            "+        entries.clear();",
        ];
        assert_eq!(
            attributor().attribute(&lines, 2, 0),
            Some("private void rebuildIndex".into())
        );
    }

    #[test]
    fn hunk_header_without_context_stops_unattributed() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -1,3 +1,4 @@",
            "+        entries.clear();",
        ];
        assert_eq!(attributor().attribute(&lines, 2, 0), None);
    }

    #[test]
    fn scan_stops_at_hunk_header_not_before() {
        // The signature above the hunk header must not be reached.
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            " public void unreachable() {",
            "@@ -1,3 +1,4 @@",
            "+        entries.clear();",
        ];
        assert_eq!(attributor().attribute(&lines, 3, 0), None);
    }

    #[test]
    fn scan_never_crosses_section_start() {
        let lines = vec![
            "diff --git a/A.java b/A.java",
            " public void previousFile() {",
            "diff --git a/B.java b/B.java",
            "+        b.touch();",
        ];
        assert_eq!(attributor().attribute(&lines, 3, 2), None);
    }

    #[test]
    fn changed_lines_do_not_stop_the_scan() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -1,9 +1,12 @@",
            " public String render(Model m) {",
            "+    a();",
            "-    b();",
            "+    c();",
        ];
        let attributor = attributor();
        assert_eq!(attributor.attribute(&lines, 3, 0), Some("render".into()));
        assert_eq!(attributor.attribute(&lines, 5, 0), Some("render".into()));
    }

    #[test]
    fn array_return_types_match() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -1,3 +1,4 @@",
            " public byte[] encode(String s) {",
            "+    buf.reset();",
        ];
        assert_eq!(attributor().attribute(&lines, 3, 0), Some("encode".into()));
    }

    #[test]
    fn attribution_is_deterministic() {
        let lines = vec![
            "diff --git a/Foo.java b/Foo.java",
            "@@ -1,4 +1,5 @@",
            " static long tally(long[] xs) {",
            "+    total += xs.length;",
        ];
        let attributor = attributor();
        let first = attributor.attribute(&lines, 3, 0);
        let second = attributor.attribute(&lines, 3, 0);
        assert_eq!(first, second);
        assert_eq!(first, Some("tally".into()));
    }
}
