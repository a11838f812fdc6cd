/// The kind of a single raw diff line.
///
/// A line's kind is a pure function of its text; it is recomputed wherever
/// needed rather than stored.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::classify::{classify, LineKind};
///
/// assert_eq!(classify("diff --git a/Foo.java b/Foo.java"), LineKind::FileHeader);
/// assert_eq!(classify("@@ -1,3 +1,4 @@"), LineKind::HunkHeader);
/// assert_eq!(classify("+    int x = 1;"), LineKind::Added);
/// assert_eq!(classify("-    int x = 0;"), LineKind::Removed);
/// assert_eq!(classify("     int x = 0;"), LineKind::Context);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A `diff ...` line opening a new file section.
    FileHeader,
    /// A `@@ ... @@` hunk range line.
    HunkHeader,
    /// A content line added in the new version.
    Added,
    /// A content line removed from the old version.
    Removed,
    /// Anything else: unchanged context, `---`/`+++` markers, index lines.
    Context,
}

/// Classify one raw diff line.
///
/// The `+++`/`---` path markers deliberately classify as [`LineKind::Context`];
/// only single-marker lines are changes.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::classify::{classify, LineKind};
///
/// assert_eq!(classify("+++ b/Foo.java"), LineKind::Context);
/// assert_eq!(classify("--- a/Foo.java"), LineKind::Context);
/// assert_eq!(classify(""), LineKind::Context);
/// ```
pub fn classify(line: &str) -> LineKind {
    if line.starts_with("diff ") {
        LineKind::FileHeader
    } else if line.contains("@@") {
        LineKind::HunkHeader
    } else if line.starts_with('+') && !line.starts_with("+++") {
        LineKind::Added
    } else if line.starts_with('-') && !line.starts_with("---") {
        LineKind::Removed
    } else {
        LineKind::Context
    }
}

/// Extract the file name (trailing path segment) from a file header line.
///
/// Returns `None` when the header carries no `/`-separated path at all.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::classify::header_file_name;
///
/// assert_eq!(
///     header_file_name("diff --git a/src/Foo.java b/src/Foo.java"),
///     Some("Foo.java")
/// );
/// assert_eq!(header_file_name("diff --git"), None);
/// ```
pub fn header_file_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("diff ")?;
    if !rest.contains('/') {
        return None;
    }
    let name = rest.rsplit('/').next().unwrap_or("").trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Extract the new-version path from a `diff --git a/... b/...` header.
///
/// Falls back to `None` when the ` b/` marker is absent; callers then use
/// [`header_file_name`].
///
/// # Examples
///
/// ```
/// use magpie_diffscan::classify::header_path;
///
/// assert_eq!(
///     header_path("diff --git a/src/Foo.java b/src/Foo.java"),
///     Some("src/Foo.java")
/// );
/// assert_eq!(header_path("diff --cc src/Foo.java"), None);
/// ```
pub fn header_path(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("diff ")?;
    rest.split(" b/").nth(1).map(str::trim)
}

/// Extract the trailing context string from a hunk header, if any.
///
/// Many diff tools echo the enclosing declaration after the second `@@`
/// marker; that text is the attribution fallback when no signature is found
/// inside the hunk body.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::classify::hunk_context;
///
/// assert_eq!(
///     hunk_context("@@ -10,6 +10,8 @@ public void doWork(int n) {"),
///     Some("public void doWork(int n) {")
/// );
/// assert_eq!(hunk_context("@@ -1,3 +1,4 @@"), None);
/// ```
pub fn hunk_context(line: &str) -> Option<&str> {
    let first = line.find("@@")?;
    let after_first = &line[first + 2..];
    let second = after_first.find("@@")?;
    let trailing = after_first[second + 2..].trim();
    if trailing.is_empty() {
        None
    } else {
        Some(trailing)
    }
}
