//! Meaningful-line filtering for changed diff lines.
//!
//! A changed line is "meaningful" when it is none of: blank, whitespace-only,
//! an import statement, or comment text. The only carried state is whether
//! the scan is currently inside a multi-line comment; it is passed in and
//! returned explicitly so callers can reset it at file-section boundaries.

/// Outcome of assessing one changed line.
///
/// `in_block_comment` is the updated state to thread into the next call.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::noise::assess;
///
/// let v = assess("    int x = 1;", false);
/// assert!(v.meaningful);
/// assert!(!v.in_block_comment);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the line counts toward hunks and attribution.
    pub meaningful: bool,
    /// Whether subsequent lines are inside a multi-line comment.
    pub in_block_comment: bool,
}

impl Verdict {
    fn noise(in_block_comment: bool) -> Self {
        Self {
            meaningful: false,
            in_block_comment,
        }
    }
}

/// Decide whether a changed line is meaningful.
///
/// `code` is the line with its leading `+`/`-` marker already stripped.
/// Rules apply in order, first match wins:
///
/// 1. empty line
/// 2. whitespace-only line
/// 3. import statement (`import` keyword followed by whitespace)
/// 4. `//` line comment
/// 5. `*` continuation line (javadoc style)
/// 6. `/*` or `/**` opener — enters block-comment state
/// 7. `*/` at line end — leaves block-comment state
/// 8. already inside a block comment
/// 9. otherwise meaningful
///
/// A line that both opens and closes a comment (`/* x */`) is treated as
/// still-open because the opener rule fires first. This mirrors the observed
/// behavior being specified; it is a known quirk, kept on purpose.
///
/// # Examples
///
/// ```
/// use magpie_diffscan::noise::assess;
///
/// assert!(!assess("// comment", false).meaningful);
/// assert!(!assess("import java.util.List;", false).meaningful);
/// assert!(assess("list.add(x);", false).meaningful);
///
/// let opened = assess("/* start", false);
/// assert!(opened.in_block_comment);
/// let closed = assess(" */", true);
/// assert!(!closed.in_block_comment);
/// ```
pub fn assess(code: &str, in_block_comment: bool) -> Verdict {
    let trimmed = code.trim();

    if code.is_empty() {
        return Verdict::noise(in_block_comment);
    }
    if trimmed.is_empty() {
        return Verdict::noise(in_block_comment);
    }
    if is_import(trimmed) {
        return Verdict::noise(in_block_comment);
    }
    if trimmed.starts_with("//") {
        return Verdict::noise(in_block_comment);
    }
    if trimmed.starts_with('*') && !trimmed.starts_with("*/") {
        return Verdict::noise(in_block_comment);
    }
    if trimmed.starts_with("/*") {
        return Verdict::noise(true);
    }
    if trimmed.ends_with("*/") {
        return Verdict::noise(false);
    }
    if in_block_comment {
        return Verdict::noise(true);
    }

    Verdict {
        meaningful: true,
        in_block_comment,
    }
}

fn is_import(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("import")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_are_noise() {
        assert!(!assess("", false).meaningful);
        assert!(!assess("    ", false).meaningful);
        assert!(!assess("\t", false).meaningful);
    }

    #[test]
    fn imports_are_noise() {
        assert!(!assess("import java.util.List;", false).meaningful);
        assert!(!assess("   import static org.junit.Assert.*;", false).meaningful);
        // `import` must be a standalone keyword
        assert!(assess("importer.run();", false).meaningful);
    }

    #[test]
    fn line_comments_are_noise() {
        assert!(!assess("// comment", false).meaningful);
        assert!(!assess("    // trailing thought", false).meaningful);
    }

    #[test]
    fn javadoc_continuation_is_noise() {
        assert!(!assess(" * the value to use", false).meaningful);
        assert!(!assess(" * @param x input", true).meaningful);
    }

    #[test]
    fn block_comment_opener_sets_state() {
        let v = assess("/* begin", false);
        assert!(!v.meaningful);
        assert!(v.in_block_comment);

        let v = assess("/** javadoc", false);
        assert!(!v.meaningful);
        assert!(v.in_block_comment);
    }

    #[test]
    fn block_comment_closer_clears_state() {
        let v = assess(" */", true);
        assert!(!v.meaningful);
        assert!(!v.in_block_comment);

        let v = assess("end of story */", true);
        assert!(!v.meaningful);
        assert!(!v.in_block_comment);
    }

    #[test]
    fn lines_inside_block_comment_are_noise() {
        let v = assess("this text is commented out();", true);
        assert!(!v.meaningful);
        assert!(v.in_block_comment);
    }

    #[test]
    fn same_line_open_close_stays_open() {
        // Opener rule fires before the closer rule; kept as defined behavior.
        let v = assess("/* one-liner */", false);
        assert!(!v.meaningful);
        assert!(v.in_block_comment);
    }

    #[test]
    fn ordinary_code_is_meaningful() {
        assert!(assess("int x = compute();", false).meaningful);
        assert!(assess("}", false).meaningful);
        assert!(assess("public int bar() {", false).meaningful);
    }

    #[test]
    fn state_is_threaded_not_global() {
        let opened = assess("/*", false);
        assert!(opened.in_block_comment);
        // A fresh call with fresh state is unaffected by the previous one.
        assert!(assess("int y = 2;", false).meaningful);
    }
}
