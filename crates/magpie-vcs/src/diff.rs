//! Commit diff extraction via git2.

use std::path::Path;

use git2::{DiffFormat, DiffOptions, Repository};
use magpie_core::MagpieError;

/// Produce the unified diff of one commit against its first parent.
///
/// Root commits diff against the empty tree. The output matches the shape
/// of `git diff <hash>^..<hash>`: `diff --git` file headers, `@@` hunk
/// headers, and `+`/`-`/` ` content lines.
///
/// An empty string is a valid result (an empty commit), distinct from the
/// error cases below — callers decide whether to fall back to a network
/// fetch on either condition.
///
/// # Errors
///
/// Returns [`MagpieError::Git`] if the repository cannot be opened, the
/// hash does not resolve to a commit, or the diff cannot be computed.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use magpie_vcs::commit_diff;
///
/// let diff = commit_diff(Path::new("/srv/clones/acme"), "8a41d07").unwrap();
/// assert!(diff.starts_with("diff --git") || diff.is_empty());
/// ```
pub fn commit_diff(repo_path: &Path, hash: &str) -> Result<String, MagpieError> {
    let repo = Repository::open(repo_path)
        .map_err(|e| MagpieError::Git(format!("failed to open repository: {e}")))?;

    let commit = repo
        .revparse_single(hash)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|e| MagpieError::Git(format!("failed to resolve commit '{hash}': {e}")))?;

    let commit_tree = commit
        .tree()
        .map_err(|e| MagpieError::Git(format!("failed to get commit tree: {e}")))?;

    let parent_tree = if commit.parent_count() > 0 {
        let parent = commit
            .parent(0)
            .map_err(|e| MagpieError::Git(format!("failed to get parent: {e}")))?;
        Some(
            parent
                .tree()
                .map_err(|e| MagpieError::Git(format!("failed to get parent tree: {e}")))?,
        )
    } else {
        None
    };

    let mut diff_opts = DiffOptions::new();
    let diff = repo
        .diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&commit_tree),
            Some(&mut diff_opts),
        )
        .map_err(|e| MagpieError::Git(format!("failed to compute diff: {e}")))?;

    let mut out = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        match line.origin() {
            '+' | '-' | ' ' => out.push(line.origin()),
            _ => {}
        }
        out.push_str(std::str::from_utf8(line.content()).unwrap_or(""));
        true
    })
    .map_err(|e| MagpieError::Git(format!("failed to print diff: {e}")))?;

    Ok(out)
}

/// Name of the branch HEAD points at, or `None` when detached.
///
/// # Errors
///
/// Returns [`MagpieError::Git`] if the repository cannot be opened or has
/// no HEAD (an empty repository).
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use magpie_vcs::current_branch;
///
/// let branch = current_branch(Path::new(".")).unwrap();
/// println!("{}", branch.as_deref().unwrap_or("(detached)"));
/// ```
pub fn current_branch(repo_path: &Path) -> Result<Option<String>, MagpieError> {
    let repo = Repository::open(repo_path)
        .map_err(|e| MagpieError::Git(format!("failed to open repository: {e}")))?;

    let head = repo
        .head()
        .map_err(|e| MagpieError::Git(format!("failed to read HEAD: {e}")))?;

    if head.is_branch() {
        Ok(head.shorthand().map(String::from))
    } else {
        Ok(None)
    }
}
