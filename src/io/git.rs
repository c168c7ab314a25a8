use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Branch and commit at the time a todo was captured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitInfo {
    pub branch: Option<String>,
    pub commit: Option<String>,
}

/// Run `git <args>` in `dir`, returning trimmed stdout on success.
/// A missing git binary or a failing command both yield `None`.
fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn is_repo(dir: &Path) -> bool {
    git_output(dir, &["rev-parse", "--is-inside-work-tree"]).as_deref() == Some("true")
}

/// Current branch name; `None` on a detached HEAD or outside a repository.
pub fn current_branch(dir: &Path) -> Option<String> {
    git_output(dir, &["rev-parse", "--abbrev-ref", "HEAD"]).filter(|b| b != "HEAD")
}

/// Abbreviated HEAD commit hash
pub fn current_commit(dir: &Path) -> Option<String> {
    git_output(dir, &["rev-parse", "--short", "HEAD"])
}

/// Capture branch and commit, or `None` when `dir` is not inside a repository.
pub fn capture(dir: &Path) -> Option<GitInfo> {
    if !is_repo(dir) {
        debug!(dir = %dir.display(), "not a git repository");
        return None;
    }
    Some(GitInfo {
        branch: current_branch(dir),
        commit: current_commit(dir),
    })
}

/// Branch and commit to record on a new todo. Outside a repository or on a
/// detached HEAD the branch falls back to `default_branch`.
pub fn capture_with_fallback(dir: &Path, default_branch: Option<String>) -> GitInfo {
    match capture(dir) {
        Some(info) => GitInfo {
            branch: info.branch.or(default_branch),
            commit: info.commit,
        },
        None => GitInfo {
            branch: default_branch,
            commit: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plain_directory_is_not_repo() {
        let tmp = TempDir::new().unwrap();
        // Guard against the temp dir living inside some enclosing checkout.
        if is_repo(tmp.path().parent().unwrap_or(tmp.path())) {
            return;
        }
        assert!(!is_repo(tmp.path()));
        assert_eq!(capture(tmp.path()), None);
        assert_eq!(current_branch(tmp.path()), None);
    }

    #[test]
    fn test_fallback_branch_outside_repo() {
        let tmp = TempDir::new().unwrap();
        if is_repo(tmp.path()) {
            return;
        }
        let info = capture_with_fallback(tmp.path(), Some("trunk".into()));
        assert_eq!(
            info,
            GitInfo {
                branch: Some("trunk".into()),
                commit: None,
            }
        );
        assert_eq!(capture_with_fallback(tmp.path(), None), GitInfo::default());
    }
}
