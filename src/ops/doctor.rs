use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::{Status, Todo};

/// Open todos older than this are reported as stale.
pub const STALE_AFTER_DAYS: i64 = 30;

/// Structured result from `todo doctor`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct DoctorReport {
    pub total: usize,
    /// Paths checked across all todos
    pub paths_checked: usize,
    pub issues: Vec<Issue>,
}

impl DoctorReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind() == kind).count()
    }
}

/// A single finding. `index` is the 1-based list position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Issue {
    /// A context path that no longer exists under the project root
    OrphanedPath {
        index: usize,
        id: String,
        text: String,
        path: String,
    },
    EmptyText { index: usize, id: String },
    /// Same trimmed text as an earlier todo
    Duplicate {
        index: usize,
        id: String,
        text: String,
        first_index: usize,
    },
    Stale {
        index: usize,
        id: String,
        text: String,
        age_days: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    OrphanedPath,
    EmptyText,
    Duplicate,
    Stale,
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Issue::OrphanedPath { .. } => IssueKind::OrphanedPath,
            Issue::EmptyText { .. } => IssueKind::EmptyText,
            Issue::Duplicate { .. } => IssueKind::Duplicate,
            Issue::Stale { .. } => IssueKind::Stale,
        }
    }
}

/// Counts of what `apply_fixes` changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixSummary {
    pub removed_orphaned_paths: usize,
    pub removed_empty: usize,
    pub removed_duplicates: usize,
}

impl FixSummary {
    pub fn has_changes(&self) -> bool {
        self.removed_orphaned_paths + self.removed_empty + self.removed_duplicates > 0
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Run every health check. Read-only.
///
/// Relative paths are resolved against `root`; absolute paths are checked
/// as written.
pub fn check(todos: &[Todo], root: &Path, now: DateTime<Utc>) -> DoctorReport {
    let mut report = DoctorReport {
        total: todos.len(),
        ..DoctorReport::default()
    };
    let stale_cutoff = Duration::days(STALE_AFTER_DAYS);
    let mut first_seen: Vec<(String, usize)> = Vec::new();

    for (i, todo) in todos.iter().enumerate() {
        let index = i + 1;

        for path in &todo.context.paths {
            report.paths_checked += 1;
            if !root.join(path).exists() {
                report.issues.push(Issue::OrphanedPath {
                    index,
                    id: todo.id.clone(),
                    text: todo.text.clone(),
                    path: path.clone(),
                });
            }
        }

        let trimmed = todo.text.trim();
        if trimmed.is_empty() {
            report.issues.push(Issue::EmptyText {
                index,
                id: todo.id.clone(),
            });
        } else if let Some((_, first)) = first_seen.iter().find(|(t, _)| t == trimmed) {
            report.issues.push(Issue::Duplicate {
                index,
                id: todo.id.clone(),
                text: todo.text.clone(),
                first_index: *first,
            });
        } else {
            first_seen.push((trimmed.to_string(), index));
        }

        let age = now - todo.created_at;
        if todo.status == Status::Open && age > stale_cutoff {
            report.issues.push(Issue::Stale {
                index,
                id: todo.id.clone(),
                text: todo.text.clone(),
                age_days: age.num_days(),
            });
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Fixes
// ---------------------------------------------------------------------------

/// Drop empty todos, drop later duplicates (the first occurrence stays),
/// and strip paths that no longer exist. Stale todos are left alone.
pub fn apply_fixes(todos: Vec<Todo>, root: &Path) -> (Vec<Todo>, FixSummary) {
    let mut summary = FixSummary::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cleaned = Vec::with_capacity(todos.len());

    for mut todo in todos {
        let trimmed = todo.text.trim().to_string();
        if trimmed.is_empty() {
            summary.removed_empty += 1;
            continue;
        }
        if !seen.insert(trimmed) {
            summary.removed_duplicates += 1;
            continue;
        }

        let before = todo.context.paths.len();
        let valid: Vec<String> = todo
            .context
            .paths
            .iter()
            .filter(|p| root.join(p).exists())
            .cloned()
            .collect();
        if valid.len() != before {
            summary.removed_orphaned_paths += before - valid.len();
            todo.set_paths(valid);
        }

        cleaned.push(todo);
    }

    (cleaned, summary)
}
