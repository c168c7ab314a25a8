use std::path::Path;

use serde::Serialize;

use crate::model::{Config, Status, Todo};
use crate::ops::doctor::{DoctorReport, FixSummary, Issue};
use crate::ops::focus::Focus;
use crate::ops::todo_ops::count_by_status;
use crate::util::time::relative_time;
use crate::util::unicode::{single_line, truncate_to_width};

/// Width of todo text in plain listings
const TEXT_WIDTH: usize = 50;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// A todo together with its 1-based position in the full collection, which
/// is what `done`, `edit`, and friends accept.
#[derive(Serialize)]
pub struct IndexedTodoJson<'a> {
    pub index: usize,
    #[serde(flatten)]
    pub todo: &'a Todo,
}

#[derive(Serialize)]
pub struct ListJson<'a> {
    pub todos: Vec<IndexedTodoJson<'a>>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct DoctorJson<'a> {
    pub report: &'a DoctorReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixes: Option<FixSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigJson<'a> {
    pub project_root: &'a Path,
    #[serde(flatten)]
    pub config: &'a Config,
}

pub fn list_to_json<'a>(todos: &'a [Todo], visible: &[usize]) -> ListJson<'a> {
    ListJson {
        todos: visible
            .iter()
            .map(|&i| IndexedTodoJson {
                index: i + 1,
                todo: &todos[i],
            })
            .collect(),
        count: visible.len(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `  3. ○ Fix login redirect  [high]`
pub fn format_todo_line(index: usize, todo: &Todo) -> String {
    let text = truncate_to_width(&single_line(&todo.text), TEXT_WIDTH);
    let mut line = format!("{:>3}. {} {}", index, todo.status.icon(), text);
    if todo.priority != crate::model::Priority::Medium {
        line.push_str(&format!("  [{}]", todo.priority));
    }
    line
}

/// Paths and branch lines shown beneath a todo, indented to its text.
pub fn format_context_lines(todo: &Todo) -> Vec<String> {
    let mut lines = Vec::new();
    if !todo.context.paths.is_empty() {
        lines.push(format!("       paths: {}", todo.context.paths.join(", ")));
    }
    if let Some(branch) = &todo.context.branch {
        lines.push(format!("       branch: {}", branch));
    }
    lines
}

/// Non-interactive rendering of the rows at `visible`, numbered by their
/// position in the full collection, followed by a counts line.
pub fn format_static_list(todos: &[Todo], visible: &[usize]) -> Vec<String> {
    let mut lines = Vec::new();
    for &i in visible {
        let todo = &todos[i];
        lines.push(format_todo_line(i + 1, todo));
        lines.extend(format_context_lines(todo));
    }

    let shown: Vec<Todo> = visible.iter().map(|&i| todos[i].clone()).collect();
    lines.push(String::new());
    lines.push(format_counts(&shown));
    lines
}

/// `2 open, 1 done, 4 total`
pub fn format_counts(todos: &[Todo]) -> String {
    format!(
        "{} open, {} done, {} total",
        count_by_status(todos, Status::Open),
        count_by_status(todos, Status::Done),
        todos.len()
    )
}

pub fn format_focus(focus: &Focus) -> Vec<String> {
    let mut lines = Vec::new();

    let mut others = Vec::new();
    if focus.blocked > 0 {
        others.push(format!("{} blocked", focus.blocked));
    }
    if focus.waiting > 0 {
        others.push(format!("{} waiting", focus.waiting));
    }
    if focus.done > 0 {
        others.push(format!("{} done", focus.done));
    }
    if !others.is_empty() {
        lines.push(others.join(", "));
    }
    if let Some(branch) = &focus.branch {
        lines.push(format!("branch: {}", branch));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    for (i, item) in focus.todos.iter().enumerate() {
        let todo = &item.todo;
        let age = relative_time(&todo.created_at);
        if i == 0 {
            lines.push("CURRENT FOCUS".to_string());
            lines.push(format!(
                "  ▶ {}. {}  ({})",
                item.index,
                single_line(&todo.text),
                age
            ));
            for ctx in format_context_lines(todo) {
                lines.push(ctx);
            }
            if focus.todos.len() > 1 {
                lines.push(String::new());
                lines.push("UP NEXT".to_string());
            }
        } else {
            let text = truncate_to_width(&single_line(&todo.text), TEXT_WIDTH);
            lines.push(format!("{:>3}. {}  ({})", item.index, text, age));
        }
    }
    lines
}

pub fn format_doctor_report(report: &DoctorReport) -> Vec<String> {
    let mut lines = vec![format!(
        "checked {} todo(s), {} path(s)",
        report.total, report.paths_checked
    )];

    if report.is_healthy() {
        lines.push("no issues found".to_string());
        return lines;
    }

    lines.push(format!("{} issue(s):", report.issues.len()));
    for issue in &report.issues {
        lines.push(format!("  {}", format_issue(issue)));
    }
    lines
}

fn format_issue(issue: &Issue) -> String {
    match issue {
        Issue::OrphanedPath {
            index, text, path, ..
        } => format!(
            "#{} orphaned path {} ({})",
            index,
            path,
            truncate_to_width(text, TEXT_WIDTH)
        ),
        Issue::EmptyText { index, id } => format!("#{} empty todo ({})", index, id),
        Issue::Duplicate {
            index,
            text,
            first_index,
            ..
        } => format!(
            "#{} duplicates #{} ({})",
            index,
            first_index,
            truncate_to_width(text, TEXT_WIDTH)
        ),
        Issue::Stale {
            index,
            text,
            age_days,
            ..
        } => format!(
            "#{} stale, open {} days ({})",
            index,
            age_days,
            truncate_to_width(text, TEXT_WIDTH)
        ),
    }
}

pub fn format_fix_summary(fixes: &FixSummary) -> Vec<String> {
    if !fixes.has_changes() {
        return vec!["no changes needed".to_string()];
    }
    let mut lines = Vec::new();
    if fixes.removed_orphaned_paths > 0 {
        lines.push(format!(
            "removed {} invalid path(s)",
            fixes.removed_orphaned_paths
        ));
    }
    if fixes.removed_empty > 0 {
        lines.push(format!("removed {} empty todo(s)", fixes.removed_empty));
    }
    if fixes.removed_duplicates > 0 {
        lines.push(format!(
            "removed {} duplicate todo(s)",
            fixes.removed_duplicates
        ));
    }
    lines
}

pub fn format_config(config: &Config) -> Vec<String> {
    vec![
        format!("autoGit: {}", config.auto_git),
        format!(
            "defaultBranch: {}",
            config.default_branch.as_deref().unwrap_or("(not set)")
        ),
    ]
}
