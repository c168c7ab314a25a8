use std::cmp::Ordering;

use crate::model::{Priority, Status, Todo};

/// Shortest id prefix accepted when resolving a todo by partial id.
pub const MIN_PREFIX_LEN: usize = 4;

/// New 128-bit random id as 32 lowercase hex characters.
pub fn generate_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Resolve a user-supplied token to a todo.
///
/// In order: a positive integer within range is a 1-based list position;
/// then an exact id; then the first id (in collection order) that starts
/// with the token, if the token is at least [`MIN_PREFIX_LEN`] long.
/// Returns the 0-based position alongside the todo.
pub fn find_by_id_or_index<'a>(todos: &'a [Todo], token: &str) -> Option<(usize, &'a Todo)> {
    if let Ok(n) = token.parse::<usize>()
        && (1..=todos.len()).contains(&n)
    {
        return Some((n - 1, &todos[n - 1]));
    }

    if let Some(found) = todos.iter().enumerate().find(|(_, t)| t.id == token) {
        return Some(found);
    }

    if token.len() >= MIN_PREFIX_LEN {
        return todos
            .iter()
            .enumerate()
            .find(|(_, t)| t.id.starts_with(token));
    }

    None
}

/// Number of ids that share `token` as a prefix. Callers use it to warn
/// when a partial id resolved to the first of several candidates.
pub fn prefix_matches(todos: &[Todo], token: &str) -> usize {
    if token.len() < MIN_PREFIX_LEN {
        return 0;
    }
    todos.iter().filter(|t| t.id.starts_with(token)).count()
}

/// Exact id lookup
pub fn find_by_id<'a>(todos: &'a [Todo], id: &str) -> Option<(usize, &'a Todo)> {
    todos.iter().enumerate().find(|(_, t)| t.id == id)
}

/// Collection with the element at `index` removed; out of range returns
/// the input unchanged.
pub fn delete_at(todos: &[Todo], index: usize) -> Vec<Todo> {
    todos
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, t)| t.clone())
        .collect()
}

pub fn filter_by_status(todos: &[Todo], status: Status) -> Vec<Todo> {
    todos.iter().filter(|t| t.status == status).cloned().collect()
}

/// Todos with any path starting with `prefix`. This is a literal string
/// prefix, so `src` matches `srcfoo/x.rs` as well as `src/x.rs`.
pub fn filter_by_path_prefix(todos: &[Todo], prefix: &str) -> Vec<Todo> {
    todos
        .iter()
        .filter(|t| has_path_prefix(t, prefix))
        .cloned()
        .collect()
}

fn has_path_prefix(todo: &Todo, prefix: &str) -> bool {
    todo.context.paths.iter().any(|p| p.starts_with(prefix))
}

pub fn filter_by_branch(todos: &[Todo], branch: &str) -> Vec<Todo> {
    todos
        .iter()
        .filter(|t| on_branch(t, branch))
        .cloned()
        .collect()
}

/// Captured on exactly `branch`
pub fn on_branch(todo: &Todo, branch: &str) -> bool {
    todo.context.branch.as_deref() == Some(branch)
}

pub fn filter_by_priority(todos: &[Todo], priority: Priority) -> Vec<Todo> {
    todos
        .iter()
        .filter(|t| t.priority == priority)
        .cloned()
        .collect()
}

/// Highest priority first, then oldest first.
pub fn priority_order(a: &Todo, b: &Todo) -> Ordering {
    b.priority
        .weight()
        .cmp(&a.priority.weight())
        .then(a.created_at.cmp(&b.created_at))
}

/// Stable sort by [`priority_order`].
pub fn sort_by_priority(todos: &mut [Todo]) {
    todos.sort_by(priority_order);
}

/// Split comma-joined entries, trim each piece, and drop empties.
pub fn normalize_paths<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Filters and ordering shared by the static list, the interactive session
/// and JSON output. Empty filter shows everything in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<Status>,
    pub path_prefix: Option<String>,
    pub priority: Option<Priority>,
    pub sort_by_priority: bool,
}

impl ListFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        self.status.is_none_or(|s| todo.status == s)
            && self.priority.is_none_or(|p| todo.priority == p)
            && self
                .path_prefix
                .as_deref()
                .is_none_or(|prefix| has_path_prefix(todo, prefix))
    }

    /// Positions in `todos` that pass the filter, in display order.
    pub fn visible_indices(&self, todos: &[Todo]) -> Vec<usize> {
        let mut indices: Vec<usize> = todos
            .iter()
            .enumerate()
            .filter(|(_, t)| self.matches(t))
            .map(|(i, _)| i)
            .collect();
        if self.sort_by_priority {
            indices.sort_by(|&a, &b| priority_order(&todos[a], &todos[b]));
        }
        indices
    }
}

pub fn count_by_status(todos: &[Todo], status: Status) -> usize {
    todos.iter().filter(|t| t.status == status).count()
}
