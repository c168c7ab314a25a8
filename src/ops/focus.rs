use serde::Serialize;

use crate::model::{Status, Todo};
use crate::ops::todo_ops::on_branch;

/// What `todo focus` shows: the open todos worth looking at now, plus
/// counts of everything that is not open.
#[derive(Debug, Clone, Serialize)]
pub struct Focus {
    /// Branch the selection was narrowed to, if any
    pub branch: Option<String>,
    pub todos: Vec<FocusItem>,
    pub blocked: usize,
    pub waiting: usize,
    pub done: usize,
}

/// A selected todo with its 1-based position in the full collection, the
/// number `done` and `edit` accept.
#[derive(Debug, Clone, Serialize)]
pub struct FocusItem {
    pub index: usize,
    #[serde(flatten)]
    pub todo: Todo,
}

/// Select open todos. With a branch, todos captured on that branch come
/// first, followed by todos with no branch; todos from other branches are
/// left out. Without a branch every open todo is returned in order.
pub fn select(todos: &[Todo], branch: Option<&str>) -> Focus {
    let open = todos
        .iter()
        .enumerate()
        .filter(|(_, t)| t.status == Status::Open);

    let selected: Vec<(usize, &Todo)> = match branch {
        Some(b) => {
            let matching = open.clone().filter(|(_, t)| on_branch(t, b));
            let branchless = open.filter(|(_, t)| t.context.branch.is_none());
            matching.chain(branchless).collect()
        }
        None => open.collect(),
    };

    let count = |s: Status| todos.iter().filter(|t| t.status == s).count();
    Focus {
        branch: branch.map(String::from),
        todos: selected
            .into_iter()
            .map(|(i, t)| FocusItem {
                index: i + 1,
                todo: t.clone(),
            })
            .collect(),
        blocked: count(Status::Blocked),
        waiting: count(Status::Waiting),
        done: count(Status::Done),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: &str, status: Status, branch: Option<&str>) -> Todo {
        let mut t = Todo::new(id.to_string(), id);
        t.status = status;
        t.context.branch = branch.map(String::from);
        t
    }

    fn fixture() -> Vec<Todo> {
        vec![
            todo("loose", Status::Open, None),
            todo("other", Status::Open, Some("feature")),
            todo("mine", Status::Open, Some("main")),
            todo("stuck", Status::Blocked, Some("main")),
            todo("finished", Status::Done, None),
            todo("later", Status::Waiting, None),
        ]
    }

    fn ids(focus: &Focus) -> Vec<&str> {
        focus.todos.iter().map(|item| item.todo.id.as_str()).collect()
    }

    #[test]
    fn test_branch_matches_first_then_branchless() {
        let focus = select(&fixture(), Some("main"));
        assert_eq!(ids(&focus), vec!["mine", "loose"]);
        assert_eq!(focus.branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_without_branch_all_open() {
        let focus = select(&fixture(), None);
        assert_eq!(ids(&focus), vec!["loose", "other", "mine"]);
    }

    #[test]
    fn test_items_carry_collection_positions() {
        let focus = select(&fixture(), Some("main"));
        let indices: Vec<usize> = focus.todos.iter().map(|item| item.index).collect();
        assert_eq!(indices, vec![3, 1]);
    }

    #[test]
    fn test_closed_todo_ahead_shifts_positions() {
        let todos = vec![
            todo("closed", Status::Done, None),
            todo("first", Status::Open, None),
            todo("second", Status::Open, None),
        ];
        let focus = select(&todos, None);
        let indices: Vec<usize> = focus.todos.iter().map(|item| item.index).collect();
        assert_eq!(indices, vec![2, 3]);

        let (pos, resolved) =
            crate::ops::todo_ops::find_by_id_or_index(&todos, &indices[1].to_string()).unwrap();
        assert_eq!(pos, 2);
        assert_eq!(resolved.id, "second");
    }

    #[test]
    fn test_counts() {
        let focus = select(&fixture(), None);
        assert_eq!((focus.blocked, focus.waiting, focus.done), (1, 1, 1));
    }
}
