use std::fs;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use todos::io::project_io;
use todos::io::store::TodoStore;
use todos::model::{Priority, Status, Todo};

fn open_project() -> (TempDir, TodoStore) {
    let tmp = TempDir::new().unwrap();
    let root = project_io::init_project(tmp.path(), false).unwrap();
    (tmp, TodoStore::open(root))
}

fn sample() -> Vec<Todo> {
    let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let mut plain = Todo::new("a".repeat(32), "plain");
    plain.created_at = stamp;
    plain.updated_at = stamp;

    let mut rich = Todo::new("b".repeat(32), "rich\nmultiline ✓ unicode");
    rich.status = Status::TechDebt;
    rich.priority = Priority::High;
    rich.created_at = stamp;
    rich.updated_at = stamp;
    rich.context.paths = vec!["src/a.rs".into(), "docs/".into()];
    rich.context.branch = Some("feature/x".into());
    rich.context.commit = Some("abc1234".into());
    rich.meta.ai_hint = Some("look at the retry loop".into());

    vec![plain, rich]
}

#[test]
fn save_then_load_is_identity() {
    let (_tmp, store) = open_project();
    let todos = sample();
    store.save(&todos).unwrap();
    assert_eq!(store.load().unwrap(), todos);
}

#[test]
fn saved_file_layout() {
    let (_tmp, store) = open_project();
    store.save(&sample()[..1]).unwrap();
    let text = fs::read_to_string(store.todos_path()).unwrap();
    insta::assert_snapshot!(text.trim_end(), @r#"
    {
      "version": 1,
      "todos": [
        {
          "id": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
          "text": "plain",
          "status": "open",
          "priority": "medium",
          "createdAt": "2024-03-01T09:30:00Z",
          "updatedAt": "2024-03-01T09:30:00Z",
          "context": {},
          "meta": {
            "source": "cli"
          }
        }
      ]
    }
    "#);
}

#[test]
fn legacy_array_loads_and_resaves_as_envelope() {
    let (_tmp, store) = open_project();
    let legacy = serde_json::to_string_pretty(&sample()).unwrap();
    fs::write(store.todos_path(), legacy).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, sample());

    store.save(&loaded).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.todos_path()).unwrap()).unwrap();
    assert_eq!(value["version"], 1);
    assert_eq!(value["todos"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_priority_defaults_to_medium() {
    let (_tmp, store) = open_project();
    fs::write(
        store.todos_path(),
        r#"{"version":1,"todos":[{"id":"x","text":"t","status":"waiting",
            "createdAt":"2024-03-01T09:30:00Z","updatedAt":"2024-03-01T09:30:00Z"}]}"#,
    )
    .unwrap();
    let todos = store.load().unwrap();
    assert_eq!(todos[0].priority, Priority::Medium);
    assert_eq!(todos[0].status, Status::Waiting);
    assert_eq!(todos[0].meta.source, "cli");
}
