use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::io::project_io::{self, CONFIG_FILE, MARKER_DIR, ProjectError, TODOS_FILE};
use crate::model::{Config, Todo, TodoFile};

/// Whole-file JSON persistence for one project root.
///
/// Every load reads the file fresh and every save rewrites it in full; there
/// is no caching and no locking between processes.
#[derive(Debug, Clone)]
pub struct TodoStore {
    root: PathBuf,
}

impl TodoStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        TodoStore { root: root.into() }
    }

    /// Project root (the directory that contains `.todos/`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn todos_path(&self) -> PathBuf {
        self.root.join(MARKER_DIR).join(TODOS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(MARKER_DIR).join(CONFIG_FILE)
    }

    /// Load all todos. A missing file is an empty collection; a bare JSON
    /// array (the pre-envelope layout) is still accepted.
    pub fn load(&self) -> Result<Vec<Todo>, ProjectError> {
        let path = self.todos_path();
        let Some(text) = read_optional(&path)? else {
            debug!(path = %path.display(), "no todos file, starting empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<TodoFile>(&text) {
            Ok(file) => {
                debug!(count = file.todos.len(), "loaded todos");
                Ok(file.todos)
            }
            Err(envelope_err) => match serde_json::from_str::<Vec<Todo>>(&text) {
                Ok(todos) => {
                    warn!(path = %path.display(), "loaded legacy array layout");
                    Ok(todos)
                }
                Err(_) => Err(locate_bad_todo(&path, &text).unwrap_or(ProjectError::Parse {
                    path,
                    source: envelope_err,
                })),
            },
        }
    }

    /// Write the full collection, replacing the file atomically.
    pub fn save(&self, todos: &[Todo]) -> Result<(), ProjectError> {
        project_io::ensure_root(&self.root)?;
        let path = self.todos_path();
        project_io::write_json(&path, &TodoFile::new(todos.to_vec()))?;
        debug!(count = todos.len(), path = %path.display(), "saved todos");
        Ok(())
    }

    /// Load the project config; a missing file yields the defaults.
    pub fn load_config(&self) -> Result<Config, ProjectError> {
        let path = self.config_path();
        match read_optional(&path)? {
            None => Ok(Config::default()),
            Some(text) => {
                serde_json::from_str(&text).map_err(|e| ProjectError::Parse { path, source: e })
            }
        }
    }

    pub fn save_config(&self, config: &Config) -> Result<(), ProjectError> {
        project_io::ensure_root(&self.root)?;
        project_io::write_json(&self.config_path(), config)
    }
}

/// Find the first entry that fails to deserialize so the error can name it.
/// Returns `None` when the file is not even well-formed JSON.
fn locate_bad_todo(path: &Path, text: &str) -> Option<ProjectError> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::Object(mut obj) => match obj.remove("todos")? {
            serde_json::Value::Array(entries) => entries,
            _ => return None,
        },
        _ => return None,
    };

    entries.into_iter().enumerate().find_map(|(index, entry)| {
        let id = entry
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("?")
            .to_string();
        serde_json::from_value::<Todo>(entry)
            .err()
            .map(|source| ProjectError::InvalidTodo {
                path: path.to_path_buf(),
                index,
                id,
                source,
            })
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, ProjectError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ProjectError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
