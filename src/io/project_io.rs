use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::io::atomic::atomic_write;
use crate::model::{Config, TodoFile};

/// Name of the marker directory that makes a directory a project root
pub const MARKER_DIR: &str = ".todos";
pub const TODOS_FILE: &str = "todos.json";
pub const CONFIG_FILE: &str = "config.json";

/// Error type for project I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error(
        "no todo project found (searched from: {}). Run 'todo init' to create one",
        search_path.display()
    )]
    NotFound { search_path: PathBuf },
    #[error("todo project already initialized at: {}", path.display())]
    AlreadyInitialized { path: PathBuf },
    #[error("could not read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not parse todo {id} (entry {index}) in {}: {source}", path.display())]
    InvalidTodo {
        path: PathBuf,
        index: usize,
        id: String,
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk upward from `start` looking for a directory holding `.todos/`.
///
/// Relative starts are resolved against the working directory first; the
/// error reports the path as given.
pub fn locate(start: &Path) -> Result<PathBuf, ProjectError> {
    let mut current = std::path::absolute(start)?;
    loop {
        if current.join(MARKER_DIR).is_dir() {
            debug!(root = %current.display(), "located project");
            return Ok(current);
        }
        if !current.pop() {
            return Err(ProjectError::NotFound {
                search_path: start.to_path_buf(),
            });
        }
    }
}

/// Create `.todos/` with an empty collection and default config.
///
/// An existing marker is an error unless `force` is set, in which case both
/// files are overwritten and any existing todos are lost.
pub fn init_project(path: &Path, force: bool) -> Result<PathBuf, ProjectError> {
    let root = std::path::absolute(path)?;
    let marker = root.join(MARKER_DIR);
    if marker.exists() && !force {
        return Err(ProjectError::AlreadyInitialized { path: root });
    }

    fs::create_dir_all(&marker).map_err(|e| ProjectError::WriteError {
        path: marker.clone(),
        source: e,
    })?;
    write_json(&marker.join(TODOS_FILE), &TodoFile::new(Vec::new()))?;
    write_json(&marker.join(CONFIG_FILE), &Config::default())?;
    debug!(root = %root.display(), force, "initialized project");
    Ok(root)
}

/// Create the marker directory if missing; never touches existing files.
pub fn ensure_root(path: &Path) -> Result<PathBuf, ProjectError> {
    let root = std::path::absolute(path)?;
    let marker = root.join(MARKER_DIR);
    if !marker.is_dir() {
        fs::create_dir_all(&marker).map_err(|e| ProjectError::WriteError {
            path: marker.clone(),
            source: e,
        })?;
    }
    Ok(root)
}

/// Serialize with two-space indentation and replace `path` atomically.
pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ProjectError> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| ProjectError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    text.push('\n');
    atomic_write(path, text.as_bytes()).map_err(|e| ProjectError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_from_root_and_subdir() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), false).unwrap();

        let root = locate(tmp.path()).unwrap();
        assert_eq!(root, tmp.path());

        let sub = tmp.path().join("src/deep/er");
        fs::create_dir_all(&sub).unwrap();
        let root = locate(&sub).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_locate_nearest_marker_wins() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), false).unwrap();
        let nested = tmp.path().join("nested");
        fs::create_dir_all(nested.join(MARKER_DIR)).unwrap();

        assert_eq!(locate(&nested.join(MARKER_DIR)).unwrap(), nested);
    }

    #[test]
    fn test_locate_not_found_reports_start() {
        let tmp = TempDir::new().unwrap();
        let err = locate(tmp.path()).unwrap_err();
        match &err {
            ProjectError::NotFound { search_path } => assert_eq!(search_path, tmp.path()),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("todo init"));
    }

    #[test]
    fn test_marker_must_be_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MARKER_DIR), "not a dir").unwrap();
        assert!(matches!(
            locate(tmp.path()),
            Err(ProjectError::NotFound { .. })
        ));
    }

    #[test]
    fn test_init_creates_files() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), false).unwrap();

        let todos = fs::read_to_string(tmp.path().join(".todos/todos.json")).unwrap();
        insta::assert_snapshot!(todos.trim_end(), @r#"
        {
          "version": 1,
          "todos": []
        }
        "#);
        let config = fs::read_to_string(tmp.path().join(".todos/config.json")).unwrap();
        assert!(config.contains("\"autoGit\": true"));
    }

    #[test]
    fn test_init_twice_without_force_fails() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), false).unwrap();
        fs::write(tmp.path().join(".todos/todos.json"), "keep me").unwrap();

        let err = init_project(tmp.path(), false).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyInitialized { .. }));
        assert_eq!(
            fs::read_to_string(tmp.path().join(".todos/todos.json")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn test_init_force_overwrites() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), false).unwrap();
        fs::write(tmp.path().join(".todos/todos.json"), "old").unwrap();

        init_project(tmp.path(), true).unwrap();
        let todos = fs::read_to_string(tmp.path().join(".todos/todos.json")).unwrap();
        assert!(todos.contains("\"todos\": []"));
    }

    #[test]
    fn test_ensure_root_keeps_existing_files() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), false).unwrap();
        fs::write(tmp.path().join(".todos/todos.json"), "keep").unwrap();

        let root = ensure_root(tmp.path()).unwrap();
        assert_eq!(root, tmp.path());
        assert_eq!(
            fs::read_to_string(tmp.path().join(".todos/todos.json")).unwrap(),
            "keep"
        );
    }
}
