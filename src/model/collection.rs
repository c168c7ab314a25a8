use serde::{Deserialize, Serialize};

use super::todo::Todo;

pub const FILE_VERSION: u32 = 1;

/// On-disk envelope for `todos.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl TodoFile {
    pub fn new(todos: Vec<Todo>) -> Self {
        TodoFile {
            version: FILE_VERSION,
            todos,
        }
    }
}

fn default_version() -> u32 {
    FILE_VERSION
}
