use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rejected status or priority input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid status: {0}. Valid statuses: open, done, blocked, waiting, tech-debt")]
    InvalidStatus(String),
    #[error("invalid priority: {0}. Valid priorities: low, medium, high")]
    InvalidPriority(String),
}

/// Lifecycle state of a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Open,
    Done,
    Blocked,
    Waiting,
    TechDebt,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Open,
        Status::Done,
        Status::Blocked,
        Status::Waiting,
        Status::TechDebt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Done => "done",
            Status::Blocked => "blocked",
            Status::Waiting => "waiting",
            Status::TechDebt => "tech-debt",
        }
    }

    /// Single-glyph marker used by both list renderers
    pub fn icon(self) -> &'static str {
        match self {
            Status::Done => "✓",
            Status::Open => "○",
            Status::Blocked => "✗",
            Status::Waiting => "◔",
            Status::TechDebt => "⚠",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == lowered)
            .ok_or_else(|| ParseError::InvalidStatus(s.to_string()))
    }
}

/// Importance of a todo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Sort weight: higher sorts first
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseError::InvalidPriority(s.to_string())),
        }
    }
}

/// Where a todo was written: files it concerns plus git position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoContext {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Provenance; carried through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoMeta {
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_hint: Option<String>,
}

impl Default for TodoMeta {
    fn default() -> Self {
        TodoMeta {
            source: "cli".to_string(),
            ai_hint: None,
        }
    }
}

/// A single tracked item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub context: TodoContext,
    #[serde(default)]
    pub meta: TodoMeta,
}

impl Todo {
    /// Fresh open, medium-priority todo stamped with the current time
    pub fn new(id: String, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Todo {
            id,
            text: text.into(),
            status: Status::Open,
            priority: Priority::Medium,
            created_at: now,
            updated_at: now,
            context: TodoContext::default(),
            meta: TodoMeta::default(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    /// Done becomes open; every other status becomes done.
    pub fn toggle(&mut self) {
        if self.is_done() {
            self.mark_open();
        } else {
            self.mark_done();
        }
    }

    pub fn mark_done(&mut self) {
        self.set_status(Status::Done);
    }

    pub fn mark_open(&mut self) {
        self.set_status(Status::Open);
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.touch();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.touch();
    }

    pub fn set_paths(&mut self, paths: Vec<String>) {
        self.context.paths = paths;
        self.touch();
    }

    pub fn set_git_context(&mut self, branch: Option<String>, commit: Option<String>) {
        self.context.branch = branch;
        self.context.commit = commit;
        self.touch();
    }

    /// First eight characters of the id, for display
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
