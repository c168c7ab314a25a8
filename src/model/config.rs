use serde::{Deserialize, Serialize};

/// Per-project settings from `.todos/config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Branch recorded on new todos when git detection is unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    /// Capture branch and commit on `add`
    #[serde(default = "default_true")]
    pub auto_git: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: 1,
            default_branch: None,
            auto_git: true,
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}
