use crate::config::default_max_history;

use serde::{Deserialize, Serialize};

/// Upload history configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of uploads kept, newest first.
    #[serde(default = "default_max_history")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_history(),
        }
    }
}
