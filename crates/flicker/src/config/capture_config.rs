use serde::{Deserialize, Serialize};

/// Screen capture configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Monitor for fullscreen captures (None = primary monitor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_index: Option<usize>,
}
