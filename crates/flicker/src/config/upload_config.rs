use crate::config::default_endpoint;

use flicker_core::Visibility;
use serde::{Deserialize, Serialize};

/// Upload service credentials and per-upload options.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Upload token. Empty disables capturing and hotkeys.
    #[serde(default)]
    pub token: String,
    /// Base URL of the upload service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Visibility of new uploads.
    #[serde(default)]
    pub visibility: Visibility,
    /// Optional password protecting new uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            endpoint: default_endpoint(),
            visibility: Visibility::default(),
            password: None,
        }
    }
}

impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("endpoint", &self.endpoint)
            .field("visibility", &self.visibility)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
