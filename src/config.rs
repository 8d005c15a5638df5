// Session configuration
// Loaded from an optional JSON file; every field falls back to the demo defaults.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ChatError, Result};
use crate::models::default_contacts;

const CONFIG_DIR_NAME: &str = "chatverse";
const CONFIG_FILE_NAME: &str = "config.json";

/// Canned replies the simulated counterpart picks from
pub const DEFAULT_REPLIES: [&str; 6] = [
    "That's interesting! Tell me more.",
    "I totally agree with you on that.",
    "Haha, that's funny! 😄",
    "Thanks for sharing that with me.",
    "What do you think about this?",
    "That sounds like a great idea!",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Author label on messages written by the local user
    pub self_label: String,
    pub initial_contact: String,
    /// Lower bound of the reply delay
    pub reply_delay_min_ms: u64,
    /// Width of the reply delay window; the delay is uniform in `[min, min + jitter)`
    pub reply_delay_jitter_ms: u64,
    pub replies: Vec<String>,
    /// Fixed seed for reply randomness. `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub reply_channel_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            self_label: "You".to_string(),
            initial_contact: "alice".to_string(),
            reply_delay_min_ms: 1000,
            reply_delay_jitter_ms: 2000,
            replies: DEFAULT_REPLIES.iter().map(|r| r.to_string()).collect(),
            seed: None,
            reply_channel_capacity: 100,
        }
    }
}

impl ChatConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Longest delay a reply can take
    pub fn max_reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_min_ms.saturating_add(self.reply_delay_jitter_ms))
    }

    pub fn validate(&self) -> Result<()> {
        if self.replies.is_empty() {
            return Err(ChatError::InvalidConfig("reply set must not be empty".to_string()));
        }
        if self.reply_channel_capacity == 0 {
            return Err(ChatError::InvalidConfig(
                "reply_channel_capacity must be at least 1".to_string(),
            ));
        }
        if !default_contacts().iter().any(|c| c.id == self.initial_contact) {
            return Err(ChatError::UnknownContact(self.initial_contact.clone()));
        }
        Ok(())
    }

    /// Read and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ChatConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config from `path` if given, otherwise from the user config
    /// directory. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                info!("No config file found, using defaults");
                Ok(ChatConfig::default())
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
