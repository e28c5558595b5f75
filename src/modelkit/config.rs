use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "modelkit.json";
const DEFAULT_FULL_MESSAGE_FORMAT: &str = "%{attribute} %{message}";

/// Presentation settings for error messages, stored in `modelkit.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    /// Template for full messages. Supports `%{attribute}` and `%{message}`.
    #[serde(default = "default_full_message_format")]
    pub full_message_format: String,

    /// Message templates by error kind key (e.g. `"blank"`, `"too_short"`),
    /// overriding the built-in English text. Supports `%{count}` and
    /// `%{attribute}`.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

fn default_full_message_format() -> String {
    DEFAULT_FULL_MESSAGE_FORMAT.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            full_message_format: default_full_message_format(),
            messages: BTreeMap::new(),
        }
    }
}

impl ModelConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ModelError::Io)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(ModelError::Serialization)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ModelError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ModelError::Serialization)?;
        fs::write(config_path, content).map_err(ModelError::Io)?;
        Ok(())
    }

    /// Override the template for one error kind.
    pub fn with_message(mut self, kind: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(kind.into(), template.into());
        self
    }
}
