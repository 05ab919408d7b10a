use crate::error::{RemindzError, Result};
use crate::persistence::PersistenceOptions;
use crate::store::REMINDERS_CACHE_KEY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Tool configuration, stored in `<data_dir>/config.json`.
///
/// This is about how remindz stores things, not about reminder behavior; the
/// reminder settings live in the durable blob and are managed by the
/// persistence coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemindzConfig {
    /// Fast-tier key of the reminder cache
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// Also keep reminder rows in the durable blob, for hosts that lose their cache
    #[serde(default)]
    pub mirror_reminders_to_durable: bool,
}

fn default_cache_key() -> String {
    REMINDERS_CACHE_KEY.to_string()
}

impl Default for RemindzConfig {
    fn default() -> Self {
        Self {
            cache_key: default_cache_key(),
            mirror_reminders_to_durable: false,
        }
    }
}

impl RemindzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(RemindzError::Io)?;
        let config: RemindzConfig =
            serde_json::from_str(&content).map_err(RemindzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(RemindzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(RemindzError::Serialization)?;
        fs::write(config_path, content).map_err(RemindzError::Io)?;
        Ok(())
    }

    pub fn persistence_options(&self) -> PersistenceOptions {
        PersistenceOptions {
            cache_key: self.cache_key.clone(),
            mirror_to_durable: self.mirror_reminders_to_durable,
        }
    }
}
