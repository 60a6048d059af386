use quickchat_common::{tracing, HistoryState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

/// Configuration manager for the quickchat daemon
pub struct ConfigManager {
    pub config_path: PathBuf,
    pub history_path: PathBuf,
    pub config: DaemonConfig,
}

/// Daemon configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    pub daemon: DaemonSettings,
    pub chat: ChatSettings,
    pub combo: ComboSettings,
    pub messages: MessageSettings,
    pub device: DeviceSettings,
}

/// Daemon-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonSettings {
    pub log_level: String,
}

/// How chat messages are delivered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Which channel to send to ("lobby", "team" or "party")
    pub mode: String,
    /// Channel name -> keyboard key that opens that chat in-game
    pub keys: HashMap<String, char>,
    /// Minimum spacing between sends, in seconds
    pub spam_interval_s: f64,
    /// Delay between typed characters, in milliseconds
    pub typing_delay_ms: u64,
    /// Log messages instead of typing them
    pub dry_run: bool,
}

/// Combo detection timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboSettings {
    /// Max seconds between the first and second D-pad press
    pub window_s: f64,
    /// Minimum seconds between presses (filters button bounce)
    pub min_gap_s: f64,
}

/// Message repetition control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSettings {
    /// Seconds before an identical message may repeat
    pub cooldown_s: f64,
    /// Maximum number of recent messages to track
    pub max_entries: usize,
    /// Force ASCII-only output
    pub ascii_only: bool,
}

/// Controller discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Accept only gamepads whose name contains one of these patterns;
    /// empty accepts any gamepad.
    pub name_patterns: Vec<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            daemon: DaemonSettings {
                log_level: "info".to_string(),
            },
            chat: ChatSettings {
                mode: "lobby".to_string(),
                keys: HashMap::from([
                    ("lobby".to_string(), 't'),
                    ("team".to_string(), 'y'),
                    ("party".to_string(), 'u'),
                ]),
                spam_interval_s: 0.2,
                typing_delay_ms: 1,
                dry_run: false,
            },
            combo: ComboSettings {
                window_s: 1.1,
                min_gap_s: 0.05,
            },
            messages: MessageSettings {
                cooldown_s: 600.0,
                max_entries: 200,
                ascii_only: false,
            },
            device: DeviceSettings {
                name_patterns: Vec::new(),
            },
        }
    }
}

impl ConfigManager {
    /// Create a configuration manager with the default system paths
    pub fn new() -> Self {
        Self::with_paths(
            PathBuf::from("/etc/quickchatd/config.yaml"),
            PathBuf::from("/var/cache/quickchatd/history.json"),
        )
    }

    pub fn with_paths(config_path: PathBuf, history_path: PathBuf) -> Self {
        Self {
            config_path,
            history_path,
            config: DaemonConfig::default(),
        }
    }

    /// Load configuration from disk, writing defaults when no file exists
    pub async fn load_config(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Loading configuration from {}", self.config_path.display());

        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path).await?;
            self.config = serde_yaml::from_str(&content)?;
            debug!("Loaded configuration from disk");
        } else {
            warn!("Configuration file not found, using defaults");
            self.save_config().await?;
        }

        Ok(())
    }

    /// Save configuration to disk
    pub async fn save_config(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Saving configuration to {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_yaml::to_string(&self.config)?;
        fs::write(&self.config_path, content).await?;

        debug!("Configuration saved");
        Ok(())
    }

    /// Load the cross-session message history.
    ///
    /// A missing file means "no prior state". A file that fails to parse is
    /// reported and treated the same way; individually malformed entries are
    /// skipped by the lenient decoder.
    pub async fn load_history(&self) -> HistoryState {
        if !self.history_path.exists() {
            debug!("No history file at {}", self.history_path.display());
            return HistoryState::default();
        }

        let content = match fs::read_to_string(&self.history_path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read history from {}: {}", self.history_path.display(), e);
                return HistoryState::default();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => HistoryState::from_json_value(&value),
            Err(e) => {
                warn!("Failed to parse history from {}: {}", self.history_path.display(), e);
                HistoryState::default()
            }
        }
    }

    /// Save the cross-session message history, creating the directory if
    /// absent. Failures are the caller's to log; they are never fatal.
    pub async fn save_history(&self, history: &HistoryState) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.history_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string(history)?;
        fs::write(&self.history_path, content).await?;

        debug!("Saved history to {}", self.history_path.display());
        Ok(())
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_paths(
            temp_dir.path().join("config.yaml"),
            temp_dir.path().join("cache").join("history.json"),
        )
    }

    #[tokio::test]
    async fn test_defaults_written_and_reloaded() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = manager_in(&temp_dir);

        // First load writes the defaults
        manager.load_config().await.unwrap();
        assert!(manager.config_path.exists());

        let mut manager2 = manager_in(&temp_dir);
        manager2.load_config().await.unwrap();

        assert_eq!(manager2.config.combo.window_s, 1.1);
        assert_eq!(manager2.config.messages.cooldown_s, 600.0);
        assert_eq!(manager2.config.chat.keys.get("lobby"), Some(&'t'));
        assert_eq!(manager2.config.chat.keys.len(), 3);
    }

    #[tokio::test]
    async fn test_history_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);

        let history = HistoryState {
            last_sent_message: "Ahoy, boost pirates!".to_string(),
            recent_messages: vec![("Ahoy, boost pirates!".to_string(), 1700000000.0)],
        };

        // Parent directory does not exist yet; save must create it
        manager.save_history(&history).await.unwrap();
        let restored = manager.load_history().await;

        assert_eq!(restored.last_sent_message, history.last_sent_message);
        assert_eq!(restored.recent_messages, history.recent_messages);
    }

    #[tokio::test]
    async fn test_missing_history_is_empty_state() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);

        let history = manager.load_history().await;
        assert!(history.last_sent_message.is_empty());
        assert!(history.recent_messages.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_history_recovers_empty() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);

        fs::create_dir_all(manager.history_path.parent().unwrap())
            .await
            .unwrap();
        fs::write(&manager.history_path, "{ not json").await.unwrap();

        let history = manager.load_history().await;
        assert!(history.last_sent_message.is_empty());
        assert!(history.recent_messages.is_empty());
    }
}
