use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

// Re-export common dependencies
pub use serde;
pub use tokio;
pub use tracing;

/// Information about a connected input device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub path: PathBuf,
    pub vendor_id: u16,
    pub product_id: u16,
    pub phys: String,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (VID: {:04X}, PID: {:04X})",
               self.name, self.vendor_id, self.product_id)
    }
}

/// A single D-pad direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", name)
    }
}

/// A normalized input event as consumed by the macro engine.
///
/// The device layer filters out everything else (face buttons, sticks,
/// releases) before it reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// A D-pad direction press
    Direction(Direction),
    /// The macro on/off control (PS button)
    Toggle,
}

/// An ordered pair of directions resolved within the combo window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gesture {
    pub first: Direction,
    pub second: Direction,
}

impl Gesture {
    pub fn new(first: Direction, second: Direction) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}+{}", self.first, self.second)
    }
}

/// Errors produced while resolving a template into concrete text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unknown variation category \"{0}\"")]
    UnknownCategory(String),
    #[error("unknown text modifier \"{0}\"")]
    UnknownModifier(String),
}

/// Errors produced while delivering a finished message
#[derive(Debug, Error)]
pub enum SendError {
    #[error("unknown chat channel \"{0}\"")]
    UnknownChannel(String),
    #[error("chat delivery failed: {0}")]
    Delivery(String),
}

/// Cross-session message history, persisted as JSON.
///
/// `recent_messages` holds `[message, epoch-seconds]` pairs. The schema is
/// owned here; the file I/O lives in the daemon's config manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryState {
    #[serde(default)]
    pub last_sent_message: String,
    #[serde(default)]
    pub recent_messages: Vec<(String, f64)>,
}

impl HistoryState {
    /// Decode a history record leniently: malformed fields and entries are
    /// skipped individually instead of failing the whole load.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut state = Self::default();

        if let Some(last) = value.get("last_sent_message").and_then(|v| v.as_str()) {
            state.last_sent_message = last.to_string();
        }

        if let Some(entries) = value.get("recent_messages").and_then(|v| v.as_array()) {
            for item in entries {
                if let Some(pair) = item.as_array() {
                    if pair.len() == 2 {
                        if let (Some(message), Some(stamp)) = (pair[0].as_str(), pair[1].as_f64()) {
                            state.recent_messages.push((message.to_string(), stamp));
                        }
                    }
                }
            }
        }

        state
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_display() {
        let gesture = Gesture::new(Direction::Up, Direction::Left);
        assert_eq!(gesture.to_string(), "up+left");
    }

    #[test]
    fn test_history_roundtrip() {
        let state = HistoryState {
            last_sent_message: "I got it! Trust the process!".to_string(),
            recent_messages: vec![("Nice one!".to_string(), 1700000000.5)],
        };

        let json = serde_json::to_string(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let restored = HistoryState::from_json_value(&value);

        assert_eq!(restored.last_sent_message, state.last_sent_message);
        assert_eq!(restored.recent_messages, state.recent_messages);
    }

    #[test]
    fn test_history_skips_malformed_entries() {
        let value: serde_json::Value = serde_json::from_str(
            r#"{
                "last_sent_message": "Defending!",
                "recent_messages": [
                    ["ok", 12.0],
                    ["missing timestamp"],
                    [42, 12.0],
                    "not a pair",
                    ["also ok", 13]
                ]
            }"#,
        )
        .unwrap();

        let state = HistoryState::from_json_value(&value);
        assert_eq!(state.last_sent_message, "Defending!");
        assert_eq!(
            state.recent_messages,
            vec![("ok".to_string(), 12.0), ("also ok".to_string(), 13.0)]
        );
    }

    #[test]
    fn test_history_missing_fields() {
        let value: serde_json::Value = serde_json::from_str("{}").unwrap();
        let state = HistoryState::from_json_value(&value);
        assert!(state.last_sent_message.is_empty());
        assert!(state.recent_messages.is_empty());
    }
}
