use evdev::{AbsoluteAxisType, Device as EvdevDevice, InputEventKind, Key};
use quickchat_common::{tracing, DeviceInfo, Direction, InputAction};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Translate a gamepad button press into a normalized action.
///
/// Only the D-pad and the PS/home button are interesting; everything else
/// is filtered out before it reaches the macro engine.
pub fn action_for_key(key: Key) -> Option<InputAction> {
    if key == Key::BTN_DPAD_UP {
        Some(InputAction::Direction(Direction::Up))
    } else if key == Key::BTN_DPAD_DOWN {
        Some(InputAction::Direction(Direction::Down))
    } else if key == Key::BTN_DPAD_LEFT {
        Some(InputAction::Direction(Direction::Left))
    } else if key == Key::BTN_DPAD_RIGHT {
        Some(InputAction::Direction(Direction::Right))
    } else if key == Key::BTN_MODE {
        Some(InputAction::Toggle)
    } else {
        None
    }
}

/// Translate a D-pad hat movement into a normalized action.
///
/// Some controllers expose the D-pad as an absolute hat instead of buttons:
/// ABS_HAT0X is -1 left / +1 right, ABS_HAT0Y is -1 up / +1 down, and 0 is
/// the return to center (ignored).
pub fn action_for_hat(axis: AbsoluteAxisType, value: i32) -> Option<InputAction> {
    let direction = if axis == AbsoluteAxisType::ABS_HAT0X {
        match value {
            -1 => Direction::Left,
            1 => Direction::Right,
            _ => return None,
        }
    } else if axis == AbsoluteAxisType::ABS_HAT0Y {
        match value {
            -1 => Direction::Up,
            1 => Direction::Down,
            _ => return None,
        }
    } else {
        return None;
    };

    Some(InputAction::Direction(direction))
}

/// Manages discovery and monitoring of game controllers
pub struct ControllerManager {
    devices: HashMap<String, DeviceInfo>,
    name_patterns: Vec<String>,
    event_sender: mpsc::Sender<InputAction>,
    event_receiver: Option<mpsc::Receiver<InputAction>>,
}

impl ControllerManager {
    /// Create a new controller manager. `name_patterns` optionally narrows
    /// discovery to controllers whose name contains one of the patterns
    /// (case-insensitive); an empty list accepts any gamepad.
    pub fn new(name_patterns: Vec<String>) -> Self {
        let (event_sender, event_receiver) = mpsc::channel(1000);
        Self {
            devices: HashMap::new(),
            name_patterns,
            event_sender,
            event_receiver: Some(event_receiver),
        }
    }

    /// Scan /dev/input for connected controllers
    pub fn start_discovery(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Starting controller discovery");

        for entry in fs::read_dir("/dev/input")? {
            let entry = entry?;
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or(false, |name| name.starts_with("event"));
            if !is_event_node {
                continue;
            }

            match self.probe_device(&path) {
                Ok(Some(device)) => {
                    info!("Found controller: {} at {}", device, device.path.display());
                    self.devices
                        .insert(device.path.to_string_lossy().to_string(), device);
                }
                Ok(None) => {}
                Err(e) => debug!("Skipping {}: {}", path.display(), e),
            }
        }

        info!("Discovered {} controller(s)", self.devices.len());
        Ok(())
    }

    /// Get all discovered controllers
    pub fn get_devices(&self) -> Vec<DeviceInfo> {
        self.devices.values().cloned().collect()
    }

    /// Get the receiver side of the normalized action channel
    pub fn get_event_receiver(&mut self) -> mpsc::Receiver<InputAction> {
        self.event_receiver.take().expect("Event receiver already taken")
    }

    /// Spawn a blocking reader task for every discovered controller
    pub fn start_readers(&self) {
        for path in self.devices.keys() {
            self.start_event_reader(path.clone());
        }
    }

    /// Open a device node and decide whether it is a controller we care about
    fn probe_device(&self, path: &Path) -> Result<Option<DeviceInfo>, Box<dyn std::error::Error>> {
        let device = EvdevDevice::open(path)
            .map_err(|e| format!("failed to open {}: {}", path.display(), e))?;

        let is_gamepad = device
            .supported_keys()
            .map_or(false, |keys| keys.contains(Key::BTN_SOUTH));
        if !is_gamepad {
            return Ok(None);
        }

        let name = device.name().unwrap_or("Unknown Device").to_string();

        if !self.name_patterns.is_empty() {
            let lowered = name.to_lowercase();
            let matched = self
                .name_patterns
                .iter()
                .any(|p| lowered.contains(&p.to_lowercase()));
            if !matched {
                debug!("Ignoring gamepad {} (no name pattern match)", name);
                return Ok(None);
            }
        }

        let input_id = device.input_id();
        let phys = device.physical_path().unwrap_or("unknown").to_string();

        Ok(Some(DeviceInfo {
            name,
            path: PathBuf::from(path),
            vendor_id: input_id.vendor(),
            product_id: input_id.product(),
            phys,
        }))
    }

    /// Start reading events from one controller.
    ///
    /// evdev I/O is synchronous, so each reader runs on the blocking pool
    /// and forwards normalized actions over the channel.
    fn start_event_reader(&self, path: String) {
        let sender = self.event_sender.clone();

        tokio::task::spawn_blocking(move || {
            info!("Starting event reader for {}", path);

            let mut device = match EvdevDevice::open(&path) {
                Ok(d) => d,
                Err(e) => {
                    error!("Failed to open device {} for event reading: {}", path, e);
                    return;
                }
            };

            loop {
                match device.fetch_events() {
                    Ok(events) => {
                        for event in events {
                            let action = match event.kind() {
                                // value 1 = press; releases and autorepeat are ignored
                                InputEventKind::Key(key) if event.value() == 1 => {
                                    action_for_key(key)
                                }
                                InputEventKind::AbsAxis(axis) => {
                                    action_for_hat(axis, event.value())
                                }
                                _ => None,
                            };

                            if let Some(action) = action {
                                debug!("Action from {}: {:?}", path, action);
                                if let Err(e) = sender.blocking_send(action) {
                                    warn!("Dropping event from {}: {}", path, e);
                                    return;
                                }
                            }
                        }
                    }
                    Err(e) => {
                        error!("Error reading events from {}: {}", path, e);
                        break;
                    }
                }
            }

            info!("Event reader stopped for {}", path);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dpad_buttons_translate() {
        assert_eq!(
            action_for_key(Key::BTN_DPAD_UP),
            Some(InputAction::Direction(Direction::Up))
        );
        assert_eq!(
            action_for_key(Key::BTN_DPAD_RIGHT),
            Some(InputAction::Direction(Direction::Right))
        );
        assert_eq!(action_for_key(Key::BTN_MODE), Some(InputAction::Toggle));
        // Face buttons are not macro input
        assert_eq!(action_for_key(Key::BTN_SOUTH), None);
    }

    #[test]
    fn test_hat_translates_with_inverted_y() {
        assert_eq!(
            action_for_hat(AbsoluteAxisType::ABS_HAT0Y, -1),
            Some(InputAction::Direction(Direction::Up))
        );
        assert_eq!(
            action_for_hat(AbsoluteAxisType::ABS_HAT0Y, 1),
            Some(InputAction::Direction(Direction::Down))
        );
        assert_eq!(
            action_for_hat(AbsoluteAxisType::ABS_HAT0X, -1),
            Some(InputAction::Direction(Direction::Left))
        );
        // Return to center is not an action
        assert_eq!(action_for_hat(AbsoluteAxisType::ABS_HAT0X, 0), None);
        // Sticks are not the D-pad
        assert_eq!(action_for_hat(AbsoluteAxisType::ABS_X, -1), None);
    }

    #[tokio::test]
    async fn test_manager_creation() {
        let mut manager = ControllerManager::new(vec!["DualSense".to_string()]);
        assert!(manager.get_devices().is_empty());
        let _receiver = manager.get_event_receiver();
    }
}
