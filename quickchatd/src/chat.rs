use quickchat_common::{tracing, SendError};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::mem;
use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::{Arc, RwLock};
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

// Linux input event constants
const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const SYN_REPORT: u16 = 0x00;

// Key codes
const KEY_ENTER: u16 = 28;
const KEY_LEFTSHIFT: u16 = 42;

// uinput ioctl constants
const UI_SET_EVBIT: u64 = 0x40045564; // _IOW('U', 100, int)
const UI_SET_KEYBIT: u64 = 0x40045565; // _IOW('U', 101, int)
const UI_DEV_CREATE: u64 = 0x5501; // _IO('U', 1)
const UI_DEV_DESTROY: u64 = 0x5502; // _IO('U', 2)

/// Linux input_event structure
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct InputEvent {
    time: libc::timeval,
    type_: u16,
    code: u16,
    value: i32,
}

/// uinput_user_dev structure for device setup
#[repr(C)]
struct UinputUserDev {
    name: [u8; 80],
    id: InputId,
    ff_effects_max: u32,
    absmax: [i32; 64],
    absmin: [i32; 64],
    absfuzz: [i32; 64],
    absflat: [i32; 64],
}

#[repr(C)]
struct InputId {
    bustype: u16,
    vendor: u16,
    product: u16,
    version: u16,
}

/// Destination for finished chat messages.
///
/// `chat_key` is the keyboard key that opens the configured chat channel
/// in-game ('t', 'y' or 'u' by default).
#[async_trait::async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_line(&self, chat_key: char, message: &str) -> Result<(), SendError>;
}

/// Sink that logs messages instead of typing them
pub struct DryRunSink;

#[async_trait::async_trait]
impl ChatSink for DryRunSink {
    async fn send_line(&self, chat_key: char, message: &str) -> Result<(), SendError> {
        info!("[dry-run] ({}) {}", chat_key, message);
        Ok(())
    }
}

/// Key lookup entry: key code plus whether shift is held
type KeyStroke = (u16, bool);

/// Chat sink that types messages through a uinput virtual keyboard.
///
/// `send_line` opens chat with the channel key, types the message, and
/// presses Enter, mirroring how a player would send the message by hand.
pub struct UinputChatSink {
    initialized: Arc<RwLock<bool>>,
    uinput_fd: Arc<RwLock<Option<RawFd>>>,
    key_map: HashMap<char, KeyStroke>,
    typing_delay: Duration,
}

impl UinputChatSink {
    /// Create a new sink instance. The virtual device is created lazily on
    /// first use or explicitly via `initialize`.
    pub fn new(typing_delay: Duration) -> Self {
        Self {
            initialized: Arc::new(RwLock::new(false)),
            uinput_fd: Arc::new(RwLock::new(None)),
            key_map: build_key_map(),
            typing_delay,
        }
    }

    /// Create the uinput virtual keyboard
    pub async fn initialize(&self) -> Result<(), SendError> {
        {
            let initialized = self.initialized.read().unwrap();
            if *initialized {
                return Ok(());
            }
        }

        info!("Initializing uinput virtual keyboard");

        let uinput_file = OpenOptions::new()
            .write(true)
            .open("/dev/uinput")
            .map_err(|e| {
                error!("Failed to open /dev/uinput: {}. Ensure you have root privileges and the uinput module is loaded.", e);
                SendError::Delivery(format!("failed to open /dev/uinput: {}", e))
            })?;

        let fd = uinput_file.as_raw_fd();

        // Leak the file to keep fd valid (we'll clean up in Drop)
        mem::forget(uinput_file);

        unsafe {
            if libc::ioctl(fd, UI_SET_EVBIT, EV_KEY as libc::c_int) < 0 {
                return Err(SendError::Delivery("failed to set EV_KEY bit".to_string()));
            }
            if libc::ioctl(fd, UI_SET_EVBIT, EV_SYN as libc::c_int) < 0 {
                return Err(SendError::Delivery("failed to set EV_SYN bit".to_string()));
            }

            // Enable all keyboard key codes
            for key in 0..256u16 {
                if libc::ioctl(fd, UI_SET_KEYBIT, key as libc::c_int) < 0 {
                    warn!("Failed to set keybit for key {}", key);
                }
            }
        }

        let mut dev: UinputUserDev = unsafe { mem::zeroed() };
        let name = b"Quickchat Virtual Keyboard";
        dev.name[..name.len()].copy_from_slice(name);
        dev.id.bustype = 0x03; // BUS_USB
        dev.id.vendor = 0x054C; // Sony vendor ID
        dev.id.product = 0xFFFF; // Virtual device
        dev.id.version = 1;

        unsafe {
            let dev_ptr = &dev as *const UinputUserDev as *const u8;
            let dev_slice = std::slice::from_raw_parts(dev_ptr, mem::size_of::<UinputUserDev>());

            if libc::write(fd, dev_slice.as_ptr() as *const libc::c_void, dev_slice.len()) < 0 {
                return Err(SendError::Delivery(
                    "failed to write uinput device structure".to_string(),
                ));
            }

            if libc::ioctl(fd, UI_DEV_CREATE) < 0 {
                return Err(SendError::Delivery("failed to create uinput device".to_string()));
            }
        }

        info!("Created uinput virtual keyboard: {}", String::from_utf8_lossy(name));

        {
            let mut uinput_fd = self.uinput_fd.write().unwrap();
            *uinput_fd = Some(fd);
        }
        {
            let mut initialized = self.initialized.write().unwrap();
            *initialized = true;
        }

        // Small delay to let the device settle
        sleep(Duration::from_millis(100)).await;

        Ok(())
    }

    /// Write an input event to the uinput device
    fn write_event(&self, type_: u16, code: u16, value: i32) -> Result<(), SendError> {
        let fd = {
            let uinput_fd = self.uinput_fd.read().unwrap();
            uinput_fd.ok_or_else(|| SendError::Delivery("uinput device not initialized".to_string()))?
        };

        let mut event: InputEvent = unsafe { mem::zeroed() };

        unsafe {
            libc::gettimeofday(&mut event.time, std::ptr::null_mut());
        }

        event.type_ = type_;
        event.code = code;
        event.value = value;

        unsafe {
            let event_ptr = &event as *const InputEvent as *const u8;
            let event_slice = std::slice::from_raw_parts(event_ptr, mem::size_of::<InputEvent>());

            let written = libc::write(fd, event_slice.as_ptr() as *const libc::c_void, event_slice.len());
            if written < 0 {
                return Err(SendError::Delivery(format!(
                    "failed to write event: {}",
                    std::io::Error::last_os_error()
                )));
            }
        }

        Ok(())
    }

    /// Send a synchronization event
    fn sync(&self) -> Result<(), SendError> {
        self.write_event(EV_SYN, SYN_REPORT, 0)
    }

    async fn key_press(&self, key_code: u16) -> Result<(), SendError> {
        self.write_event(EV_KEY, key_code, 1)?; // 1 = key down
        self.sync()
    }

    async fn key_release(&self, key_code: u16) -> Result<(), SendError> {
        self.write_event(EV_KEY, key_code, 0)?; // 0 = key up
        self.sync()
    }

    /// Tap a key: press, short hold, release
    async fn tap(&self, key_code: u16) -> Result<(), SendError> {
        self.key_press(key_code).await?;
        sleep(Duration::from_millis(20)).await;
        self.key_release(key_code).await?;
        Ok(())
    }

    /// Type a string character by character, holding shift where needed
    async fn type_string(&self, text: &str) -> Result<(), SendError> {
        for c in text.chars() {
            let stroke = self.key_map.get(&c).copied();

            if let Some((key_code, needs_shift)) = stroke {
                if needs_shift {
                    self.key_press(KEY_LEFTSHIFT).await?;
                    sleep(Duration::from_millis(10)).await;
                }

                self.tap(key_code).await?;

                if needs_shift {
                    sleep(Duration::from_millis(10)).await;
                    self.key_release(KEY_LEFTSHIFT).await?;
                }

                sleep(self.typing_delay).await;
            } else {
                warn!("No key mapping for character: '{}' (U+{:04X})", c, c as u32);
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ChatSink for UinputChatSink {
    async fn send_line(&self, chat_key: char, message: &str) -> Result<(), SendError> {
        if !*self.initialized.read().unwrap() {
            self.initialize().await?;
        }

        let (open_key, _) = self
            .key_map
            .get(&chat_key)
            .copied()
            .ok_or_else(|| SendError::Delivery(format!("no key mapping for chat key '{}'", chat_key)))?;

        debug!("Opening chat with '{}'", chat_key);
        self.tap(open_key).await?;
        // Give the chat box time to appear before typing into it
        sleep(Duration::from_millis(60)).await;

        self.type_string(message).await?;
        self.tap(KEY_ENTER).await?;

        Ok(())
    }
}

impl Drop for UinputChatSink {
    fn drop(&mut self) {
        if let Ok(initialized) = self.initialized.try_read() {
            if *initialized {
                if let Ok(uinput_fd) = self.uinput_fd.try_read() {
                    if let Some(fd) = *uinput_fd {
                        info!("Destroying uinput virtual keyboard");
                        unsafe {
                            libc::ioctl(fd, UI_DEV_DESTROY);
                            libc::close(fd);
                        }
                    }
                }
            }
        }
    }
}

/// Build the US QWERTY char -> (key code, shift) table covering everything
/// the message catalog uses.
fn build_key_map() -> HashMap<char, KeyStroke> {
    let mut map: HashMap<char, KeyStroke> = HashMap::new();

    // Digit row (KEY_1=2 .. KEY_0=11) and its shifted symbols
    let digits = "1234567890";
    let shifted_digits = "!@#$%^&*()";
    for (i, (d, s)) in digits.chars().zip(shifted_digits.chars()).enumerate() {
        map.insert(d, (2 + i as u16, false));
        map.insert(s, (2 + i as u16, true));
    }

    // Letter rows (KEY_Q=16, KEY_A=30, KEY_Z=44)
    for (row, base) in [("qwertyuiop", 16u16), ("asdfghjkl", 30), ("zxcvbnm", 44)] {
        for (i, c) in row.chars().enumerate() {
            map.insert(c, (base + i as u16, false));
            map.insert(c.to_ascii_uppercase(), (base + i as u16, true));
        }
    }

    // Punctuation, unshifted and shifted pairs
    let pairs: [(char, char, u16); 11] = [
        ('-', '_', 12),  // KEY_MINUS
        ('=', '+', 13),  // KEY_EQUAL
        ('[', '{', 26),  // KEY_LEFTBRACE
        (']', '}', 27),  // KEY_RIGHTBRACE
        ('\\', '|', 43), // KEY_BACKSLASH
        (';', ':', 39),  // KEY_SEMICOLON
        ('\'', '"', 40), // KEY_APOSTROPHE
        ('`', '~', 41),  // KEY_GRAVE
        (',', '<', 51),  // KEY_COMMA
        ('.', '>', 52),  // KEY_DOT
        ('/', '?', 53),  // KEY_SLASH
    ];
    for (plain, shifted, code) in pairs {
        map.insert(plain, (code, false));
        map.insert(shifted, (code, true));
    }

    map.insert(' ', (57, false)); // KEY_SPACE
    map.insert('\n', (KEY_ENTER, false));
    map.insert('\t', (15, false)); // KEY_TAB

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variations::builtin_variations;

    #[test]
    fn test_key_map_setup() {
        let map = build_key_map();

        assert_eq!(map.get(&'a'), Some(&(30, false)));
        assert_eq!(map.get(&'A'), Some(&(30, true)));
        assert_eq!(map.get(&' '), Some(&(57, false)));
        assert_eq!(map.get(&'1'), Some(&(2, false)));
        assert_eq!(map.get(&'!'), Some(&(2, true)));
        assert_eq!(map.get(&'?'), Some(&(53, true)));
        assert_eq!(map.get(&'\''), Some(&(40, false)));
    }

    #[test]
    fn test_key_map_covers_catalog() {
        let map = build_key_map();

        for (category, items) in builtin_variations() {
            for item in items {
                for c in item.chars() {
                    assert!(
                        map.contains_key(&c),
                        "no key mapping for '{}' used by category {}",
                        c,
                        category
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn test_sink_creation() {
        let sink = UinputChatSink::new(Duration::from_millis(1));
        assert!(!*sink.initialized.read().unwrap());
    }

    #[tokio::test]
    async fn test_dry_run_sink_never_fails() {
        let sink = DryRunSink;
        sink.send_line('t', "hello there").await.unwrap();
    }

    // Actual injection tests require root privileges and /dev/uinput access;
    // they belong in the e2e crate behind proper permissions.
}
