use quickchat_common::{tracing, Gesture, HistoryState, InputAction, RenderError, SendError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::cache::RecentMessageCache;
use crate::chat::ChatSink;
use crate::config::{ChatSettings, ComboSettings, MessageSettings};
use crate::gesture::GestureDetector;
use crate::picker::VariationPicker;
use crate::template;

/// How many renders are tried before a duplicate is sent anyway
const MAX_RENDER_ATTEMPTS: usize = 8;

/// Minimum spacing between accepted toggle presses, in seconds
const TOGGLE_DEBOUNCE_S: f64 = 0.25;

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by a single macro resolution. None of these should take
/// down the event loop; the caller decides whether to log or abort.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Send(#[from] SendError),
}

/// The macro engine: turns normalized controller actions into chat messages.
///
/// Owns the gesture detector, the variation picker and the recent-message
/// cache exclusively. All methods take `now` as fractional Unix seconds so
/// every timing rule is testable with a synthetic clock.
pub struct MacroEngine {
    picker: VariationPicker,
    detector: GestureDetector,
    recent: RecentMessageCache,
    sink: Arc<dyn ChatSink>,
    macros: HashMap<Gesture, String>,
    chat: ChatSettings,
    ascii_only: bool,
    enabled: bool,
    last_toggle_at: Option<f64>,
    last_sent: String,
}

impl MacroEngine {
    pub fn new(
        picker: VariationPicker,
        macros: HashMap<Gesture, String>,
        chat: ChatSettings,
        combo: &ComboSettings,
        messages: &MessageSettings,
        sink: Arc<dyn ChatSink>,
    ) -> Self {
        Self {
            picker,
            detector: GestureDetector::new(combo.window_s, combo.min_gap_s),
            recent: RecentMessageCache::new(messages.cooldown_s, messages.max_entries),
            sink,
            macros,
            chat,
            ascii_only: messages.ascii_only,
            enabled: true,
            last_toggle_at: None,
            last_sent: String::new(),
        }
    }

    /// Whether macros are currently active
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Restore cross-session state saved by a previous run
    pub fn restore_history(&mut self, history: &HistoryState) {
        self.last_sent = history.last_sent_message.clone();
        self.recent.restore(history);
    }

    /// Snapshot cross-session state for persistence at shutdown
    pub fn history(&self) -> HistoryState {
        HistoryState {
            last_sent_message: self.last_sent.clone(),
            recent_messages: self.recent.entries().to_vec(),
        }
    }

    /// Process one normalized input action
    pub async fn handle_action(&mut self, action: InputAction, now: f64) -> EngineResult<()> {
        let direction = match action {
            InputAction::Toggle => {
                self.toggle(now);
                return Ok(());
            }
            InputAction::Direction(direction) => direction,
        };

        if !self.enabled {
            return Ok(());
        }

        let gesture = match self.detector.on_direction(direction, now) {
            Some(gesture) => gesture,
            None => return Ok(()),
        };

        // An unmapped gesture is not an error
        let template = match self.macros.get(&gesture) {
            Some(template) => template.clone(),
            None => {
                debug!("No macro bound to gesture {}", gesture);
                return Ok(());
            }
        };

        debug!("Gesture {} -> {}", gesture, template);
        self.send_template(&template, now).await
    }

    /// Flip the enabled flag, debounced against rapid presses
    fn toggle(&mut self, now: f64) {
        if let Some(last) = self.last_toggle_at {
            if now - last < TOGGLE_DEBOUNCE_S {
                return;
            }
        }
        self.last_toggle_at = Some(now);
        self.enabled = !self.enabled;
        info!(
            "Quickchat macros toggled {}",
            if self.enabled { "on" } else { "off" }
        );
    }

    /// Render a template and send it, retrying a bounded number of times to
    /// avoid recently sent duplicates. If every attempt is a duplicate, one
    /// final render is sent unconditionally so a valid gesture always gets a
    /// response.
    async fn send_template(&mut self, template: &str, now: f64) -> EngineResult<()> {
        for _ in 0..MAX_RENDER_ATTEMPTS {
            let message = self.render_once(template)?;
            if message.is_empty() {
                return Ok(());
            }
            if message == self.last_sent || self.recent.seen_recently(&message, now) {
                continue;
            }
            return self.dispatch(message, now).await;
        }

        warn!("All {} render attempts were recent duplicates; sending anyway", MAX_RENDER_ATTEMPTS);
        let message = self.render_once(template)?;
        if message.is_empty() {
            return Ok(());
        }
        self.dispatch(message, now).await
    }

    fn render_once(&mut self, template: &str) -> Result<String, RenderError> {
        let picker = &mut self.picker;
        let message = template::render_template(template, |key| picker.pick(key))?;
        let message = message.trim().to_string();
        if self.ascii_only {
            Ok(template::normalize_ascii(&message))
        } else {
            Ok(message)
        }
    }

    async fn dispatch(&mut self, message: String, now: f64) -> EngineResult<()> {
        let chat_key = self
            .chat
            .keys
            .get(&self.chat.mode)
            .copied()
            .ok_or_else(|| SendError::UnknownChannel(self.chat.mode.clone()))?;

        self.sink.send_line(chat_key, &message).await?;
        info!("Sent quick chat: {}", message);

        self.last_sent = message.clone();
        self.recent.add(&message, now);

        // Pacing: never issue sends faster than the spam interval
        if self.chat.spam_interval_s > 0.0 {
            sleep(Duration::from_secs_f64(self.chat.spam_interval_s)).await;
        }

        Ok(())
    }
}
