use quickchat_common::{Direction, Gesture};
use tracing::debug;

/// Two-phase combo detector for D-pad input.
///
/// A gesture is two direction presses within the combo window. The single
/// pending slot is only re-evaluated when the next event arrives; an
/// abandoned first press is never expired by a timer.
pub struct GestureDetector {
    window_s: f64,
    min_gap_s: f64,
    pending: Option<(Direction, f64)>,
}

impl GestureDetector {
    pub fn new(window_s: f64, min_gap_s: f64) -> Self {
        Self {
            window_s,
            min_gap_s,
            pending: None,
        }
    }

    /// Feed one direction press. Returns a gesture when this press completes
    /// a combo, otherwise records or refreshes the pending press.
    pub fn on_direction(&mut self, direction: Direction, now: f64) -> Option<Gesture> {
        let (first, first_at) = match self.pending {
            None => {
                self.pending = Some((direction, now));
                return None;
            }
            Some(pending) => pending,
        };

        let elapsed = now - first_at;

        // Too slow: the stale press does not combo, this press opens a new one
        if elapsed > self.window_s {
            self.pending = Some((direction, now));
            return None;
        }

        // Too fast: button bounce, drop the event
        if elapsed < self.min_gap_s {
            debug!("ignoring {} after {:.3}s (below min gap)", direction, elapsed);
            return None;
        }

        self.pending = None;
        Some(Gesture::new(first, direction))
    }
}
