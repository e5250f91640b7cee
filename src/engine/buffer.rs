use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::engine::bindings::InputMap;
use crate::engine::input::{Input, InputState};
use crate::engine::time::Timestamp;

/// How long a press stays usable after it happened. Roughly nine frames at 60 Hz.
pub const BUFFER_WINDOW: Duration = Duration::from_millis(150);

/// Remembers when each bound input was last pressed so that a press made
/// slightly too early still counts once the game is ready for it.
///
/// Only the latest press per input is kept. A buffered press is consumed by
/// the first [`is_buffered`](Self::is_buffered) query that sees it, so one
/// press satisfies at most one query.
///
/// Presses are stamped per physical input, not per action. An input bound to
/// two actions therefore holds a single press: querying either action
/// consumes it for both.
///
/// All operations take `&mut self`; a host that shares the buffer across
/// threads must wrap it in one `Mutex` so the check-and-consume in
/// `is_buffered` stays atomic.
pub struct InputBuffer<A> {
    bindings: InputMap<A>,
    /// `None` means "never pressed" or "already consumed".
    pressed_at: HashMap<Input, Option<Timestamp>>,
}

impl<A: Copy + Eq + Hash> InputBuffer<A> {
    /// One "never" entry per input bound in `bindings`.
    pub fn new(bindings: InputMap<A>) -> Self {
        let pressed_at = bindings.all_inputs().map(|input| (input, None)).collect();
        Self {
            bindings,
            pressed_at,
        }
    }

    pub fn bindings(&self) -> &InputMap<A> {
        &self.bindings
    }

    /// Record a press edge of `input` at `at`, replacing any earlier one.
    /// Returns `false` for inputs no action is bound to.
    pub fn record_press(&mut self, input: Input, at: Timestamp) -> bool {
        match self.pressed_at.get_mut(&input) {
            Some(slot) => {
                *slot = Some(at);
                true
            }
            None => false,
        }
    }

    /// Polling variant: record every input pressed during this frame at `now`.
    pub fn record_frame(&mut self, state: &InputState, now: Timestamp) {
        for input in state.pressed_this_frame() {
            self.record_press(input, now);
        }
    }

    /// Whether any input bound to `action` was pressed within
    /// [`BUFFER_WINDOW`] before `now` (inclusive).
    ///
    /// Every matching input is consumed, so later queries return `false`
    /// until a new press is recorded. Unmapped actions are never buffered.
    pub fn is_buffered(&mut self, action: A, now: Timestamp) -> bool {
        let mut hit = false;
        for input in self.bindings.inputs(action) {
            let Some(slot) = self.pressed_at.get_mut(input) else {
                continue;
            };
            if let Some(at) = *slot {
                if now.saturating_since(at) <= BUFFER_WINDOW {
                    tracing::trace!(
                        ?input,
                        pressed_ms = at.as_millis(),
                        now_ms = now.as_millis(),
                        "buffered press consumed"
                    );
                    *slot = None;
                    hit = true;
                }
            }
        }
        hit
    }

    /// Forget any recorded press of `action`'s inputs.
    pub fn invalidate(&mut self, action: A) {
        for input in self.bindings.inputs(action) {
            if let Some(slot) = self.pressed_at.get_mut(input) {
                *slot = None;
            }
        }
    }

    /// Last unconsumed press of `input`, if any.
    pub fn last_pressed(&self, input: Input) -> Option<Timestamp> {
        self.pressed_at.get(&input).copied().flatten()
    }
}
