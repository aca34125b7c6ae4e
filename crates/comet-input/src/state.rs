//! The per-frame input context.
//!
//! [`InputState`] owns every device tracker plus the frame counter, the
//! host-supplied clock, and the window-focus flag. Conditions receive a
//! mutable reference to it at evaluation time; there is no global input
//! singleton anywhere in the crate.

use crate::gamepad::GamepadTracker;
use crate::keyboard::KeyboardTracker;
use crate::mouse::MouseTracker;
use crate::poll::InputPoller;
use crate::settings::InputSettings;
use crate::touch::TouchTracker;
use crate::voice::VoiceTracker;
use std::time::Duration;

/// All device trackers plus frame/clock bookkeeping.
///
/// Time is whatever monotonic "since start" duration the host game loop
/// supplies to [`advance`](Self::advance); the engine never reads a clock of
/// its own, which keeps evaluation fully deterministic under test.
#[derive(Debug)]
pub struct InputState {
    /// Keyboard key and lock state.
    pub keyboard: KeyboardTracker,
    /// Mouse button and sensor state.
    pub mouse: MouseTracker,
    /// Per-player gamepad state.
    pub gamepads: GamepadTracker,
    /// Recognized touch gestures.
    pub touch: TouchTracker,
    /// Recognized voice phrases.
    pub voice: VoiceTracker,
    /// Engine tunables.
    pub settings: InputSettings,
    frame: u64,
    now_ms: u64,
    window_active: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(InputSettings::default())
    }
}

impl InputState {
    /// Creates a fresh context at frame 0.
    #[must_use]
    pub fn new(settings: InputSettings) -> Self {
        Self {
            keyboard: KeyboardTracker::new(),
            mouse: MouseTracker::new(),
            gamepads: GamepadTracker::new(),
            touch: TouchTracker::new(),
            voice: VoiceTracker::new(),
            settings,
            frame: 0,
            now_ms: 0,
            window_active: true,
        }
    }

    /// The current frame number. Increments exactly once per
    /// [`advance`](Self::advance).
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Milliseconds since start, as supplied by the host loop.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Whether the host window had input focus at the last tick.
    #[must_use]
    pub fn window_active(&self) -> bool {
        self.window_active
    }

    /// Advances one tick: bumps the frame counter, adopts `now`, and
    /// refreshes every tracker from `poller` (previous ← current, current ←
    /// freshly polled). Call exactly once per game tick, strictly before any
    /// condition is evaluated.
    pub fn advance(&mut self, poller: &mut dyn InputPoller, now: Duration) {
        self.frame += 1;
        self.now_ms = now.as_millis() as u64;
        self.window_active = poller.window_active();

        self.keyboard.update(poller.keyboard());
        self.mouse.update(poller.mouse());
        let recheck_ms = self.settings.gamepad_recheck_ms();
        self.gamepads.update(poller, self.now_ms, recheck_ms);
        self.touch.update(poller.gestures());
        self.voice.update(poller.phrases());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::ManualPoller;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_advance_bumps_frame_and_time() {
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();
        assert_eq!(state.frame(), 0);

        state.advance(&mut poller, Duration::from_millis(16));
        assert_eq!(state.frame(), 1);
        assert_eq!(state.now_ms(), 16);

        state.advance(&mut poller, Duration::from_millis(33));
        assert_eq!(state.frame(), 2);
        assert_eq!(state.now_ms(), 33);
    }

    #[test]
    fn test_advance_refreshes_all_trackers() {
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.press_key(KeyCode::Space);
        poller.push_phrase("jump");
        state.advance(&mut poller, Duration::from_millis(16));

        assert!(state.keyboard.is_down(KeyCode::Space));
        assert!(!state.keyboard.was_down(KeyCode::Space));
        assert!(state.voice.recognized("jump"));

        state.advance(&mut poller, Duration::from_millis(33));
        assert!(state.keyboard.was_down(KeyCode::Space));
        // Phrases drain: gone on the next tick.
        assert!(!state.voice.recognized("jump"));
    }

    #[test]
    fn test_window_focus_tracked() {
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();
        poller.set_window_active(false);
        state.advance(&mut poller, Duration::from_millis(16));
        assert!(!state.window_active());
    }
}
