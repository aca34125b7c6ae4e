//! Device adapters implementing [`BooleanSource`] for every button-like axis.
//!
//! Each adapter binds one tracker axis (a key, a mouse button, a pad button,
//! a gesture kind, a phrase) to the current/previous predicate shape that
//! [`BooleanCondition`](crate::boolean::BooleanCondition) gates on.

use crate::boolean::BooleanSource;
use crate::condition::{FireDetails, Source};
use crate::error::InputError;
use crate::gamepad::{GamepadButton, GamepadSensor, InputMode};
use crate::keyboard::LockKey;
use crate::mouse::{MouseButton, MouseSensor};
use crate::state::InputState;
use crate::touch::GestureKind;
use crate::value::Rect;
use winit::keyboard::KeyCode;

/// Which edge or level of a button a condition observes.
///
/// The two-frame shape of each variant:
///
/// | phase          | current | previous |
/// |----------------|---------|----------|
/// | `Pressed`      | down    | down     |
/// | `PressStarted` | down    | up       |
/// | `Released`     | up      | up       |
/// | `ReleaseStarted` | up    | down     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPhase {
    /// Held for at least two consecutive frames.
    Pressed,
    /// Went down this frame.
    PressStarted,
    /// Up for at least two consecutive frames.
    Released,
    /// Went up this frame.
    ReleaseStarted,
}

impl ButtonPhase {
    /// The predicate over this frame's down-state.
    #[must_use]
    pub fn current_matches(self, down: bool) -> bool {
        match self {
            Self::Pressed | Self::PressStarted => down,
            Self::Released | Self::ReleaseStarted => !down,
        }
    }

    /// The predicate over last frame's down-state.
    #[must_use]
    pub fn previous_matches(self, down: bool) -> bool {
        match self {
            Self::Pressed | Self::ReleaseStarted => down,
            Self::PressStarted | Self::Released => !down,
        }
    }
}

// ── Keyboard ────────────────────────────────────────────────────────

/// A single keyboard key, observed through a [`ButtonPhase`].
#[derive(Debug, Clone, Copy)]
pub struct KeySource {
    key: KeyCode,
    phase: ButtonPhase,
}

impl KeySource {
    /// Binds `key` with the given phase.
    #[must_use]
    pub fn new(key: KeyCode, phase: ButtonPhase) -> Self {
        Self { key, phase }
    }
}

impl BooleanSource for KeySource {
    fn source(&self) -> Source {
        Source::Keyboard
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(self.phase.current_matches(state.keyboard.is_down(self.key)))
    }

    fn previous(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(self
            .phase
            .previous_matches(state.keyboard.was_down(self.key)))
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        state.keyboard.consume_key(self.key, frame);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        state.keyboard.is_key_consumed(self.key, state.frame())
    }

    fn details(&self, _state: &InputState) -> FireDetails {
        FireDetails::Key { key: self.key }
    }
}

/// A keyboard lock state (caps/num lock) compared against a target state.
#[derive(Debug, Clone, Copy)]
pub struct LockSource {
    lock: LockKey,
    enabled: bool,
}

impl LockSource {
    /// Matches while `lock` reads as `enabled`.
    #[must_use]
    pub fn new(lock: LockKey, enabled: bool) -> Self {
        Self { lock, enabled }
    }
}

impl BooleanSource for LockSource {
    fn source(&self) -> Source {
        Source::Keyboard
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(state.keyboard.lock_enabled(self.lock) == self.enabled)
    }

    fn previous(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(state.keyboard.lock_was_enabled(self.lock) == self.enabled)
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        state.keyboard.consume_lock(self.lock, frame);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        state.keyboard.is_lock_consumed(self.lock, state.frame())
    }

    fn details(&self, _state: &InputState) -> FireDetails {
        FireDetails::Lock {
            lock: self.lock,
            enabled: self.enabled,
        }
    }
}

// ── Mouse ───────────────────────────────────────────────────────────

/// A mouse button, optionally restricted to fire only while the pointer is
/// inside a window-space region.
#[derive(Debug, Clone, Copy)]
pub struct MouseButtonSource {
    button: MouseButton,
    phase: ButtonPhase,
    bounds: Option<Rect>,
}

impl MouseButtonSource {
    /// Binds `button` with the given phase, anywhere in the window.
    #[must_use]
    pub fn new(button: MouseButton, phase: ButtonPhase) -> Self {
        Self {
            button,
            phase,
            bounds: None,
        }
    }

    /// Restricts firing to frames where the pointer lies inside `bounds`.
    #[must_use]
    pub fn within(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl BooleanSource for MouseButtonSource {
    fn source(&self) -> Source {
        Source::Mouse
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(self.phase.current_matches(state.mouse.is_down(self.button)))
    }

    fn previous(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(self
            .phase
            .previous_matches(state.mouse.was_down(self.button)))
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        state.mouse.consume_button(self.button, frame);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        state.mouse.is_button_consumed(self.button, state.frame())
    }

    fn in_bounds(&self, state: &InputState) -> bool {
        self.bounds
            .as_ref()
            .is_none_or(|rect| state.mouse.cursor_in(rect))
    }

    fn details(&self, state: &InputState) -> FireDetails {
        FireDetails::MouseButton {
            button: self.button,
            position: state.mouse.position(),
        }
    }
}

/// A mouse sensor's moved/stationary flag.
///
/// Moved-ness only exists as a difference between two snapshots, so `current`
/// and `previous` report the same flag; pair this with `min_hold_ms` to
/// require sustained motion or stillness.
#[derive(Debug, Clone, Copy)]
pub struct MouseMotionSource {
    sensor: MouseSensor,
    moving: bool,
}

impl MouseMotionSource {
    /// Matches while `sensor` is moving (`moving: true`) or still.
    #[must_use]
    pub fn new(sensor: MouseSensor, moving: bool) -> Self {
        Self { sensor, moving }
    }
}

impl BooleanSource for MouseMotionSource {
    fn source(&self) -> Source {
        Source::Mouse
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(state.mouse.moved(self.sensor) == self.moving)
    }

    fn previous(&self, state: &InputState) -> Result<bool, InputError> {
        self.current(state)
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        state.mouse.consume_sensor(self.sensor, frame);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        state.mouse.is_sensor_consumed(self.sensor, state.frame())
    }

    fn details(&self, state: &InputState) -> FireDetails {
        FireDetails::MouseSensor {
            sensor: self.sensor,
            value: state.mouse.sensor_value(self.sensor),
            delta: state.mouse.sensor_delta(self.sensor),
        }
    }
}

// ── Gamepad ─────────────────────────────────────────────────────────

/// A gamepad button, targeting one pad or lifted across all connected pads.
///
/// With [`InputMode::Any`] the predicate holds when any connected pad
/// satisfies it; with [`InputMode::All`] every connected pad must (and at
/// least one must be connected). Consumption in the lifted modes claims the
/// button on every connected pad.
#[derive(Debug, Clone, Copy)]
pub struct PadButtonSource {
    button: GamepadButton,
    phase: ButtonPhase,
    mode: InputMode,
    player: usize,
}

impl PadButtonSource {
    /// Binds `button` on one specific pad.
    ///
    /// # Errors
    /// [`InputError::PlayerIndexOutOfRange`] when `player` exceeds the highest
    /// connected index at construction time. Evaluation revalidates each
    /// frame, so a later disconnect surfaces there too.
    pub fn single(
        button: GamepadButton,
        phase: ButtonPhase,
        player: usize,
        state: &InputState,
    ) -> Result<Self, InputError> {
        state.gamepads.validate_player(player)?;
        Ok(Self {
            button,
            phase,
            mode: InputMode::Single,
            player,
        })
    }

    /// Binds `button` across connected pads, satisfied by any one of them.
    #[must_use]
    pub fn any(button: GamepadButton, phase: ButtonPhase) -> Self {
        Self {
            button,
            phase,
            mode: InputMode::Any,
            player: 0,
        }
    }

    /// Binds `button` across connected pads, requiring all of them.
    #[must_use]
    pub fn all(button: GamepadButton, phase: ButtonPhase) -> Self {
        Self {
            button,
            phase,
            mode: InputMode::All,
            player: 0,
        }
    }

    fn lifted(
        &self,
        state: &InputState,
        read: impl Fn(usize) -> Result<bool, InputError>,
        matches: impl Fn(bool) -> bool,
    ) -> Result<bool, InputError> {
        match self.mode {
            InputMode::Single => Ok(matches(read(self.player)?)),
            InputMode::Any => {
                for player in state.gamepads.connected_players() {
                    if matches(read(player)?) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            InputMode::All => {
                let mut seen = false;
                for player in state.gamepads.connected_players() {
                    seen = true;
                    if !matches(read(player)?) {
                        return Ok(false);
                    }
                }
                Ok(seen)
            }
        }
    }
}

impl BooleanSource for PadButtonSource {
    fn source(&self) -> Source {
        Source::Gamepad
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        self.lifted(
            state,
            |player| state.gamepads.is_button_down(player, self.button),
            |down| self.phase.current_matches(down),
        )
    }

    fn previous(&self, state: &InputState) -> Result<bool, InputError> {
        self.lifted(
            state,
            |player| state.gamepads.was_button_down(player, self.button),
            |down| self.phase.previous_matches(down),
        )
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        match self.mode {
            InputMode::Single => state.gamepads.consume_button(self.player, self.button, frame),
            InputMode::Any | InputMode::All => {
                let players: Vec<usize> = state.gamepads.connected_players().collect();
                for player in players {
                    state.gamepads.consume_button(player, self.button, frame);
                }
            }
        }
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        let frame = state.frame();
        match self.mode {
            InputMode::Single => state
                .gamepads
                .is_button_consumed(self.player, self.button, frame),
            InputMode::Any => state
                .gamepads
                .connected_players()
                .any(|p| state.gamepads.is_button_consumed(p, self.button, frame)),
            InputMode::All => {
                let mut seen = false;
                for player in state.gamepads.connected_players() {
                    seen = true;
                    if !state.gamepads.is_button_consumed(player, self.button, frame) {
                        return false;
                    }
                }
                seen
            }
        }
    }

    fn details(&self, _state: &InputState) -> FireDetails {
        FireDetails::PadButton {
            button: self.button,
            player: match self.mode {
                InputMode::Single => Some(self.player),
                InputMode::Any | InputMode::All => None,
            },
        }
    }
}

/// A gamepad sensor's moved/stationary flag on one specific pad.
///
/// Like [`MouseMotionSource`], `current` and `previous` report the same flag.
#[derive(Debug, Clone, Copy)]
pub struct PadMotionSource {
    sensor: GamepadSensor,
    player: usize,
    moving: bool,
}

impl PadMotionSource {
    /// Binds `sensor` on `player`.
    ///
    /// # Errors
    /// [`InputError::PlayerIndexOutOfRange`] for an out-of-range `player`.
    pub fn new(
        sensor: GamepadSensor,
        player: usize,
        moving: bool,
        state: &InputState,
    ) -> Result<Self, InputError> {
        state.gamepads.validate_player(player)?;
        Ok(Self {
            sensor,
            player,
            moving,
        })
    }
}

impl BooleanSource for PadMotionSource {
    fn source(&self) -> Source {
        Source::Gamepad
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(state.gamepads.sensor_moved(self.player, self.sensor)? == self.moving)
    }

    fn previous(&self, state: &InputState) -> Result<bool, InputError> {
        self.current(state)
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        state.gamepads.consume_sensor(self.player, self.sensor, frame);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        state
            .gamepads
            .is_sensor_consumed(self.player, self.sensor, state.frame())
    }

    fn details(&self, state: &InputState) -> FireDetails {
        use crate::value::Value;
        let value = if self.sensor.is_stick() {
            state
                .gamepads
                .stick_position(
                    self.sensor,
                    Some(self.player),
                    crate::gamepad::SensorValueMode::First,
                )
                .map(Value::Vector2)
                .unwrap_or(Value::None)
        } else {
            state
                .gamepads
                .trigger_position(
                    self.sensor,
                    Some(self.player),
                    crate::gamepad::SensorValueMode::First,
                )
                .map(Value::Float)
                .unwrap_or(Value::None)
        };
        FireDetails::PadSensor {
            sensor: self.sensor,
            value,
        }
    }
}

// ── Touch ───────────────────────────────────────────────────────────

/// A touch gesture kind, optionally restricted to a window-space region.
///
/// Gestures are instantaneous events, so `previous` is always satisfied:
/// recognition fires on the frame the gesture arrives.
#[derive(Debug, Clone, Copy)]
pub struct GestureSource {
    kind: GestureKind,
    bounds: Option<Rect>,
}

impl GestureSource {
    /// Binds `kind`, anywhere in the window.
    #[must_use]
    pub fn new(kind: GestureKind) -> Self {
        Self { kind, bounds: None }
    }

    /// Restricts recognition to gestures inside `bounds`.
    #[must_use]
    pub fn within(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    fn lookup<'a>(&self, state: &'a InputState) -> Option<&'a crate::touch::Gesture> {
        match &self.bounds {
            Some(bounds) => state.touch.occurred_in(self.kind, bounds),
            None => state.touch.occurred(self.kind),
        }
    }
}

impl BooleanSource for GestureSource {
    fn source(&self) -> Source {
        Source::Touch
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(self.lookup(state).is_some())
    }

    fn previous(&self, _state: &InputState) -> Result<bool, InputError> {
        Ok(true)
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        state.touch.consume(self.kind, frame);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        state.touch.is_consumed(self.kind, state.frame())
    }

    fn details(&self, state: &InputState) -> FireDetails {
        match self.lookup(state) {
            Some(gesture) => FireDetails::Gesture { gesture: *gesture },
            None => FireDetails::None,
        }
    }
}

// ── Voice ───────────────────────────────────────────────────────────

/// A recognized voice phrase (exact match).
///
/// Like gestures, phrases are instantaneous: `previous` is always satisfied.
#[derive(Debug, Clone)]
pub struct PhraseSource {
    phrase: String,
}

impl PhraseSource {
    /// Binds `phrase`.
    #[must_use]
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
        }
    }
}

impl BooleanSource for PhraseSource {
    fn source(&self) -> Source {
        Source::Voice
    }

    fn current(&self, state: &InputState) -> Result<bool, InputError> {
        Ok(state.voice.recognized(&self.phrase))
    }

    fn previous(&self, _state: &InputState) -> Result<bool, InputError> {
        Ok(true)
    }

    fn consume(&self, state: &mut InputState) {
        let frame = state.frame();
        state.voice.consume(&self.phrase, frame);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        state.voice.is_consumed(&self.phrase, state.frame())
    }

    fn details(&self, _state: &InputState) -> FireDetails {
        FireDetails::Phrase {
            phrase: self.phrase.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::BooleanCondition;
    use crate::condition::{ConditionSettings, InputCondition};
    use crate::poll::ManualPoller;
    use crate::touch::Gesture;
    use glam::Vec2;
    use std::time::Duration;

    fn advance(state: &mut InputState, poller: &mut ManualPoller, ms: u64) {
        state.advance(poller, Duration::from_millis(ms));
    }

    #[test]
    fn test_button_phase_shapes() {
        assert!(ButtonPhase::Pressed.current_matches(true));
        assert!(ButtonPhase::Pressed.previous_matches(true));
        assert!(ButtonPhase::PressStarted.current_matches(true));
        assert!(ButtonPhase::PressStarted.previous_matches(false));
        assert!(ButtonPhase::Released.current_matches(false));
        assert!(ButtonPhase::Released.previous_matches(false));
        assert!(ButtonPhase::ReleaseStarted.current_matches(false));
        assert!(ButtonPhase::ReleaseStarted.previous_matches(true));
    }

    #[test]
    fn test_key_pressed_needs_two_frames() {
        let mut cond = BooleanCondition::new(
            KeySource::new(KeyCode::Space, ButtonPhase::Pressed),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.press_key(KeyCode::Space);
        advance(&mut state, &mut poller, 16);
        // Down this frame but not the last: no fire yet.
        assert!(!cond.evaluate(&mut state).unwrap());

        advance(&mut state, &mut poller, 33);
        assert!(cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_press_started_fires_exactly_once() {
        let mut cond = BooleanCondition::new(
            KeySource::new(KeyCode::KeyW, ButtonPhase::PressStarted),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        advance(&mut state, &mut poller, 16);
        assert!(!cond.evaluate(&mut state).unwrap());

        poller.press_key(KeyCode::KeyW);
        advance(&mut state, &mut poller, 33);
        assert!(cond.evaluate(&mut state).unwrap());

        // Held: the edge is gone.
        advance(&mut state, &mut poller, 50);
        assert!(!cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_release_started_fires_on_release_edge() {
        let mut cond = BooleanCondition::new(
            KeySource::new(KeyCode::KeyW, ButtonPhase::ReleaseStarted),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.press_key(KeyCode::KeyW);
        advance(&mut state, &mut poller, 16);
        assert!(!cond.evaluate(&mut state).unwrap());

        poller.release_key(KeyCode::KeyW);
        advance(&mut state, &mut poller, 33);
        assert!(cond.evaluate(&mut state).unwrap());

        advance(&mut state, &mut poller, 50);
        assert!(!cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_consumption_blocks_second_condition_same_frame() {
        let settings = ConditionSettings::default();
        let mut first = BooleanCondition::new(
            KeySource::new(KeyCode::Space, ButtonPhase::Pressed),
            settings,
        );
        let mut second = BooleanCondition::new(
            KeySource::new(KeyCode::Space, ButtonPhase::Pressed),
            settings,
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.press_key(KeyCode::Space);
        advance(&mut state, &mut poller, 16);
        advance(&mut state, &mut poller, 33);

        assert!(first.evaluate(&mut state).unwrap());
        // Same frame, same key: already claimed.
        assert!(!second.evaluate(&mut state).unwrap());

        // Next frame the stamp expires and the other condition can fire.
        advance(&mut state, &mut poller, 50);
        assert!(second.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_lock_source_matches_target_state() {
        let mut cond = BooleanCondition::new(
            LockSource::new(LockKey::CapsLock, true),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        advance(&mut state, &mut poller, 16);
        assert!(!cond.evaluate(&mut state).unwrap());

        poller.set_lock(LockKey::CapsLock, true);
        advance(&mut state, &mut poller, 33);
        // Engaged this frame only: debounce holds it back.
        assert!(!cond.evaluate(&mut state).unwrap());

        advance(&mut state, &mut poller, 50);
        assert!(cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_mouse_button_bounds_gate() {
        let bounds = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let mut cond = BooleanCondition::new(
            MouseButtonSource::new(MouseButton::Left, ButtonPhase::Pressed).within(bounds),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.move_cursor(Vec2::new(500.0, 500.0));
        poller.press_mouse_button(MouseButton::Left);
        advance(&mut state, &mut poller, 16);
        advance(&mut state, &mut poller, 33);
        // Held long enough, but the pointer is outside the region.
        assert!(!cond.evaluate(&mut state).unwrap());

        poller.move_cursor(Vec2::new(50.0, 50.0));
        advance(&mut state, &mut poller, 50);
        assert!(cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_mouse_motion_source() {
        let mut cond = BooleanCondition::new(
            MouseMotionSource::new(MouseSensor::Pointer, true),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        advance(&mut state, &mut poller, 16);
        assert!(!cond.evaluate(&mut state).unwrap());

        poller.move_cursor(Vec2::new(10.0, 10.0));
        advance(&mut state, &mut poller, 33);
        assert!(cond.evaluate(&mut state).unwrap());

        // Cursor holds still: moved-flag drops.
        advance(&mut state, &mut poller, 50);
        assert!(!cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_pad_button_single_validates_player() {
        let state = InputState::default();
        // No pads connected: construction fails fast.
        let err = PadButtonSource::single(GamepadButton::South, ButtonPhase::Pressed, 0, &state)
            .unwrap_err();
        assert!(matches!(err, InputError::PlayerIndexOutOfRange { .. }));
    }

    #[test]
    fn test_pad_button_any_mode() {
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();
        poller.connect_pad();
        poller.connect_pad();
        advance(&mut state, &mut poller, 16);

        let mut cond = BooleanCondition::new(
            PadButtonSource::any(GamepadButton::South, ButtonPhase::Pressed),
            ConditionSettings::default(),
        );

        poller.press_pad_button(1, GamepadButton::South);
        advance(&mut state, &mut poller, 33);
        assert!(!cond.evaluate(&mut state).unwrap());
        advance(&mut state, &mut poller, 50);
        // Pad 1 alone satisfies Any.
        assert!(cond.evaluate(&mut state).unwrap());
        // Lifted consumption claimed the button on every connected pad.
        assert!(state
            .gamepads
            .is_button_consumed(0, GamepadButton::South, state.frame()));
        assert!(state
            .gamepads
            .is_button_consumed(1, GamepadButton::South, state.frame()));
    }

    #[test]
    fn test_pad_button_all_mode_requires_every_pad() {
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();
        poller.connect_pad();
        poller.connect_pad();
        advance(&mut state, &mut poller, 16);

        let mut cond = BooleanCondition::new(
            PadButtonSource::all(GamepadButton::Start, ButtonPhase::Pressed),
            ConditionSettings::default(),
        );

        poller.press_pad_button(0, GamepadButton::Start);
        advance(&mut state, &mut poller, 33);
        advance(&mut state, &mut poller, 50);
        assert!(!cond.evaluate(&mut state).unwrap());

        poller.press_pad_button(1, GamepadButton::Start);
        advance(&mut state, &mut poller, 66);
        advance(&mut state, &mut poller, 83);
        assert!(cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_gesture_fires_on_arrival_frame() {
        let mut cond = BooleanCondition::new(
            GestureSource::new(GestureKind::Tap),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.push_gesture(Gesture {
            kind: GestureKind::Tap,
            position: Vec2::new(30.0, 30.0),
            delta: Vec2::ZERO,
        });
        advance(&mut state, &mut poller, 16);
        // No debounce for instantaneous events.
        assert!(cond.evaluate(&mut state).unwrap());

        // Gestures drain: next frame it is gone.
        advance(&mut state, &mut poller, 33);
        assert!(!cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_gesture_bounds() {
        let bounds = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let mut cond = BooleanCondition::new(
            GestureSource::new(GestureKind::Flick).within(bounds),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.push_gesture(Gesture {
            kind: GestureKind::Flick,
            position: Vec2::new(50.0, 50.0),
            delta: Vec2::new(5.0, 0.0),
        });
        advance(&mut state, &mut poller, 16);
        assert!(!cond.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_phrase_recognition() {
        let mut cond = BooleanCondition::new(
            PhraseSource::new("open map"),
            ConditionSettings::default(),
        );
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.push_phrase("open map");
        advance(&mut state, &mut poller, 16);
        assert!(cond.evaluate(&mut state).unwrap());

        advance(&mut state, &mut poller, 33);
        assert!(!cond.evaluate(&mut state).unwrap());
    }
}
