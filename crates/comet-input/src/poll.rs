//! The platform boundary: per-tick snapshot suppliers.
//!
//! The engine never talks to hardware directly. Once per tick it asks an
//! [`InputPoller`] for a fresh snapshot of each device, the current
//! connected-gamepad list, any recognized gestures/phrases, and window focus.
//! [`PlatformPoller`](crate::backend::PlatformPoller) is the winit/gilrs
//! production implementation; [`ManualPoller`] is a scriptable in-memory one
//! used by the test suite and useful for input replay.

use crate::gamepad::{GamepadButton, GamepadSensor, GamepadSnapshot};
use crate::keyboard::{KeyboardSnapshot, LockKey};
use crate::mouse::{MouseButton, MouseSnapshot};
use crate::touch::Gesture;
use glam::Vec2;
use winit::keyboard::KeyCode;

/// Supplies raw per-device state once per tick.
///
/// Snapshot methods are called every tick; [`connected_gamepads`] is called
/// only on the enumeration interval (see
/// [`GamepadTracker::update`](crate::gamepad::GamepadTracker::update)).
/// [`gestures`] and [`phrases`] drain: each recognized result is returned
/// exactly once.
///
/// [`connected_gamepads`]: Self::connected_gamepads
/// [`gestures`]: Self::gestures
/// [`phrases`]: Self::phrases
pub trait InputPoller {
    /// Full keyboard state right now.
    fn keyboard(&mut self) -> KeyboardSnapshot;
    /// Full mouse state right now.
    fn mouse(&mut self) -> MouseSnapshot;
    /// Player indexes of currently connected gamepads.
    fn connected_gamepads(&mut self) -> Vec<usize>;
    /// Full state of the pad at `player`; a disconnected slot reads as zeroed.
    fn gamepad(&mut self, player: usize) -> GamepadSnapshot;
    /// Gestures recognized since the last call.
    fn gestures(&mut self) -> Vec<Gesture>;
    /// Phrases recognized since the last call.
    fn phrases(&mut self) -> Vec<String>;
    /// Whether the host window currently has input focus.
    fn window_active(&mut self) -> bool;
}

/// A scriptable [`InputPoller`] with no platform dependencies.
///
/// Tests (and replay tooling) push synthetic state through the setters; the
/// poller then serves it like real hardware would.
#[derive(Debug, Default)]
pub struct ManualPoller {
    keyboard: KeyboardSnapshot,
    mouse: MouseSnapshot,
    pads: Vec<Option<GamepadSnapshot>>,
    gestures: Vec<Gesture>,
    phrases: Vec<String>,
    window_active: bool,
}

impl ManualPoller {
    /// Creates a poller with nothing pressed and the window focused.
    #[must_use]
    pub fn new() -> Self {
        Self {
            window_active: true,
            ..Self::default()
        }
    }

    // ── Keyboard ────────────────────────────────────────────────────

    /// Holds `key` down until released.
    pub fn press_key(&mut self, key: KeyCode) {
        self.keyboard.press(key);
    }

    /// Releases `key`.
    pub fn release_key(&mut self, key: KeyCode) {
        self.keyboard.release(key);
    }

    /// Sets a lock state.
    pub fn set_lock(&mut self, lock: LockKey, enabled: bool) {
        match lock {
            LockKey::CapsLock => self.keyboard.caps_lock = enabled,
            LockKey::NumLock => self.keyboard.num_lock = enabled,
        }
    }

    // ── Mouse ───────────────────────────────────────────────────────

    /// Moves the pointer to `position`.
    pub fn move_cursor(&mut self, position: Vec2) {
        self.mouse.position = position;
    }

    /// Holds `button` down until released.
    pub fn press_mouse_button(&mut self, button: MouseButton) {
        self.mouse.press(button);
    }

    /// Releases `button`.
    pub fn release_mouse_button(&mut self, button: MouseButton) {
        self.mouse.release(button);
    }

    /// Adds scroll ticks to the cumulative counters.
    pub fn scroll_by(&mut self, x: i32, y: i32) {
        self.mouse.scroll_x += x;
        self.mouse.scroll_y += y;
    }

    // ── Gamepads ────────────────────────────────────────────────────

    /// Connects a pad, reusing the lowest free slot. Returns its player index.
    pub fn connect_pad(&mut self) -> usize {
        if let Some(index) = self.pads.iter().position(Option::is_none) {
            self.pads[index] = Some(GamepadSnapshot::new());
            return index;
        }
        self.pads.push(Some(GamepadSnapshot::new()));
        self.pads.len() - 1
    }

    /// Disconnects the pad at `player`.
    pub fn disconnect_pad(&mut self, player: usize) {
        if let Some(slot) = self.pads.get_mut(player) {
            *slot = None;
        }
    }

    /// Holds a pad button down until released. No-op for disconnected slots.
    pub fn press_pad_button(&mut self, player: usize, button: GamepadButton) {
        if let Some(Some(pad)) = self.pads.get_mut(player) {
            pad.press(button);
        }
    }

    /// Releases a pad button.
    pub fn release_pad_button(&mut self, player: usize, button: GamepadButton) {
        if let Some(Some(pad)) = self.pads.get_mut(player) {
            pad.release(button);
        }
    }

    /// Positions a stick.
    ///
    /// # Panics
    /// If `sensor` is a trigger.
    pub fn set_stick(&mut self, player: usize, sensor: GamepadSensor, value: Vec2) {
        assert!(sensor.is_stick(), "set_stick needs a stick sensor");
        if let Some(Some(pad)) = self.pads.get_mut(player) {
            match sensor {
                GamepadSensor::LeftStick => pad.left_stick = value,
                GamepadSensor::RightStick => pad.right_stick = value,
                GamepadSensor::LeftTrigger | GamepadSensor::RightTrigger => unreachable!(),
            }
        }
    }

    /// Positions a trigger.
    ///
    /// # Panics
    /// If `sensor` is a stick.
    pub fn set_trigger(&mut self, player: usize, sensor: GamepadSensor, value: f32) {
        assert!(!sensor.is_stick(), "set_trigger needs a trigger sensor");
        if let Some(Some(pad)) = self.pads.get_mut(player) {
            match sensor {
                GamepadSensor::LeftTrigger => pad.left_trigger = value,
                GamepadSensor::RightTrigger => pad.right_trigger = value,
                GamepadSensor::LeftStick | GamepadSensor::RightStick => unreachable!(),
            }
        }
    }

    // ── Touch / voice / focus ───────────────────────────────────────

    /// Queues a recognized gesture for the next tick.
    pub fn push_gesture(&mut self, gesture: Gesture) {
        self.gestures.push(gesture);
    }

    /// Queues a recognized phrase for the next tick.
    pub fn push_phrase(&mut self, phrase: impl Into<String>) {
        self.phrases.push(phrase.into());
    }

    /// Sets window focus.
    pub fn set_window_active(&mut self, active: bool) {
        self.window_active = active;
    }
}

impl InputPoller for ManualPoller {
    fn keyboard(&mut self) -> KeyboardSnapshot {
        self.keyboard.clone()
    }

    fn mouse(&mut self) -> MouseSnapshot {
        self.mouse
    }

    fn connected_gamepads(&mut self) -> Vec<usize> {
        self.pads
            .iter()
            .enumerate()
            .filter(|(_, pad)| pad.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    fn gamepad(&mut self, player: usize) -> GamepadSnapshot {
        self.pads
            .get(player)
            .and_then(Clone::clone)
            .unwrap_or_default()
    }

    fn gestures(&mut self) -> Vec<Gesture> {
        std::mem::take(&mut self.gestures)
    }

    fn phrases(&mut self) -> Vec<String> {
        std::mem::take(&mut self.phrases)
    }

    fn window_active(&mut self) -> bool {
        self.window_active
    }
}
