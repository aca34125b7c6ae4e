//! The winit/gilrs production poller.
//!
//! [`PlatformPoller`] implements [`InputPoller`] over real hardware: keyboard,
//! mouse, and focus state accumulate from winit window events fed in by the
//! host's event loop, while gamepads are pumped from gilrs during polling.
//! Touch gestures and voice phrases have no cross-platform recognizer here;
//! hosts with one push recognized results in via
//! [`push_gesture`](PlatformPoller::push_gesture) /
//! [`push_phrase`](PlatformPoller::push_phrase).

use crate::gamepad::{GamepadButton, GamepadSnapshot};
use crate::keyboard::KeyboardSnapshot;
use crate::mouse::{MouseButton, MouseSnapshot};
use crate::poll::InputPoller;
use crate::settings::InputSettings;
use crate::touch::Gesture;
use gilrs::{Axis, EventType, GamepadId, Gilrs};
use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard, mouse, and focus state accumulated from winit window events.
///
/// Kept separate from the gilrs half so it can be driven (and tested) without
/// gamepad hardware.
#[derive(Debug)]
struct WindowInputState {
    keyboard: KeyboardSnapshot,
    mouse: MouseSnapshot,
    /// Fractional pixel-scroll carry, so sub-line pixel deltas accumulate
    /// into whole ticks instead of being dropped.
    scroll_carry: Vec2,
    scroll_pixels_per_line: f32,
    window_active: bool,
}

impl WindowInputState {
    fn new(scroll_pixels_per_line: f32) -> Self {
        Self {
            keyboard: KeyboardSnapshot::new(),
            mouse: MouseSnapshot::new(),
            scroll_carry: Vec2::ZERO,
            scroll_pixels_per_line: scroll_pixels_per_line.max(1.0),
            window_active: true,
        }
    }

    fn process_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        // OS key repeat would read as release+press churn; the snapshot model
        // wants the held state only.
        if repeat {
            return;
        }
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match state {
            ElementState::Pressed => {
                self.keyboard.press(code);
                // Lock state flips on the press edge.
                match code {
                    KeyCode::CapsLock => self.keyboard.caps_lock = !self.keyboard.caps_lock,
                    KeyCode::NumLock => self.keyboard.num_lock = !self.keyboard.num_lock,
                    _ => {}
                }
            }
            ElementState::Released => self.keyboard.release(code),
        }
    }

    fn process_cursor(&mut self, position: Vec2) {
        self.mouse.position = position;
    }

    fn process_mouse_button(&mut self, button: winit::event::MouseButton, state: ElementState) {
        let button = MouseButton::from_winit(button);
        match state {
            ElementState::Pressed => self.mouse.press(button),
            ElementState::Released => self.mouse.release(button),
        }
    }

    fn process_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(x, y) => {
                self.scroll_carry.x += x;
                self.scroll_carry.y += y;
            }
            MouseScrollDelta::PixelDelta(pos) => {
                self.scroll_carry.x += pos.x as f32 / self.scroll_pixels_per_line;
                self.scroll_carry.y += pos.y as f32 / self.scroll_pixels_per_line;
            }
        }
        self.mouse.scroll_x += drain_whole_ticks(&mut self.scroll_carry.x);
        self.mouse.scroll_y += drain_whole_ticks(&mut self.scroll_carry.y);
    }

    fn process_focus(&mut self, focused: bool) {
        self.window_active = focused;
        if !focused {
            // Keys released while unfocused never produce release events;
            // drop everything rather than report stuck keys.
            self.keyboard = KeyboardSnapshot {
                caps_lock: self.keyboard.caps_lock,
                num_lock: self.keyboard.num_lock,
                ..KeyboardSnapshot::new()
            };
            self.mouse = MouseSnapshot {
                position: self.mouse.position,
                scroll_x: self.mouse.scroll_x,
                scroll_y: self.mouse.scroll_y,
                ..MouseSnapshot::new()
            };
        }
    }
}

/// One gamepad slot: the gilrs identity plus the live snapshot.
struct PadEntry {
    id: GamepadId,
    snapshot: GamepadSnapshot,
}

/// The production [`InputPoller`] over winit window events and gilrs.
pub struct PlatformPoller {
    gilrs: Gilrs,
    window: WindowInputState,
    /// Player index is the slot position; disconnects free the slot and new
    /// pads reuse the lowest free one.
    pads: Vec<Option<PadEntry>>,
    deadzone: f32,
    gestures: Vec<Gesture>,
    phrases: Vec<String>,
}

impl PlatformPoller {
    /// Creates a poller, initialising gilrs and registering already-connected
    /// gamepads in gilrs enumeration order.
    ///
    /// # Panics
    /// Panics if gilrs cannot initialise (missing platform backend).
    #[must_use]
    pub fn new(settings: &InputSettings) -> Self {
        let gilrs = Gilrs::new().expect("Failed to initialise gilrs");
        let mut poller = Self {
            gilrs,
            window: WindowInputState::new(settings.scroll_pixels_per_line),
            pads: Vec::new(),
            deadzone: settings.stick_deadzone.clamp(0.0, 0.99),
            gestures: Vec::new(),
            phrases: Vec::new(),
        };
        let ids: Vec<GamepadId> = poller
            .gilrs
            .gamepads()
            .filter(|(_, g)| g.is_connected())
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            poller.register_pad(id);
        }
        poller
    }

    /// Feeds one winit window event into the keyboard/mouse/focus state.
    /// Call for every event the host window receives.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                self.window
                    .process_key(event.physical_key, event.state, event.repeat);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.window
                    .process_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.window.process_mouse_button(*button, *state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.window.process_scroll(*delta);
            }
            WindowEvent::Focused(focused) => {
                self.window.process_focus(*focused);
            }
            _ => {}
        }
    }

    /// Queues a host-recognized gesture for the next tick.
    pub fn push_gesture(&mut self, gesture: Gesture) {
        self.gestures.push(gesture);
    }

    /// Queues a host-recognized phrase for the next tick.
    pub fn push_phrase(&mut self, phrase: impl Into<String>) {
        self.phrases.push(phrase.into());
    }

    fn register_pad(&mut self, id: GamepadId) -> usize {
        if let Some(index) = self
            .pads
            .iter()
            .position(|slot| slot.is_none())
        {
            self.pads[index] = Some(PadEntry {
                id,
                snapshot: GamepadSnapshot::new(),
            });
            return index;
        }
        self.pads.push(Some(PadEntry {
            id,
            snapshot: GamepadSnapshot::new(),
        }));
        self.pads.len() - 1
    }

    fn slot_of(&mut self, id: GamepadId) -> Option<usize> {
        self.pads
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|e| e.id == id))
    }

    /// Drains queued gilrs events into the pad snapshots. Idempotent within a
    /// tick: a second call simply finds the queue empty.
    fn pump_gilrs(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            let id = event.id;
            match event.event {
                EventType::Connected => {
                    if self.slot_of(id).is_none() {
                        self.register_pad(id);
                    }
                }
                EventType::Disconnected => {
                    if let Some(index) = self.slot_of(id) {
                        self.pads[index] = None;
                    }
                }
                EventType::AxisChanged(axis, raw, _) => {
                    let deadzone = self.deadzone;
                    let Some(index) = self.slot_of(id) else {
                        continue;
                    };
                    if let Some(entry) = self.pads[index].as_mut() {
                        let value = apply_deadzone(raw, deadzone);
                        match axis {
                            Axis::LeftStickX => entry.snapshot.left_stick.x = value,
                            Axis::LeftStickY => entry.snapshot.left_stick.y = value,
                            Axis::RightStickX => entry.snapshot.right_stick.x = value,
                            Axis::RightStickY => entry.snapshot.right_stick.y = value,
                            Axis::LeftZ => entry.snapshot.left_trigger = value.max(0.0),
                            Axis::RightZ => entry.snapshot.right_trigger = value.max(0.0),
                            _ => {}
                        }
                    }
                }
                EventType::ButtonPressed(button, _) => {
                    if let Some(unified) = GamepadButton::from_gilrs(button)
                        && let Some(index) = self.slot_of(id)
                        && let Some(entry) = self.pads[index].as_mut()
                    {
                        entry.snapshot.press(unified);
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(unified) = GamepadButton::from_gilrs(button)
                        && let Some(index) = self.slot_of(id)
                        && let Some(entry) = self.pads[index].as_mut()
                    {
                        entry.snapshot.release(unified);
                    }
                }
                _ => {}
            }
        }
    }
}

impl InputPoller for PlatformPoller {
    fn keyboard(&mut self) -> KeyboardSnapshot {
        // First snapshot request of the tick; pump the pad queue here so
        // button edges are never more than one frame stale.
        self.pump_gilrs();
        self.window.keyboard.clone()
    }

    fn mouse(&mut self) -> MouseSnapshot {
        self.window.mouse
    }

    fn connected_gamepads(&mut self) -> Vec<usize> {
        self.pump_gilrs();
        self.pads
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    fn gamepad(&mut self, player: usize) -> GamepadSnapshot {
        self.pads
            .get(player)
            .and_then(|slot| slot.as_ref())
            .map(|entry| entry.snapshot.clone())
            .unwrap_or_default()
    }

    fn gestures(&mut self) -> Vec<Gesture> {
        std::mem::take(&mut self.gestures)
    }

    fn phrases(&mut self) -> Vec<String> {
        std::mem::take(&mut self.phrases)
    }

    fn window_active(&mut self) -> bool {
        self.window.window_active
    }
}

/// Applies deadzone filtering with rescaling.
///
/// If `|raw| < deadzone`, returns `0.0`. Otherwise rescales from
/// `[deadzone, 1.0]` to `[0.0, 1.0]`, preserving sign.
pub(crate) fn apply_deadzone(raw: f32, deadzone: f32) -> f32 {
    let abs = raw.abs();
    if abs < deadzone {
        return 0.0;
    }
    let scale = 1.0 / (1.0 - deadzone);
    let rescaled = (abs - deadzone) * scale;
    rescaled.min(1.0).copysign(raw)
}

/// Splits whole ticks off a fractional scroll accumulator, leaving the
/// remainder for the next event.
fn drain_whole_ticks(carry: &mut f32) -> i32 {
    let ticks = carry.trunc();
    *carry -= ticks;
    ticks as i32
}
