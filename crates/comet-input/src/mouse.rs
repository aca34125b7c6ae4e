//! Snapshot-based mouse state tracker.
//!
//! [`MouseTracker`] keeps the current and previous frame's [`MouseSnapshot`]
//! (buttons, pointer position, cumulative scroll counters) and derives
//! deltas and moved-flags on demand; nothing derived is ever stored.

use crate::value::{Rect, Value};
use glam::{IVec2, Vec2};
use std::collections::HashMap;

/// Mouse buttons the tracker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Right button.
    Right,
    /// Middle button (wheel click).
    Middle,
    /// Back side button.
    Back,
    /// Forward side button.
    Forward,
}

impl MouseButton {
    /// Maps a winit button; `Other` buttons fold into `Forward`.
    #[must_use]
    pub fn from_winit(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => Self::Left,
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            winit::event::MouseButton::Back => Self::Back,
            winit::event::MouseButton::Forward | winit::event::MouseButton::Other(_) => {
                Self::Forward
            }
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Back => 3,
            Self::Forward => 4,
        }
    }
}

/// Numeric mouse axes a condition can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseSensor {
    /// Pointer position ([`Value::Vector2`]).
    Pointer,
    /// Horizontal scroll counter ([`Value::Int`]).
    ScrollX,
    /// Vertical scroll counter ([`Value::Int`]).
    ScrollY,
    /// Combined scroll counters ([`Value::Point`]).
    ScrollWheel,
}

/// Full mouse state for one frame.
///
/// Scroll counters are cumulative tick counts; per-frame scroll amounts fall
/// out of the current/previous difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseSnapshot {
    pub(crate) buttons: [bool; 5],
    /// Pointer position in window-logical coordinates.
    pub position: Vec2,
    /// Cumulative horizontal scroll ticks.
    pub scroll_x: i32,
    /// Cumulative vertical scroll ticks.
    pub scroll_y: i32,
}

impl MouseSnapshot {
    /// Creates a zeroed snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `button` as held.
    pub fn press(&mut self, button: MouseButton) {
        self.buttons[button.index()] = true;
    }

    /// Marks `button` as released.
    pub fn release(&mut self, button: MouseButton) {
        self.buttons[button.index()] = false;
    }

    /// Whether `button` is held in this snapshot.
    #[must_use]
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }
}

/// Current/previous mouse snapshots plus per-axis consumption stamps.
#[derive(Debug, Default)]
pub struct MouseTracker {
    current: MouseSnapshot,
    previous: MouseSnapshot,
    consumed_buttons: HashMap<MouseButton, u64>,
    consumed_sensors: HashMap<MouseSensor, u64>,
}

impl MouseTracker {
    /// Creates a tracker with zeroed snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot, demoting it to previous. Call once per tick.
    pub fn update(&mut self, snapshot: MouseSnapshot) {
        self.previous = std::mem::replace(&mut self.current, snapshot);
    }

    /// Whether `button` is down this frame.
    #[must_use]
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.current.is_down(button)
    }

    /// Whether `button` was down last frame.
    #[must_use]
    pub fn was_down(&self, button: MouseButton) -> bool {
        self.previous.is_down(button)
    }

    /// Current pointer position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.current.position
    }

    /// Whether the pointer currently lies within `rect`.
    #[must_use]
    pub fn cursor_in(&self, rect: &Rect) -> bool {
        rect.contains(self.current.position)
    }

    /// Current value of `sensor`.
    #[must_use]
    pub fn sensor_value(&self, sensor: MouseSensor) -> Value {
        Self::read(&self.current, sensor)
    }

    /// Last frame's value of `sensor`.
    #[must_use]
    pub fn previous_sensor_value(&self, sensor: MouseSensor) -> Value {
        Self::read(&self.previous, sensor)
    }

    /// Current-minus-previous value of `sensor`, in the sensor's own kind.
    #[must_use]
    pub fn sensor_delta(&self, sensor: MouseSensor) -> Value {
        match sensor {
            MouseSensor::Pointer => {
                Value::Vector2(self.current.position - self.previous.position)
            }
            MouseSensor::ScrollX => Value::Int(self.current.scroll_x - self.previous.scroll_x),
            MouseSensor::ScrollY => Value::Int(self.current.scroll_y - self.previous.scroll_y),
            MouseSensor::ScrollWheel => Value::Point(IVec2::new(
                self.current.scroll_x - self.previous.scroll_x,
                self.current.scroll_y - self.previous.scroll_y,
            )),
        }
    }

    /// Whether `sensor` changed between the previous and current frame.
    #[must_use]
    pub fn moved(&self, sensor: MouseSensor) -> bool {
        match sensor {
            MouseSensor::Pointer => self.current.position != self.previous.position,
            MouseSensor::ScrollX => self.current.scroll_x != self.previous.scroll_x,
            MouseSensor::ScrollY => self.current.scroll_y != self.previous.scroll_y,
            MouseSensor::ScrollWheel => {
                self.current.scroll_x != self.previous.scroll_x
                    || self.current.scroll_y != self.previous.scroll_y
            }
        }
    }

    fn read(snapshot: &MouseSnapshot, sensor: MouseSensor) -> Value {
        match sensor {
            MouseSensor::Pointer => Value::Vector2(snapshot.position),
            MouseSensor::ScrollX => Value::Int(snapshot.scroll_x),
            MouseSensor::ScrollY => Value::Int(snapshot.scroll_y),
            MouseSensor::ScrollWheel => {
                Value::Point(IVec2::new(snapshot.scroll_x, snapshot.scroll_y))
            }
        }
    }

    /// Stamps `button` as consumed for `frame`.
    pub fn consume_button(&mut self, button: MouseButton, frame: u64) {
        self.consumed_buttons.insert(button, frame);
    }

    /// Whether `button` was consumed on `frame`.
    #[must_use]
    pub fn is_button_consumed(&self, button: MouseButton, frame: u64) -> bool {
        self.consumed_buttons.get(&button) == Some(&frame)
    }

    /// Stamps `sensor` as consumed for `frame`.
    pub fn consume_sensor(&mut self, sensor: MouseSensor, frame: u64) {
        self.consumed_sensors.insert(sensor, frame);
    }

    /// Whether `sensor` was consumed on `frame`.
    #[must_use]
    pub fn is_sensor_consumed(&self, sensor: MouseSensor, frame: u64) -> bool {
        self.consumed_sensors.get(&sensor) == Some(&frame)
    }
}
