//! Snapshot-based multi-gamepad tracker with cross-pad sensor aggregation.
//!
//! [`GamepadTracker`] keeps one slot per player index, each holding the
//! current and previous [`GamepadSnapshot`]. Button and axis state is
//! refreshed every tick for all known-connected pads; the connection list
//! itself is re-enumerated only every few seconds (see
//! [`InputSettings::gamepad_recheck_seconds`]) since enumeration is the
//! expensive part on most platforms.
//!
//! [`InputSettings::gamepad_recheck_seconds`]: crate::settings::InputSettings::gamepad_recheck_seconds

use crate::error::InputError;
use crate::poll::InputPoller;
use glam::Vec2;
use std::collections::{HashMap, HashSet};

/// Unified button names that work across Xbox / PlayStation / generic pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    /// A / Cross
    South,
    /// B / Circle
    East,
    /// Y / Triangle
    North,
    /// X / Square
    West,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftShoulder,
    RightShoulder,
    LeftTriggerButton,
    RightTriggerButton,
    LeftStickClick,
    RightStickClick,
    Start,
    Select,
}

impl GamepadButton {
    /// Maps a gilrs button to the unified name, when one exists.
    #[must_use]
    pub fn from_gilrs(button: gilrs::Button) -> Option<Self> {
        use gilrs::Button;
        match button {
            Button::South => Some(Self::South),
            Button::East => Some(Self::East),
            Button::North => Some(Self::North),
            Button::West => Some(Self::West),
            Button::DPadUp => Some(Self::DPadUp),
            Button::DPadDown => Some(Self::DPadDown),
            Button::DPadLeft => Some(Self::DPadLeft),
            Button::DPadRight => Some(Self::DPadRight),
            Button::LeftTrigger => Some(Self::LeftShoulder),
            Button::RightTrigger => Some(Self::RightShoulder),
            Button::LeftTrigger2 => Some(Self::LeftTriggerButton),
            Button::RightTrigger2 => Some(Self::RightTriggerButton),
            Button::LeftThumb => Some(Self::LeftStickClick),
            Button::RightThumb => Some(Self::RightStickClick),
            Button::Start => Some(Self::Start),
            Button::Select => Some(Self::Select),
            _ => None,
        }
    }
}

/// Analog gamepad axes a condition can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadSensor {
    /// Left analog stick (2D).
    LeftStick,
    /// Right analog stick (2D).
    RightStick,
    /// Left trigger (scalar, 0..1).
    LeftTrigger,
    /// Right trigger (scalar, 0..1).
    RightTrigger,
}

impl GamepadSensor {
    /// Whether this sensor produces a 2D stick value.
    #[must_use]
    pub fn is_stick(self) -> bool {
        matches!(self, Self::LeftStick | Self::RightStick)
    }
}

/// How a per-pad sensor value is reduced across all connected pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorValueMode {
    /// The first connected pad's value.
    First,
    /// The last connected pad's value.
    Last,
    /// Sum divided by connected-pad count.
    Average,
    /// Component-wise maximum (plain maximum for scalars).
    Max,
    /// The value of the pad with the greatest X component.
    MaxX,
    /// The value of the pad with the greatest Y component.
    MaxY,
    /// Component-wise minimum (plain minimum for scalars).
    Min,
    /// The value of the pad with the smallest X component.
    MinX,
    /// The value of the pad with the smallest Y component.
    MinY,
}

impl SensorValueMode {
    /// Whether this mode picks by a single axis and so needs a 2D sensor.
    #[must_use]
    pub fn per_axis(self) -> bool {
        matches!(self, Self::MaxX | Self::MaxY | Self::MinX | Self::MinY)
    }
}

/// How a gamepad condition targets the connected pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// One specific player index.
    Single,
    /// Satisfied if any connected pad satisfies the predicate.
    Any,
    /// Requires every connected pad to satisfy the predicate.
    All,
}

/// Full state of one gamepad for one frame.
#[derive(Debug, Clone, Default)]
pub struct GamepadSnapshot {
    buttons: HashSet<GamepadButton>,
    /// Left stick, each axis in `[-1, 1]` after deadzone filtering.
    pub left_stick: Vec2,
    /// Right stick.
    pub right_stick: Vec2,
    /// Left trigger in `[0, 1]`.
    pub left_trigger: f32,
    /// Right trigger in `[0, 1]`.
    pub right_trigger: f32,
}

impl GamepadSnapshot {
    /// Creates a zeroed snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `button` as held.
    pub fn press(&mut self, button: GamepadButton) {
        self.buttons.insert(button);
    }

    /// Marks `button` as released.
    pub fn release(&mut self, button: GamepadButton) {
        self.buttons.remove(&button);
    }

    /// Whether `button` is held in this snapshot.
    #[must_use]
    pub fn is_down(&self, button: GamepadButton) -> bool {
        self.buttons.contains(&button)
    }

    fn stick(&self, sensor: GamepadSensor) -> Vec2 {
        match sensor {
            GamepadSensor::LeftStick => self.left_stick,
            GamepadSensor::RightStick => self.right_stick,
            GamepadSensor::LeftTrigger | GamepadSensor::RightTrigger => Vec2::ZERO,
        }
    }

    fn trigger(&self, sensor: GamepadSensor) -> f32 {
        match sensor {
            GamepadSensor::LeftTrigger => self.left_trigger,
            GamepadSensor::RightTrigger => self.right_trigger,
            GamepadSensor::LeftStick | GamepadSensor::RightStick => 0.0,
        }
    }
}

/// One player slot: connection flag plus the two snapshots.
#[derive(Debug, Default)]
struct PadSlot {
    connected: bool,
    current: GamepadSnapshot,
    previous: GamepadSnapshot,
}

/// Per-player current/previous gamepad snapshots, consumption stamps, and
/// cross-pad sensor aggregation.
#[derive(Debug, Default)]
pub struct GamepadTracker {
    slots: Vec<PadSlot>,
    consumed_buttons: HashMap<(usize, GamepadButton), u64>,
    consumed_sensors: HashMap<(usize, GamepadSensor), u64>,
    last_connection_check_ms: Option<u64>,
}

impl GamepadTracker {
    /// Creates a tracker with no known pads.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes pad state from the poller. Call once per tick.
    ///
    /// Connection enumeration runs only when `recheck_interval_ms` has
    /// elapsed since the previous enumeration (and on the very first call);
    /// snapshot polling runs every tick for all known-connected pads.
    pub fn update(&mut self, poller: &mut dyn InputPoller, now_ms: u64, recheck_interval_ms: u64) {
        let recheck_due = self
            .last_connection_check_ms
            .is_none_or(|t| now_ms.saturating_sub(t) >= recheck_interval_ms);
        if recheck_due {
            self.last_connection_check_ms = Some(now_ms);
            let connected = poller.connected_gamepads();
            if let Some(&max) = connected.iter().max() {
                while self.slots.len() <= max {
                    self.slots.push(PadSlot::default());
                }
            }
            for (index, slot) in self.slots.iter_mut().enumerate() {
                slot.connected = connected.contains(&index);
            }
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.connected {
                slot.previous = std::mem::replace(&mut slot.current, poller.gamepad(index));
            }
        }
    }

    /// Player indexes of all currently connected pads, ascending.
    pub fn connected_players(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.connected)
            .map(|(i, _)| i)
    }

    /// Number of currently connected pads.
    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.connected_players().count()
    }

    /// Whether the pad at `player` is currently connected.
    #[must_use]
    pub fn is_connected(&self, player: usize) -> bool {
        self.slots.get(player).is_some_and(|s| s.connected)
    }

    /// Validates `player` against the highest connected index.
    ///
    /// # Errors
    /// [`InputError::PlayerIndexOutOfRange`] when `player` exceeds the
    /// highest connected index (or no pad is connected at all).
    pub fn validate_player(&self, player: usize) -> Result<(), InputError> {
        let highest = self.connected_players().last();
        match highest {
            Some(h) if player <= h => Ok(()),
            _ => Err(InputError::PlayerIndexOutOfRange {
                index: player,
                connected: self.connected_count(),
            }),
        }
    }

    // ── Buttons ─────────────────────────────────────────────────────

    /// Whether `button` is down on `player` this frame.
    ///
    /// A validated-but-disconnected slot reads as not down.
    ///
    /// # Errors
    /// Out-of-range `player`.
    pub fn is_button_down(&self, player: usize, button: GamepadButton) -> Result<bool, InputError> {
        self.validate_player(player)?;
        Ok(self.slots[player].connected && self.slots[player].current.is_down(button))
    }

    /// Whether `button` was down on `player` last frame.
    ///
    /// # Errors
    /// Out-of-range `player`.
    pub fn was_button_down(
        &self,
        player: usize,
        button: GamepadButton,
    ) -> Result<bool, InputError> {
        self.validate_player(player)?;
        Ok(self.slots[player].connected && self.slots[player].previous.is_down(button))
    }

    /// Stamps `(player, button)` as consumed for `frame`.
    pub fn consume_button(&mut self, player: usize, button: GamepadButton, frame: u64) {
        self.consumed_buttons.insert((player, button), frame);
    }

    /// Whether `(player, button)` was consumed on `frame`.
    ///
    /// A disconnected pad always reports `false`: nothing can have claimed an
    /// axis on hardware that is not there, and the connection gate already
    /// keeps disconnected pads from firing conditions.
    #[must_use]
    pub fn is_button_consumed(&self, player: usize, button: GamepadButton, frame: u64) -> bool {
        self.is_connected(player) && self.consumed_buttons.get(&(player, button)) == Some(&frame)
    }

    /// Stamps `(player, sensor)` as consumed for `frame`.
    pub fn consume_sensor(&mut self, player: usize, sensor: GamepadSensor, frame: u64) {
        self.consumed_sensors.insert((player, sensor), frame);
    }

    /// Whether `(player, sensor)` was consumed on `frame` (connected pads only).
    #[must_use]
    pub fn is_sensor_consumed(&self, player: usize, sensor: GamepadSensor, frame: u64) -> bool {
        self.is_connected(player) && self.consumed_sensors.get(&(player, sensor)) == Some(&frame)
    }

    // ── Sticks ──────────────────────────────────────────────────────

    /// Current position of a stick sensor.
    ///
    /// With `player: Some(i)` the raw per-pad value is returned directly;
    /// with `None` the value is reduced across every connected pad according
    /// to `mode`. No connected pads reduces to zero, and a
    /// validated-but-disconnected slot reads as zero rather than its last
    /// polled deflection.
    ///
    /// # Errors
    /// [`InputError::SensorKindMismatch`] for trigger sensors; out-of-range
    /// `player`.
    pub fn stick_position(
        &self,
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
    ) -> Result<Vec2, InputError> {
        self.stick_values(sensor, player, mode, |slot| slot.current.stick(sensor))
    }

    /// Current-minus-previous stick movement, reduced like
    /// [`stick_position`](Self::stick_position).
    ///
    /// # Errors
    /// Same as [`stick_position`](Self::stick_position).
    pub fn stick_delta(
        &self,
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
    ) -> Result<Vec2, InputError> {
        self.stick_values(sensor, player, mode, |slot| {
            slot.current.stick(sensor) - slot.previous.stick(sensor)
        })
    }

    fn stick_values(
        &self,
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        read: impl Fn(&PadSlot) -> Vec2,
    ) -> Result<Vec2, InputError> {
        if !sensor.is_stick() {
            return Err(InputError::SensorKindMismatch {
                sensor,
                expected: "stick",
            });
        }
        if let Some(player) = player {
            self.validate_player(player)?;
            let slot = &self.slots[player];
            return Ok(if slot.connected { read(slot) } else { Vec2::ZERO });
        }
        let values: Vec<Vec2> = self
            .connected_players()
            .map(|i| read(&self.slots[i]))
            .collect();
        Ok(reduce_vec2(&values, mode))
    }

    // ── Triggers ────────────────────────────────────────────────────

    /// Current position of a trigger sensor, reduced across connected pads
    /// when `player` is `None`. A validated-but-disconnected slot reads as
    /// zero.
    ///
    /// # Errors
    /// [`InputError::SensorKindMismatch`] for stick sensors;
    /// [`InputError::InvalidSensorMode`] for per-axis modes (triggers are
    /// scalar); out-of-range `player`.
    pub fn trigger_position(
        &self,
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
    ) -> Result<f32, InputError> {
        self.trigger_values(sensor, player, mode, |slot| slot.current.trigger(sensor))
    }

    /// Current-minus-previous trigger movement.
    ///
    /// # Errors
    /// Same as [`trigger_position`](Self::trigger_position).
    pub fn trigger_delta(
        &self,
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
    ) -> Result<f32, InputError> {
        self.trigger_values(sensor, player, mode, |slot| {
            slot.current.trigger(sensor) - slot.previous.trigger(sensor)
        })
    }

    fn trigger_values(
        &self,
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        read: impl Fn(&PadSlot) -> f32,
    ) -> Result<f32, InputError> {
        if sensor.is_stick() {
            return Err(InputError::SensorKindMismatch {
                sensor,
                expected: "trigger",
            });
        }
        if mode.per_axis() {
            return Err(InputError::InvalidSensorMode { mode, sensor });
        }
        if let Some(player) = player {
            self.validate_player(player)?;
            let slot = &self.slots[player];
            return Ok(if slot.connected { read(slot) } else { 0.0 });
        }
        let values: Vec<f32> = self
            .connected_players()
            .map(|i| read(&self.slots[i]))
            .collect();
        Ok(reduce_f32(&values, mode))
    }

    /// Whether `sensor` on `player` changed between the previous and current
    /// frame. A disconnected slot reads as not moved.
    ///
    /// # Errors
    /// Out-of-range `player`.
    pub fn sensor_moved(&self, player: usize, sensor: GamepadSensor) -> Result<bool, InputError> {
        self.validate_player(player)?;
        let slot = &self.slots[player];
        if !slot.connected {
            return Ok(false);
        }
        Ok(if sensor.is_stick() {
            slot.current.stick(sensor) != slot.previous.stick(sensor)
        } else {
            slot.current.trigger(sensor) != slot.previous.trigger(sensor)
        })
    }
}

/// Reduces per-pad 2D values. Empty input reduces to zero.
fn reduce_vec2(values: &[Vec2], mode: SensorValueMode) -> Vec2 {
    let Some(&first) = values.first() else {
        return Vec2::ZERO;
    };
    match mode {
        SensorValueMode::First => first,
        SensorValueMode::Last => values[values.len() - 1],
        SensorValueMode::Average => {
            values.iter().copied().sum::<Vec2>() / values.len() as f32
        }
        SensorValueMode::Max => values
            .iter()
            .copied()
            .fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max),
        SensorValueMode::Min => values
            .iter()
            .copied()
            .fold(Vec2::splat(f32::INFINITY), Vec2::min),
        SensorValueMode::MaxX => values
            .iter()
            .copied()
            .fold(Vec2::new(f32::NEG_INFINITY, 0.0), |best, v| {
                if v.x > best.x { v } else { best }
            }),
        SensorValueMode::MaxY => values
            .iter()
            .copied()
            .fold(Vec2::new(0.0, f32::NEG_INFINITY), |best, v| {
                if v.y > best.y { v } else { best }
            }),
        SensorValueMode::MinX => values
            .iter()
            .copied()
            .fold(Vec2::new(f32::INFINITY, 0.0), |best, v| {
                if v.x < best.x { v } else { best }
            }),
        SensorValueMode::MinY => values
            .iter()
            .copied()
            .fold(Vec2::new(0.0, f32::INFINITY), |best, v| {
                if v.y < best.y { v } else { best }
            }),
    }
}

/// Reduces per-pad scalar values. Per-axis modes are rejected upstream.
fn reduce_f32(values: &[f32], mode: SensorValueMode) -> f32 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    match mode {
        SensorValueMode::First => first,
        SensorValueMode::Last => values[values.len() - 1],
        SensorValueMode::Average => values.iter().sum::<f32>() / values.len() as f32,
        SensorValueMode::Max => values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        SensorValueMode::Min => values.iter().copied().fold(f32::INFINITY, f32::min),
        // Unreachable behind trigger_values' guard; kept total for safety.
        _ => first,
    }
}
