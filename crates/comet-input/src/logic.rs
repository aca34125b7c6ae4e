//! Threshold conditions over numeric sensors.
//!
//! [`LogicCondition`] pairs a [`SensorSource`] adapter with a [`ValueLogic`]
//! threshold. Unlike button conditions there is no two-frame debounce: an
//! analog axis crossing a threshold should register the frame it happens.
//! All remaining gates (focus, consumption, min-hold, cooldown) apply as
//! usual.

use crate::condition::{
    ConditionPhase, ConditionSettings, EventHooks, FireDetails, FireEvent, InputCondition, Source,
    build_fire_event,
};
use crate::error::InputError;
use crate::gamepad::{GamepadSensor, SensorValueMode};
use crate::mouse::MouseSensor;
use crate::state::InputState;
use crate::value::{Value, ValueKind, ValueLogic};

/// One numeric sensor axis, as seen by a [`LogicCondition`].
pub trait SensorSource {
    /// The device family of the sensor.
    fn source(&self) -> Source;

    /// The payload kind this sensor produces, checked against the threshold
    /// kind at construction time.
    fn kind(&self) -> ValueKind;

    /// Reads the sensor for the current frame.
    ///
    /// # Errors
    /// Runtime faults such as an out-of-range player index.
    fn value(&self, state: &InputState) -> Result<Value, InputError>;

    /// Claims the sensor for the current frame.
    fn consume(&self, state: &mut InputState);

    /// Whether the sensor is already claimed this frame.
    fn is_consumed(&self, state: &InputState) -> bool;

    /// Payload snapshot for fire events.
    fn details(&self, state: &InputState) -> FireDetails;
}

/// A threshold condition over a numeric sensor.
pub struct LogicCondition {
    adapter: Box<dyn SensorSource>,
    logic: ValueLogic,
    settings: ConditionSettings,
    phase: ConditionPhase,
    hooks: EventHooks,
}

impl std::fmt::Debug for LogicCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicCondition")
            .field("source", &self.adapter.source())
            .field("logic", &self.logic)
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl LogicCondition {
    /// Wraps `adapter` with a threshold comparison.
    ///
    /// # Errors
    /// [`InputError::MissingValue`] for a `None` threshold;
    /// [`InputError::ValueKindMismatch`] when the threshold's payload kind
    /// differs from what the sensor produces.
    pub fn new(
        adapter: impl SensorSource + 'static,
        logic: ValueLogic,
        settings: ConditionSettings,
    ) -> Result<Self, InputError> {
        logic.threshold().validate()?;
        let expected = adapter.kind();
        let found = logic.threshold().kind();
        if expected != found {
            return Err(InputError::ValueKindMismatch { expected, found });
        }
        Ok(Self {
            adapter: Box::new(adapter),
            logic,
            settings,
            phase: ConditionPhase::new(),
            hooks: EventHooks::new(),
        })
    }

    /// Registers a fire subscriber (invoked in subscription order).
    pub fn on_fire(&mut self, callback: impl FnMut(&FireEvent) + 'static) {
        self.hooks.subscribe(callback);
    }

    /// The threshold comparison.
    #[must_use]
    pub fn logic(&self) -> ValueLogic {
        self.logic
    }
}

impl InputCondition for LogicCondition {
    fn source(&self) -> Source {
        self.adapter.source()
    }

    fn phase(&self) -> ConditionPhase {
        self.phase
    }

    fn evaluate(&mut self, state: &mut InputState) -> Result<bool, InputError> {
        let value = self.adapter.value(state)?;
        let current = self.logic.compare(&value);
        let now_ms = state.now_ms();
        self.phase.transition(current, now_ms);

        let fired = (!self.settings.window_must_be_active || state.window_active())
            && (self.settings.allowed_if_consumed || !self.adapter.is_consumed(state))
            && self.phase.hold_satisfied(self.settings.min_hold_ms, now_ms)
            && self.phase.cooldown_satisfied(self.settings.cooldown_ms, now_ms)
            && current;

        if fired {
            if self.settings.consumable {
                self.adapter.consume(state);
            }
            self.phase.record_fire(now_ms);
            if self.hooks.any() {
                let details = self.adapter.details(state);
                let event = build_fire_event(self.adapter.source(), &self.phase, state, details);
                self.hooks.dispatch(&event);
            }
        }
        Ok(fired)
    }

    fn consume(&mut self, state: &mut InputState) {
        self.adapter.consume(state);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        self.adapter.is_consumed(state)
    }

    fn details(&self, state: &InputState) -> FireDetails {
        self.adapter.details(state)
    }
}

// ── Mouse sensors ───────────────────────────────────────────────────

/// A mouse sensor read as either its absolute value or its per-frame delta.
#[derive(Debug, Clone, Copy)]
pub struct MouseSensorSource {
    sensor: MouseSensor,
    delta: bool,
}

impl MouseSensorSource {
    /// Reads the absolute sensor value.
    #[must_use]
    pub fn position(sensor: MouseSensor) -> Self {
        Self {
            sensor,
            delta: false,
        }
    }

    /// Reads the current-minus-previous delta.
    #[must_use]
    pub fn delta(sensor: MouseSensor) -> Self {
        Self {
            sensor,
            delta: true,
        }
    }
}

impl SensorSource for MouseSensorSource {
    fn source(&self) -> Source {
        Source::Mouse
    }

    fn kind(&self) -> ValueKind {
        match self.sensor {
            MouseSensor::Pointer => ValueKind::Vector2,
            MouseSensor::ScrollX | MouseSensor::ScrollY => ValueKind::Int,
            MouseSensor::ScrollWheel => ValueKind::Point,
        }
    }

    fn value(&self, state: &InputState) -> Result<Value, InputError> {
        Ok(if self.delta {
            state.mouse.sensor_delta(self.sensor)
        } else {
            state.mouse.sensor_value(self.sensor)
        })
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

// ── Gamepad sensors ─────────────────────────────────────────────────

/// A stick sensor, targeting one pad or reduced across all connected pads.
#[derive(Debug, Clone, Copy)]
pub struct PadStickSource {
    sensor: GamepadSensor,
    player: Option<usize>,
    mode: SensorValueMode,
    delta: bool,
}

impl PadStickSource {
    /// Reads the absolute stick position.
    ///
    /// With `player: Some(i)` the pad's raw value is read and `mode` is
    /// ignored; with `None` values from all connected pads are reduced
    /// according to `mode`.
    ///
    /// # Errors
    /// [`InputError::SensorKindMismatch`] for trigger sensors;
    /// [`InputError::PlayerIndexOutOfRange`] for a bad `player`.
    pub fn position(
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        state: &InputState,
    ) -> Result<Self, InputError> {
        Self::build(sensor, player, mode, false, state)
    }

    /// Reads the per-frame stick movement instead of the position.
    ///
    /// # Errors
    /// Same as [`position`](Self::position).
    pub fn delta(
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        state: &InputState,
    ) -> Result<Self, InputError> {
        Self::build(sensor, player, mode, true, state)
    }

    fn build(
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        delta: bool,
        state: &InputState,
    ) -> Result<Self, InputError> {
        if !sensor.is_stick() {
            return Err(InputError::SensorKindMismatch {
                sensor,
                expected: "stick",
            });
        }
        if let Some(player) = player {
            state.gamepads.validate_player(player)?;
        }
        Ok(Self {
            sensor,
            player,
            mode,
            delta,
        })
    }
}

impl SensorSource for PadStickSource {
    fn source(&self) -> Source {
        Source::Gamepad
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Vector2
    }

    fn value(&self, state: &InputState) -> Result<Value, InputError> {
        let v = if self.delta {
            state.gamepads.stick_delta(self.sensor, self.player, self.mode)?
        } else {
            state
                .gamepads
                .stick_position(self.sensor, self.player, self.mode)?
        };
        Ok(Value::Vector2(v))
    }

    fn consume(&self, state: &mut InputState) {
        consume_pad_sensor(state, self.sensor, self.player);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        pad_sensor_consumed(state, self.sensor, self.player)
    }

    fn details(&self, state: &InputState) -> FireDetails {
        FireDetails::PadSensor {
            sensor: self.sensor,
            value: self.value(state).unwrap_or(Value::None),
        }
    }
}

/// A trigger sensor, targeting one pad or reduced across all connected pads.
#[derive(Debug, Clone, Copy)]
pub struct PadTriggerSource {
    sensor: GamepadSensor,
    player: Option<usize>,
    mode: SensorValueMode,
    delta: bool,
}

impl PadTriggerSource {
    /// Reads the absolute trigger position.
    ///
    /// # Errors
    /// [`InputError::SensorKindMismatch`] for stick sensors;
    /// [`InputError::InvalidSensorMode`] for per-axis reduction modes
    /// (triggers are scalar); [`InputError::PlayerIndexOutOfRange`] for a bad
    /// `player`.
    pub fn position(
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        state: &InputState,
    ) -> Result<Self, InputError> {
        Self::build(sensor, player, mode, false, state)
    }

    /// Reads the per-frame trigger movement instead of the position.
    ///
    /// # Errors
    /// Same as [`position`](Self::position).
    pub fn delta(
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        state: &InputState,
    ) -> Result<Self, InputError> {
        Self::build(sensor, player, mode, true, state)
    }

    fn build(
        sensor: GamepadSensor,
        player: Option<usize>,
        mode: SensorValueMode,
        delta: bool,
        state: &InputState,
    ) -> Result<Self, InputError> {
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
            state.gamepads.validate_player(player)?;
        }
        Ok(Self {
            sensor,
            player,
            mode,
            delta,
        })
    }
}

impl SensorSource for PadTriggerSource {
    fn source(&self) -> Source {
        Source::Gamepad
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Float
    }

    fn value(&self, state: &InputState) -> Result<Value, InputError> {
        let v = if self.delta {
            state
                .gamepads
                .trigger_delta(self.sensor, self.player, self.mode)?
        } else {
            state
                .gamepads
                .trigger_position(self.sensor, self.player, self.mode)?
        };
        Ok(Value::Float(v))
    }

    fn consume(&self, state: &mut InputState) {
        consume_pad_sensor(state, self.sensor, self.player);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        pad_sensor_consumed(state, self.sensor, self.player)
    }

    fn details(&self, state: &InputState) -> FireDetails {
        FireDetails::PadSensor {
            sensor: self.sensor,
            value: self.value(state).unwrap_or(Value::None),
        }
    }
}

/// Targeted pad: consume that pad's sensor. Aggregated: claim it on every
/// connected pad, since the reduced value drew from all of them.
fn consume_pad_sensor(state: &mut InputState, sensor: GamepadSensor, player: Option<usize>) {
    let frame = state.frame();
    match player {
        Some(player) => state.gamepads.consume_sensor(player, sensor, frame),
        None => {
            let players: Vec<usize> = state.gamepads.connected_players().collect();
            for player in players {
                state.gamepads.consume_sensor(player, sensor, frame);
            }
        }
    }
}

/// Aggregated reads count as consumed if any contributing pad is.
fn pad_sensor_consumed(state: &InputState, sensor: GamepadSensor, player: Option<usize>) -> bool {
    let frame = state.frame();
    match player {
        Some(player) => state.gamepads.is_sensor_consumed(player, sensor, frame),
        None => state
            .gamepads
            .connected_players()
            .any(|p| state.gamepads.is_sensor_consumed(p, sensor, frame)),
    }
}
