//! Input engine error types.

use crate::gamepad::{GamepadSensor, SensorValueMode};
use crate::value::ValueKind;

/// Errors surfaced by condition construction and evaluation.
///
/// Configuration mistakes (kind mismatches, bad sensor modes, empty
/// composites) are reported once at construction time; out-of-range player
/// indexes are reported whenever a per-player accessor is called.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// A per-player gamepad accessor was given an index beyond the highest
    /// connected pad.
    #[error("player index {index} out of range ({connected} gamepad(s) connected)")]
    PlayerIndexOutOfRange {
        /// The requested player index.
        index: usize,
        /// How many gamepads are currently connected.
        connected: usize,
    },

    /// A `ValueLogic` threshold's payload kind does not match what the
    /// targeted sensor produces.
    #[error("value logic holds {found:?} but the sensor produces {expected:?}")]
    ValueKindMismatch {
        /// The kind the sensor produces.
        expected: ValueKind,
        /// The kind found in the threshold.
        found: ValueKind,
    },

    /// A stick accessor was given a trigger sensor, or vice versa.
    #[error("{sensor:?} is not a {expected} sensor")]
    SensorKindMismatch {
        /// The offending sensor.
        sensor: GamepadSensor,
        /// What the accessor expected ("stick" or "trigger").
        expected: &'static str,
    },

    /// A per-axis reduction mode was requested for a scalar sensor.
    #[error("sensor mode {mode:?} needs a two-axis sensor, but {sensor:?} is scalar")]
    InvalidSensorMode {
        /// The per-axis mode.
        mode: SensorValueMode,
        /// The scalar sensor it was applied to.
        sensor: GamepadSensor,
    },

    /// A `ValueLogic` threshold was constructed with [`Value::None`].
    ///
    /// [`Value::None`]: crate::value::Value::None
    #[error("comparison threshold may not be Value::None")]
    MissingValue,

    /// A composite condition was constructed with no children.
    #[error("composite condition needs at least one child")]
    EmptyComposite,

    /// A tracked condition name is already taken.
    #[error("a tracked condition named {0:?} already exists")]
    NameCollision(String),
}
